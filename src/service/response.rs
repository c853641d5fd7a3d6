//! Eventful service response types

use bytes::Bytes;

use crate::protocol::{Document, XmlElement};

/// Successful response from an API call
///
/// Carries the parsed document together with the request URL and raw body,
/// which callers can log or inspect when troubleshooting.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Parsed response document
    pub document: Document,

    /// URL the request was sent to
    pub request_uri: String,

    /// Raw response body
    pub raw_body: Bytes,
}

impl ApiResponse {
    /// Raw body as text, replacing invalid UTF-8
    pub fn raw_text(&self) -> String {
        String::from_utf8_lossy(&self.raw_body).into_owned()
    }

    /// The XML root, if the call used the `rest` format
    pub fn xml(&self) -> Option<&XmlElement> {
        self.document.as_xml()
    }

    /// The JSON value, if the call used the `json` format
    pub fn json(&self) -> Option<&serde_json::Value> {
        self.document.as_json()
    }

    /// Consume the response, keeping only the document
    pub fn into_document(self) -> Document {
        self.document
    }
}
