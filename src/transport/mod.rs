//! Transport abstraction for Eventful API calls

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
};

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;

use crate::protocol::EventfulError;

/// A fully built HTTP request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Absolute request URL
    pub url: String,

    /// HTTP method (e.g., "POST")
    pub method: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Look up a header, ignoring ASCII case
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

/// A raw HTTP response
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Reason phrase, when the transport knows one
    pub reason: Option<String>,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set the reason phrase
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Add a header to the response
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Whether the API treats this response as successful
    ///
    /// Only 200 counts; every other status, including other 2xx codes, fails
    /// the call.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Core transport trait for executing requests
///
/// Implementations only move bytes; status handling and decoding happen in the
/// service.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), EventfulError>>;

    /// Execute a request
    ///
    /// # Arguments
    ///
    /// * `request` - The request to execute
    ///
    /// # Returns
    ///
    /// The raw response, whatever its status, or a transport error
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EventfulError>;
}

#[async_trait]
impl<T: Transport> Transport for Box<T> {
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), EventfulError>> {
        (**self).poll_ready(cx)
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EventfulError> {
        (**self).execute(request).await
    }
}
