//! Response decoding and request body encoding

pub mod form;
pub mod json;
pub mod multipart;
pub mod xml;

pub use form::encode_form;
pub use json::JsonCodec;
pub use multipart::MultipartBody;
pub use xml::XmlCodec;

use std::sync::Arc;

use crate::protocol::{EventfulError, ResponseEnvelope, ResponseFormat};

/// Codec trait for decoding API response bodies
///
/// Each response format has its own codec. Decoding decides once whether the
/// body is a success document or an application error reported by the API.
pub trait Codec: Send + Sync {
    /// Decode a response body into an envelope
    ///
    /// # Arguments
    ///
    /// * `body` - The raw response body
    ///
    /// # Returns
    ///
    /// The success document or remote error, or a parse error if the body is
    /// not valid for this format
    fn decode_response(&self, body: &[u8]) -> Result<ResponseEnvelope, EventfulError>;

    /// The format this codec decodes
    fn format(&self) -> ResponseFormat;

    /// The MIME type sent in the `Accept` header
    fn content_type(&self) -> &str {
        self.format().accept()
    }
}

/// Pick the codec for a response format
pub fn codec_for(format: ResponseFormat) -> Arc<dyn Codec> {
    match format {
        ResponseFormat::Rest => Arc::new(XmlCodec::new()),
        ResponseFormat::Json => Arc::new(JsonCodec::new()),
    }
}
