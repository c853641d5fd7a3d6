//! Error types for Eventful API calls

use bytes::Bytes;
use thiserror::Error;

/// Main error type for Eventful API calls
///
/// Every failure aborts the single `call` it came from. The `Display` output is
/// the human-readable message; the variant fields carry the same data for
/// callers that want to branch on it. Errors built from a response also keep
/// the request URI and raw body, see [`EventfulError::request_uri`] and
/// [`EventfulError::response_body`].
#[derive(Debug, Error)]
pub enum EventfulError {
    /// The server answered with a status other than 200
    #[error("Invalid response code: {status} {reason}")]
    HttpStatus {
        status: u16,
        reason: String,
        request_uri: String,
        body: Bytes,
    },

    /// The API accepted the request but reported an application error
    #[error("Invalid status: {code} ({description})")]
    Remote {
        code: String,
        description: String,
        request_uri: String,
        body: Bytes,
    },

    /// Network-level failure (connection refused, TLS, body read, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Response body was not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A file payload could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller passed something that cannot be turned into a request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client was assembled without a required piece
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EventfulError {
    /// Build the error for a non-200 response
    pub fn http_status(status: u16, reason: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.into(),
            request_uri: String::new(),
            body: Bytes::new(),
        }
    }

    /// Build the error for an application-level failure reported in the body
    pub fn remote(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            description: description.into(),
            request_uri: String::new(),
            body: Bytes::new(),
        }
    }

    /// Attach the request URI and raw response body to a response error
    ///
    /// Other variants are returned unchanged.
    pub fn with_response(mut self, uri: impl Into<String>, raw_body: Bytes) -> Self {
        match &mut self {
            EventfulError::HttpStatus {
                request_uri, body, ..
            }
            | EventfulError::Remote {
                request_uri, body, ..
            } => {
                *request_uri = uri.into();
                *body = raw_body;
            }
            _ => {}
        }
        self
    }

    /// URI of the request that produced this error, when known
    pub fn request_uri(&self) -> Option<&str> {
        match self {
            EventfulError::HttpStatus { request_uri, .. }
            | EventfulError::Remote { request_uri, .. }
                if !request_uri.is_empty() =>
            {
                Some(request_uri.as_str())
            }
            _ => None,
        }
    }

    /// Raw body of the response that produced this error
    pub fn response_body(&self) -> Option<&Bytes> {
        match self {
            EventfulError::HttpStatus { body, .. } | EventfulError::Remote { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// HTTP status code, if this error came from a non-200 response
    pub fn status(&self) -> Option<u16> {
        match self {
            EventfulError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote API itself reported the failure
    pub fn is_remote(&self) -> bool {
        matches!(self, EventfulError::Remote { .. })
    }
}

/// Result type alias for Eventful API calls
pub type EventfulResult<T> = Result<T, EventfulError>;

impl From<reqwest::Error> for EventfulError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EventfulError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            EventfulError::Transport(format!("Connection error: {}", err))
        } else {
            EventfulError::Transport(err.to_string())
        }
    }
}

impl From<quick_xml::Error> for EventfulError {
    fn from(err: quick_xml::Error) -> Self {
        EventfulError::Xml(err.to_string())
    }
}
