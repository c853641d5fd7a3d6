//! Core Eventful API types

pub mod arguments;
pub mod document;
pub mod error;
pub mod format;

pub use arguments::{ArgValue, CallArguments, FilePayload, LoadedFile, FILE_SUFFIX};
pub use document::{Document, ResponseEnvelope, XmlElement};
pub use error::{EventfulError, EventfulResult};
pub use format::ResponseFormat;

/// Normalize a method name by trimming slashes and whitespace on both ends
///
/// `"/events/search"`, `" events/search/ "` and `"events/search"` all become
/// `"events/search"`.
pub fn normalize_method(method: &str) -> &str {
    method.trim_matches(|c: char| c == '/' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_method() {
        assert_eq!(normalize_method("events/search"), "events/search");
        assert_eq!(normalize_method("/events/search"), "events/search");
        assert_eq!(normalize_method(" events/search/ "), "events/search");
        assert_eq!(normalize_method("// /events/get/ //"), "events/get");
        assert_eq!(normalize_method(" / "), "");
    }
}
