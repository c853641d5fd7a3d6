//! JSON codec for the `/json` response format

use serde_json::Value;

use crate::{
    codec::Codec,
    protocol::{Document, EventfulError, ResponseEnvelope, ResponseFormat},
};

/// JSON codec
///
/// An object whose `error` field is truthy is a remote error; its `status` and
/// `description` fields become the error code and description. A present but
/// falsy `error` (0, "0", false, null, "") is a normal response.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn decode_response(&self, body: &[u8]) -> Result<ResponseEnvelope, EventfulError> {
        let value: Value = serde_json::from_slice(body)?;

        if let Value::Object(map) = &value {
            if map.get("error").is_some_and(is_truthy) {
                return Ok(ResponseEnvelope::RemoteError {
                    code: field_text(map.get("status")),
                    description: field_text(map.get("description")),
                });
            }
        }

        Ok(ResponseEnvelope::Success(Document::Json(value)))
    }

    fn format(&self) -> ResponseFormat {
        ResponseFormat::Json
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
