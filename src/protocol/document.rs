//! Parsed response documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An XML element with its attributes, child elements and text
///
/// Text is the concatenation of all text and CDATA nodes directly inside the
/// element; whitespace-only text between child elements is dropped. The tree
/// serializes with serde, so it can be re-emitted as JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text content of this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text content of the first child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text)
    }
}

/// A successfully parsed response body
///
/// The shape depends on the API method called; this crate does not model
/// per-method schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Root element of an XML (`rest`) response
    Xml(XmlElement),

    /// Decoded JSON (`json`) response
    Json(Value),
}

impl Document {
    /// The XML root, if this is an XML document
    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            Document::Xml(element) => Some(element),
            Document::Json(_) => None,
        }
    }

    /// The JSON value, if this is a JSON document
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Document::Json(value) => Some(value),
            Document::Xml(_) => None,
        }
    }

    /// Consume the document, returning the XML root
    pub fn into_xml(self) -> Option<XmlElement> {
        match self {
            Document::Xml(element) => Some(element),
            Document::Json(_) => None,
        }
    }

    /// Consume the document, returning the JSON value
    pub fn into_json(self) -> Option<Value> {
        match self {
            Document::Json(value) => Some(value),
            Document::Xml(_) => None,
        }
    }
}

/// Outcome of decoding a response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// The call succeeded
    Success(Document),

    /// The API reported an application error
    RemoteError { code: String, description: String },
}

impl ResponseEnvelope {
    /// Whether the API reported an error
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseEnvelope::RemoteError { .. })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event() -> XmlElement {
        let mut title = XmlElement::new("title");
        title.text = "Jazz Night".into();

        let mut event = XmlElement::new("event");
        event.attributes.push(("id".into(), "E0-001-1".into()));
        event.children.push(title);
        event
    }

    #[test]
    fn test_element_lookup() {
        let event = event();

        assert_eq!(event.attr("id"), Some("E0-001-1"));
        assert_eq!(event.attr("missing"), None);
        assert_eq!(event.child_text("title"), Some("Jazz Night"));
        assert_eq!(event.children_named("title").count(), 1);
    }

    #[test]
    fn test_document_accessors() {
        let xml = Document::Xml(event());
        let json = Document::Json(json!({"total_items": "3"}));

        assert!(xml.as_xml().is_some());
        assert!(xml.as_json().is_none());
        assert_eq!(json.as_json().unwrap()["total_items"], "3");
        assert!(json.into_xml().is_none());
    }

    #[test]
    fn test_element_serializes() {
        let value = serde_json::to_value(event()).unwrap();

        assert_eq!(value["name"], "event");
        assert_eq!(value["attributes"][0], json!(["id", "E0-001-1"]));
        assert_eq!(value["children"][0]["text"], "Jazz Night");
    }
}
