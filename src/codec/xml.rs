//! XML codec for the `/rest` response format

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    codec::Codec,
    protocol::{Document, EventfulError, ResponseEnvelope, ResponseFormat, XmlElement},
};

/// Root element name the API uses to report errors
const ERROR_ROOT: &str = "error";

/// XML codec
///
/// Parses the body into an owned element tree. A root element named `error`
/// is a remote error: its `string` attribute is the code and the text of its
/// `description` child is the description.
#[derive(Debug, Clone, Default)]
pub struct XmlCodec;

impl XmlCodec {
    /// Create a new XML codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for XmlCodec {
    fn decode_response(&self, body: &[u8]) -> Result<ResponseEnvelope, EventfulError> {
        let root = parse_document(body)?;

        if root.name == ERROR_ROOT {
            return Ok(ResponseEnvelope::RemoteError {
                code: root.attr("string").unwrap_or_default().to_string(),
                description: root.child_text("description").unwrap_or_default().to_string(),
            });
        }

        Ok(ResponseEnvelope::Success(Document::Xml(root)))
    }

    fn format(&self) -> ResponseFormat {
        ResponseFormat::Rest
    }
}

/// Parse an XML document into its root element
pub fn parse_document(body: &[u8]) -> Result<XmlElement, EventfulError> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| EventfulError::Xml("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if let Some(current) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        current.text.push_str(&text);
                    }
                } else if !text.trim().is_empty() {
                    return Err(EventfulError::Xml("text outside of root element".into()));
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(EventfulError::Xml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| EventfulError::Xml("document has no root element".into()))
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, EventfulError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| EventfulError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), EventfulError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(EventfulError::Xml("multiple root elements".into())),
    }
    Ok(())
}
