//! Minimal SOAP 1.1 plumbing: request envelopes and a small XML tree reader.
//!
//! The reader is namespace-agnostic: elements are looked up by local name, so
//! `soapenv:Fault` and `Fault` are the same thing. That is all the SGS facade
//! responses need.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

/// A parsed XML element: name, attributes, child elements and
/// concatenated text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First element with the given local name anywhere below this node,
    /// depth-first.
    pub fn descendant(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// All elements with the given local name below this node, depth-first.
    pub fn descendants(&self, name: &str) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn node_from_start(start: &BytesStart<'_>) -> Result<XmlNode, String> {
    let mut node = XmlNode {
        name: local_name(start.local_name().as_ref()),
        ..Default::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = local_name(attribute.key.local_name().as_ref());
        let value = attribute
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

/// Parses an XML document into a synthetic root node whose children are the
/// document's top-level elements. Whitespace-only text is dropped.
pub(crate) fn parse(xml: &str) -> Result<XmlNode, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = vec![XmlNode::default()];

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => stack.push(node_from_start(&start)?),
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                stack
                    .last_mut()
                    .ok_or_else(|| "unbalanced document".to_string())?
                    .children
                    .push(node);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| "unbalanced end tag".to_string())?;
                stack
                    .last_mut()
                    .ok_or_else(|| "unbalanced end tag".to_string())?
                    .children
                    .push(node);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    stack
                        .last_mut()
                        .ok_or_else(|| "unbalanced document".to_string())?
                        .text
                        .push_str(trimmed);
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    stack
                        .last_mut()
                        .ok_or_else(|| "unbalanced document".to_string())?
                        .text
                        .push_str(trimmed);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err("unclosed element at end of document".to_string());
    }
    Ok(stack.remove(0))
}

/// A parameter value for a SOAP operation call.
#[derive(Debug, Clone)]
pub enum SoapValue {
    /// A scalar, rendered as the element's text content.
    Text(String),
    /// A list, rendered as one `<item>` child per element.
    List(Vec<String>),
}

impl SoapValue {
    pub fn text(value: impl ToString) -> Self {
        SoapValue::Text(value.to_string())
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        SoapValue::List(values.into_iter().map(|v| v.to_string()).collect())
    }
}

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SGS_NS: &str = "https://www3.bcb.gov.br/sgspub/";

/// Renders a SOAP 1.1 request envelope for `operation` with the given
/// parameters, in order.
pub(crate) fn envelope(operation: &str, params: &[(&str, SoapValue)]) -> String {
    let mut body = String::new();
    for (name, value) in params {
        match value {
            SoapValue::Text(text) => {
                body.push_str(&format!("<{name}>{}</{name}>", escape(text)));
            }
            SoapValue::List(items) => {
                body.push_str(&format!("<{name}>"));
                for item in items {
                    body.push_str(&format!("<item>{}</item>", escape(item)));
                }
                body.push_str(&format!("</{name}>"));
            }
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="{ENVELOPE_NS}" xmlns:sgs="{SGS_NS}"><soapenv:Body><sgs:{operation}>{body}</sgs:{operation}></soapenv:Body></soapenv:Envelope>"#
    )
}

/// Extracts the faultstring if the response carries a SOAP fault.
pub(crate) fn fault_message(doc: &XmlNode) -> Option<String> {
    let fault = doc.descendant("Fault")?;
    Some(
        fault
            .child("faultstring")
            .map(|n| n.text().to_string())
            .unwrap_or_else(|| "unspecified SOAP fault".to_string()),
    )
}
