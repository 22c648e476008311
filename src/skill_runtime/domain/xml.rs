//! XML to JSON mapping.
//!
//! Elements become object keys and repeated siblings become arrays.
//! Attributes are grouped under `$` and text beside children or attributes
//! under `_`. A leaf element with neither is its trimmed text.

use super::transform::TransformError;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::{Map, Value};

/// Document element name used when none is configured.
pub(crate) const DEFAULT_ROOT: &str = "root";
const ATTRIBUTES_KEY: &str = "$";
const TEXT_KEY: &str = "_";

fn xml_error(err: impl ToString) -> TransformError {
    TransformError::Xml(err.to_string())
}

#[derive(Debug, Default)]
struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, TransformError> {
        let name = String::from_utf8(start.name().as_ref().to_vec()).map_err(xml_error)?;
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attr = attribute.map_err(xml_error)?;
            let key = String::from_utf8(attr.key.as_ref().to_vec()).map_err(xml_error)?;
            let value = attr.unescape_value().map_err(xml_error)?;
            attributes.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim().to_owned();
        if self.children.is_empty() && self.attributes.is_empty() {
            return (self.name, Value::String(text));
        }
        let mut object = self.children;
        if !self.attributes.is_empty() {
            object.insert(ATTRIBUTES_KEY.to_owned(), Value::Object(self.attributes));
        }
        if !text.is_empty() {
            object.insert(TEXT_KEY.to_owned(), Value::String(text));
        }
        (self.name, Value::Object(object))
    }
}

fn attach(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

/// Parses an XML document into `{root_name: content}`.
pub(crate) fn parse(text: &str) -> Result<Value, TransformError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut document = Map::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                place(&mut stack, &mut document, name, value);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag"))?;
                let (name, value) = frame.close();
                place(&mut stack, &mut document, name, value);
            }
            Event::Text(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = content.into_inner();
                    frame.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unclosed element"));
    }
    if document.is_empty() {
        return Err(xml_error("document has no root element"));
    }
    Ok(Value::Object(document))
}

fn place(stack: &mut [Frame], document: &mut Map<String, Value>, name: String, value: Value) {
    match stack.last_mut() {
        Some(parent) => attach(&mut parent.children, name, value),
        None => attach(document, name, value),
    }
}

/// Serialises `data` as an indented XML document.
///
/// Arrays are wrapped in `item_name` elements under `root_name`. A single-key
/// object uses its key as the document element while the root name is left
/// at its default.
pub(crate) fn write(data: &Value, root_name: &str, item_name: &str) -> Result<String, TransformError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_error)?;

    match data {
        Value::Array(_) => {
            let mut wrapped = Map::new();
            wrapped.insert(item_name.to_owned(), data.clone());
            write_element(&mut writer, root_name, &Value::Object(wrapped))?;
        }
        Value::Object(fields) if fields.len() == 1 && root_name == DEFAULT_ROOT => {
            for (name, value) in fields {
                write_element(&mut writer, name, value)?;
            }
        }
        other => write_element(&mut writer, root_name, other)?,
    }

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
) -> Result<(), TransformError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Null => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_error),
        Value::Object(fields) => write_object(writer, name, fields),
        Value::String(text) => write_text_element(writer, name, text),
        Value::Bool(_) | Value::Number(_) => write_text_element(writer, name, &value.to_string()),
    }
}

fn write_object(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    fields: &Map<String, Value>,
) -> Result<(), TransformError> {
    let mut start = BytesStart::new(name);
    if let Some(Value::Object(attributes)) = fields.get(ATTRIBUTES_KEY) {
        for (key, value) in attributes {
            let rendered = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
            start.push_attribute((key.as_str(), rendered.as_str()));
        }
    }
    let children: Vec<(&String, &Value)> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != ATTRIBUTES_KEY && key.as_str() != TEXT_KEY)
        .collect();
    let text = fields.get(TEXT_KEY).and_then(Value::as_str);

    if children.is_empty() && text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }
    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(body) = text {
        writer
            .write_event(Event::Text(BytesText::new(body)))
            .map_err(xml_error)?;
    }
    for (child, value) in children {
        write_element(writer, child, value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), TransformError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}
