use std::fmt::Display;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::convert::node::Node;
use crate::error::ConvertError;

/// Reserved key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "attributes";
/// Reserved key holding an element's text when it also has attributes or children.
pub const VALUE_KEY: &str = "value";
/// Prefix for child elements whose name is a reserved key. `@` cannot start
/// an XML name, so the renamed key never meets a real element.
pub const RESERVED_CHILD_PREFIX: char = '@';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// An element that has been opened but not yet closed.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, ConvertError> {
        let name = decode_name(start.local_name().as_ref())?;

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(parse_error)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let attr_name = decode_name(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value().map_err(parse_error)?.into_owned();
            attributes.push((attr_name, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn close(self) -> Node {
        let text = self.text.trim();

        if self.children.is_empty() && self.attributes.is_empty() {
            return if text.is_empty() {
                Node::Null
            } else {
                Node::scalar(text)
            };
        }

        let mut fields: Vec<(String, Node)> = Vec::new();
        let has_attributes = !self.attributes.is_empty();

        if has_attributes {
            let attrs = self
                .attributes
                .into_iter()
                .map(|(k, v)| (k, Node::Scalar(v)))
                .collect();
            fields.push((ATTRIBUTES_KEY.to_string(), Node::Object(attrs)));
        }

        // Group repeated siblings in first-appearance order.
        let mut grouped: Vec<(String, Vec<Node>)> = Vec::new();
        for (key, value) in self.children {
            let key = child_key(key);
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key, vec![value])),
            }
        }
        for (key, mut values) in grouped {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Node::Array(values)
            };
            fields.push((key, value));
        }

        if !text.is_empty() {
            fields.push((VALUE_KEY.to_string(), Node::scalar(text)));
        }

        // <Tag><Tag>..</Tag></Tag> collapses to the inner value.
        if !has_attributes
            && text.is_empty()
            && fields.len() == 1
            && fields[0].0 == child_key(self.name)
        {
            return fields.remove(0).1;
        }

        Node::Object(fields)
    }
}

fn child_key(name: String) -> String {
    if name == ATTRIBUTES_KEY || name == VALUE_KEY {
        format!("{}{}", RESERVED_CHILD_PREFIX, name)
    } else {
        name
    }
}

/// Parses an XML document into `{ <root name>: <root node> }`.
pub fn parse_document(bytes: &[u8]) -> Result<Node, ConvertError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);

    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                ensure_single_root(&root, &stack)?;
                stack.push(Frame::open(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                ensure_single_root(&root, &stack)?;
                let frame = Frame::open(e)?;
                attach(frame, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                let frame = stack.pop().ok_or_else(|| {
                    ConvertError::Parse("closing tag without a matching opening tag".to_string())
                })?;
                attach(frame, &mut stack, &mut root);
            }
            Ok(Event::Text(e)) => {
                let text = e.decode().map_err(parse_error)?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_text(&mut stack, &text)?;
            }
            Ok(Event::GeneralRef(e)) => {
                let text = match e.resolve_char_ref().map_err(parse_error)? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e.decode().map_err(parse_error)?;
                        resolve_predefined_entity(&name)
                            .map(str::to_string)
                            .ok_or_else(|| {
                                ConvertError::Parse(format!("undefined entity '&{};'", name))
                            })?
                    }
                };
                push_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ConvertError::Parse(format!(
                    "{} (at byte {})",
                    e,
                    reader.error_position()
                )));
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::Parse(format!(
            "unexpected end of document: element <{}> is not closed",
            open.name
        )));
    }

    let (name, node) =
        root.ok_or_else(|| ConvertError::Parse("no root element found".to_string()))?;
    Ok(Node::Object(vec![(name, node)]))
}

fn attach(frame: Frame, stack: &mut [Frame], root: &mut Option<(String, Node)>) {
    let name = frame.name.clone();
    let node = frame.close();

    match stack.last_mut() {
        Some(parent) => {
            if !node.is_null() {
                parent.children.push((name, node));
            }
        }
        None => *root = Some((name, node)),
    }
}

fn ensure_single_root(root: &Option<(String, Node)>, stack: &[Frame]) -> Result<(), ConvertError> {
    if stack.is_empty() {
        if let Some((name, _)) = root {
            return Err(ConvertError::Parse(format!(
                "unexpected element after root element <{}>",
                name
            )));
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<(), ConvertError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ConvertError::Parse(
            "text content outside of the root element".to_string(),
        )),
    }
}

fn decode_name(bytes: &[u8]) -> Result<String, ConvertError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ConvertError::Parse(format!("invalid UTF-8 in name: {}", e)))
}

fn parse_error(e: impl Display) -> ConvertError {
    ConvertError::Parse(e.to_string())
}
