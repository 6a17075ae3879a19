use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// XML-derived value. Objects keep their keys in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Scalar(String),
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
}

impl Node {
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::Scalar(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Looks up a key on an object node. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Views the node as a list: arrays yield their items, null yields
    /// nothing, anything else is a single entry.
    pub fn entries(&self) -> Vec<&Node> {
        match self {
            Node::Null => Vec::new(),
            Node::Array(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Null => serializer.serialize_none(),
            Node::Scalar(s) => serializer.serialize_str(s),
            Node::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
