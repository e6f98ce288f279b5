//! Bridge between the external parser and the crate's node model
//!
//! `serde_yaml` is the black-box structural parser. Its output is
//! normalized into [`Node`] once at load time; nothing downstream
//! inspects `serde_yaml` types again.

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::node::{Entry, Item, Mapping, Node, Scalar, Sequence};

/// Parse raw text into an annotation-free canonical tree.
///
/// An empty document maps to an empty tree. A non-mapping root is a
/// parse error: the document model is keyed at the top level.
pub fn parse_tree(text: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| Error::parse(e.to_string()))?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(_) => match node_from_yaml(&value) {
            Node::Mapping(m) => Ok(m),
            _ => unreachable!("mapping value converts to a mapping node"),
        },
        _ => Err(Error::parse("document root is not a mapping")),
    }
}

/// Normalize a parsed `serde_yaml` value into a [`Node`].
pub fn node_from_yaml(value: &Value) -> Node {
    match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Scalar(Scalar::Int(i))
            } else if let Some(f) = n.as_f64() {
                Node::Scalar(Scalar::Float(f))
            } else {
                Node::Scalar(Scalar::Null)
            }
        }
        Value::String(s) => Node::Scalar(Scalar::Str(s.clone())),
        Value::Sequence(items) => {
            let mut seq = Sequence::new();
            for item in items {
                seq.push_item(Item::Node(node_from_yaml(item)));
            }
            Node::Sequence(seq)
        }
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, val) in map {
                let Some(key) = key_string(key) else {
                    tracing::warn!("Skipping mapping entry with non-scalar key");
                    continue;
                };
                out.push_entry(Entry::Pair {
                    key,
                    value: node_from_yaml(val),
                });
            }
            Node::Mapping(out)
        }
        Value::Tagged(tagged) => node_from_yaml(&tagged.value),
    }
}

/// Convert a [`Node`] back to a `serde_yaml` value, dropping
/// annotations. Used for structural-equality checks.
pub fn yaml_from_node(node: &Node) -> Value {
    match node {
        Node::Scalar(Scalar::Null) => Value::Null,
        Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        Node::Scalar(Scalar::Int(i)) => Value::Number((*i).into()),
        Node::Scalar(Scalar::Float(f)) => Value::Number((*f).into()),
        Node::Scalar(Scalar::Str(s)) => Value::String(s.clone()),
        Node::Sequence(seq) => Value::Sequence(seq.iter().map(yaml_from_node).collect()),
        Node::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (key, value) in map.iter() {
                out.insert(Value::String(key.to_string()), yaml_from_node(value));
            }
            Value::Mapping(out)
        }
    }
}

/// Mapping keys are strings in this model; scalar keys are rendered to
/// their text form, complex keys are rejected.
fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}
