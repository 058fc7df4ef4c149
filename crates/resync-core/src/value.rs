//! Values carried by synchronized variables and custom data
//!
//! The reconciliation core never inspects these directly: equality goes
//! through a [`ValueComparator`](crate::ValueComparator) and rendering
//! through a [`Stringifier`](crate::Stringifier). The `Display` impl backs
//! the default stringifier.

use crate::identity::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A synchronized property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Compared with a tolerance by the default comparator
    Float(f64),
    String(String),
    /// Reference to another synchronized node
    NodeRef(NodeId),
    List(Vec<Value>),
    Map(ValueMap),
}

/// String-keyed values in insertion order
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::NodeRef(_) => "node_ref",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

fn write_joined<I, F>(f: &mut fmt::Formatter<'_>, open: &str, close: &str, items: I, mut write_item: F) -> fmt::Result
where
    I: IntoIterator,
    F: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    f.write_str(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::NodeRef(id) => write!(f, "{}", id),
            Value::List(list) => write_joined(f, "[", "]", list, |f, v| write!(f, "{}", v)),
            Value::Map(map) => write_joined(f, "{", "}", map, |f, (k, v)| write!(f, "{}: {}", k, v)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::NodeRef(id)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
