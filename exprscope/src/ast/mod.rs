//! Read-only view over a syntax tree produced by an external parser.
//!
//! The tree mirrors the shape emitted by whitequark-style Ruby parsers: every
//! node has a type tag, an ordered list of children (nodes, literal values
//! such as method names, or `null` for absent slots), and a location map with
//! the expression range plus whichever auxiliary ranges the grammar provides.

mod range;

pub use range::{InvalidRange, Range};

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A syntax node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Type tag, e.g. `send`, `lvasgn`, `dstr`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<Child>,
    /// Source ranges for the node and its tokens.
    #[serde(default)]
    pub location: Location,
}

/// One child slot of a [`Node`].
///
/// Decoding is by JSON shape: `null` is [`Child::Absent`], an object must be a
/// valid [`Node`], anything else is a [`Child::Literal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Child {
    /// A nested node.
    Node(Box<Node>),
    /// An empty slot (`nil` receiver, missing else branch, ...).
    Absent,
    /// A literal value: symbol names, integers, floats.
    Literal(Value),
}

/// Source ranges attached to a node.
///
/// Only `expression` is present on (almost) every node; the others exist when
/// the grammar has a corresponding token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The whole expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Range>,
    /// Opening delimiter (`(`, `[`, `{`, `<<~EOS`, `%w[`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<Range>,
    /// Closing delimiter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Range>,
    /// Leading keyword (`if`, `unless`, `elsif`, `while`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<Range>,
    /// Method name of a message send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Range>,
    /// The `?` of a ternary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Range>,
    /// The `:` of a ternary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colon: Option<Range>,
    /// Assignment or binary operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Range>,
    /// The `.` or `&.` of a message send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot: Option<Range>,
}

impl Node {
    /// Create a node with no location information.
    #[must_use]
    pub fn new(kind: impl Into<String>, children: Vec<Child>) -> Self {
        Self {
            kind: kind.into(),
            children,
            location: Location::default(),
        }
    }

    /// The node's type tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether the node's type tag is `kind`.
    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// The expression range, absent for synthetic nodes.
    #[must_use]
    pub fn expression(&self) -> Option<Range> {
        self.location.expression
    }

    /// The child node at `index`, if that slot holds a node.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index).and_then(Child::as_node)
    }

    /// The last child node, if the last slot holds a node.
    #[must_use]
    pub fn last_child(&self) -> Option<&Node> {
        self.children.last().and_then(Child::as_node)
    }

    /// The literal symbol/string at `index`, if that slot holds one.
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<&str> {
        match self.children.get(index) {
            Some(Child::Literal(value)) => value.as_str(),
            _ => None,
        }
    }

    /// Child nodes in slots `skip..`.
    pub fn child_nodes_from(&self, skip: usize) -> impl Iterator<Item = &Node> {
        self.children.iter().skip(skip).filter_map(Child::as_node)
    }

    /// The source text of the expression range.
    #[must_use]
    pub fn source<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.expression().and_then(|range| range.source(text))
    }
}

impl Child {
    /// The nested node, if any.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Absent | Self::Literal(_) => None,
        }
    }

    /// A literal symbol child.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::Literal(Value::String(name.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Child {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChildVisitor)
    }
}

struct ChildVisitor;

impl<'de> Visitor<'de> for ChildVisitor {
    type Value = Child;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a node object, null, or a literal value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Child, E> {
        Ok(Child::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<Child, E> {
        Ok(Child::Absent)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Child, E> {
        Ok(Child::Literal(Value::from(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Child, A::Error> {
        let items = Vec::<Value>::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(Child::Literal(Value::Array(items)))
    }

    // an object is always a node
    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Child, A::Error> {
        Node::deserialize(MapAccessDeserializer::new(map)).map(Child::from)
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Self::Node(Box::new(node))
    }
}
