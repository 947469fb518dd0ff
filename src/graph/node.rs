//! Node type and related structures.
//!
//! Nodes are the vertices in the graph. Each node has:
//! - A stable identifier (its slot in the position/velocity buffers)
//! - The caller's string key, unique within a graph
//! - An attribute bag (team, role, centrality metrics, ...) that stays
//!   immutable for the lifetime of the graph

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Stable node identifier.
///
/// Wraps the node's slot index in the graph's Structure of Arrays buffers.
/// Topology is fixed after construction, so an id never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Slot index into the body buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A single attribute value supplied by the caller.
///
/// Nulls, lists and nested objects are accepted but carry no value: every
/// view of them is absent, as if the attribute were missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Null,
    Other(IgnoredAny),
}

impl AttributeValue {
    /// Numeric view. Flags map to 0/1, text never converts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Categorical key used when grouping nodes by this value.
    pub fn category(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Flag(b) => Some(b.to_string()),
            Self::Null | Self::Other(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Attribute bag keyed by attribute name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Caller-supplied description of a node.
///
/// Deserializes from `{ "id": "alice", "team": "Product", "betweenness": 0.2 }`;
/// every field other than `id`, `x` and `y` lands in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the initial position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Add an attribute.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A node resolved into a [`Graph`](super::Graph).
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    key: String,
    attributes: Attributes,
}

impl Node {
    pub(crate) fn new(id: NodeId, key: String, attributes: Attributes) -> Self {
        Self {
            id,
            key,
            attributes,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The caller's key for this node.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Numeric attribute, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(AttributeValue::as_f64)
    }

    /// Text attribute, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AttributeValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_attribute_views() {
        assert_eq!(AttributeValue::from(2.5).as_f64(), Some(2.5));
        assert_eq!(AttributeValue::from(true).as_f64(), Some(1.0));
        assert_eq!(AttributeValue::from("Lead").as_f64(), None);
        assert_eq!(AttributeValue::from("Lead").as_str(), Some("Lead"));
        assert_eq!(AttributeValue::from(3.0).category().as_deref(), Some("3"));
        assert_eq!(AttributeValue::Null.as_str(), None);
        assert_eq!(AttributeValue::Other(IgnoredAny).category(), None);
    }

    #[test]
    fn test_spec_builder() {
        let spec = NodeSpec::new("alice")
            .at(1.0, 2.0)
            .with("team", "Product")
            .with("betweenness", 0.25);
        assert_eq!(spec.x, Some(1.0));
        assert_eq!(spec.attributes.len(), 2);
    }

    #[test]
    fn test_spec_deserialize_flattens_attributes() {
        let value = serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
            vec![("id", "bob"), ("team", "Design"), ("role", "Lead")].into_iter(),
        );
        let spec = NodeSpec::deserialize(value).unwrap();
        assert_eq!(spec.id, "bob");
        assert_eq!(spec.x, None);
        assert_eq!(
            spec.attributes.get("team"),
            Some(&AttributeValue::Text("Design".into()))
        );
        assert_eq!(spec.attributes.len(), 2);
    }

    #[test]
    fn test_unusable_attributes_are_kept_as_absent() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{"id":"a","team":"X","manager":null,"skills":["rust"],"meta":{"floor":3}}"#,
        )
        .unwrap();
        assert_eq!(spec.attributes.len(), 4);
        assert_eq!(spec.attributes.get("manager"), Some(&AttributeValue::Null));
        assert_eq!(spec.attributes["skills"].as_str(), None);
        assert_eq!(spec.attributes["meta"].as_f64(), None);
        assert_eq!(spec.attributes["team"].as_str(), Some("X"));
    }
}
