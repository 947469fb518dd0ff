//! Link type and related structures.
//!
//! Links are the connections between nodes. Each link has:
//! - A stable identifier (its position in the input link list)
//! - Source and target node ids, resolved once at construction
//! - A caller-supplied weight, read-only to forces

use std::fmt;

use serde::Deserialize;

use super::node::{Attributes, AttributeValue, Node, NodeId};

/// Stable link identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

fn unit_weight() -> f64 {
    1.0
}

/// Caller-supplied description of a link, referencing nodes by key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkSpec {
    pub source: String,
    pub target: String,
    #[serde(default = "unit_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl LinkSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 1.0,
            attributes: Attributes::new(),
        }
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A link whose endpoints have been resolved to node ids.
#[derive(Debug, Clone)]
pub struct Link {
    id: LinkId,
    source: NodeId,
    target: NodeId,
    weight: f64,
    attributes: Attributes,
}

impl Link {
    pub(crate) fn new(
        id: LinkId,
        source: NodeId,
        target: NodeId,
        weight: f64,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            source,
            target,
            weight,
            attributes,
        }
    }

    #[inline]
    pub fn id(&self) -> LinkId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// A link together with its resolved endpoint nodes.
///
/// This is what link parameters are evaluated against, so a distance can
/// depend on e.g. the source node's team.
#[derive(Debug, Clone, Copy)]
pub struct LinkRef<'a> {
    pub link: &'a Link,
    pub source: &'a Node,
    pub target: &'a Node,
}

impl LinkRef<'_> {
    #[inline]
    pub fn weight(&self) -> f64 {
        self.link.weight()
    }

    /// True if either endpoint's `attribute` equals `value`.
    pub fn touches(&self, attribute: &str, value: &str) -> bool {
        self.source.text(attribute) == Some(value) || self.target.text(attribute) == Some(value)
    }
}
