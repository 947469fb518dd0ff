//! Per-node and per-link force parameters.
//!
//! Every tunable parameter is a function of the node (or link) it applies
//! to. A constant is a function that ignores its argument, so forces never
//! need to branch on "value or accessor".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::graph::{LinkRef, Node};

type NodeFn = dyn Fn(&Node) -> f64 + Send + Sync;
type LinkFn = dyn Fn(&LinkRef<'_>) -> f64 + Send + Sync;

/// A parameter evaluated per node.
#[derive(Clone)]
pub struct NodeParam(Arc<NodeFn>);

impl NodeParam {
    pub fn constant(value: f64) -> Self {
        Self(Arc::new(move |_| value))
    }

    pub fn from_fn(f: impl Fn(&Node) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Read a numeric attribute, falling back to `default` when absent.
    pub fn attribute(name: impl Into<String>, default: f64) -> Self {
        let name = name.into();
        Self::from_fn(move |node| node.number(&name).unwrap_or(default))
    }

    /// `if_match` for nodes whose text attribute `name` equals `value`,
    /// `otherwise` for everyone else.
    pub fn by_group(
        name: impl Into<String>,
        value: impl Into<String>,
        if_match: f64,
        otherwise: f64,
    ) -> Self {
        let name = name.into();
        let value = value.into();
        Self::from_fn(move |node| {
            if node.text(&name) == Some(value.as_str()) {
                if_match
            } else {
                otherwise
            }
        })
    }

    /// Look up a text attribute in a table of values, falling back to
    /// `default` for absent attributes and unlisted categories.
    pub fn lookup<K: Into<String>>(
        name: impl Into<String>,
        table: impl IntoIterator<Item = (K, f64)>,
        default: f64,
    ) -> Self {
        let name = name.into();
        let table: HashMap<String, f64> = table.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::from_fn(move |node| {
            node.text(&name)
                .and_then(|value| table.get(value).copied())
                .unwrap_or(default)
        })
    }

    /// Scale this parameter by a constant factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self::from_fn(move |node| (self.0)(node) * factor)
    }

    #[inline]
    pub fn eval(&self, node: &Node) -> f64 {
        (self.0)(node)
    }
}

impl From<f64> for NodeParam {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl fmt::Debug for NodeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeParam(..)")
    }
}

/// A parameter evaluated per link, with access to both endpoint nodes.
#[derive(Clone)]
pub struct LinkParam(Arc<LinkFn>);

impl LinkParam {
    pub fn constant(value: f64) -> Self {
        Self(Arc::new(move |_| value))
    }

    pub fn from_fn(f: impl Fn(&LinkRef<'_>) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The link's own weight.
    pub fn weight() -> Self {
        Self::from_fn(|link| link.weight())
    }

    #[inline]
    pub fn eval(&self, link: &LinkRef<'_>) -> f64 {
        (self.0)(link)
    }
}

impl From<f64> for LinkParam {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl fmt::Debug for LinkParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkParam(..)")
    }
}
