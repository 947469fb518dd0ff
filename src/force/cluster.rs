//! Cluster force: groups nodes by a categorical attribute.
//!
//! Every tick the centroid of each group is recomputed from current
//! positions (centroids move as the layout evolves, so they are never
//! carried over between ticks) and every member's velocity is nudged toward
//! its group's centroid by `strength * alpha`. Group membership itself is
//! resolved once at initialization because attributes are immutable.
//!
//! Nodes lacking the attribute join a shared fallback group rather than
//! failing the tick.

use std::collections::HashMap;

use super::{Force, ForceContext};
use crate::error::ConfigError;
use crate::graph::{AttributeValue, Graph};

/// Group that nodes without the grouping attribute fall into.
pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone)]
pub struct ClusterForce {
    attribute: String,
    strength: f64,
    /// Group index per node.
    membership: Vec<usize>,
    group_names: Vec<String>,
    /// Scratch: (sum x, sum y, count) per group.
    sums: Vec<(f64, f64, usize)>,
}

impl ClusterForce {
    /// Group by `attribute` with the given strength in `[0, 1]`.
    pub fn new(attribute: impl Into<String>, strength: f64) -> Self {
        Self {
            attribute: attribute.into(),
            strength,
            membership: Vec::new(),
            group_names: Vec::new(),
            sums: Vec::new(),
        }
    }

    /// Group by `team` with strength 0.3.
    pub fn by_team() -> Self {
        Self::new("team", 0.3)
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Names of the groups found at initialization, in first-seen order.
    pub fn groups(&self) -> &[String] {
        &self.group_names
    }
}

impl Default for ClusterForce {
    fn default() -> Self {
        Self::by_team()
    }
}

impl Force for ClusterForce {
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ConfigError::out_of_range(
                name,
                "strength",
                self.strength,
                "must be within [0, 1]",
            ));
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut group_names = Vec::new();
        let mut membership = Vec::with_capacity(graph.node_count());
        let mut missing = 0usize;

        for node in graph.nodes() {
            let category = node
                .attribute(&self.attribute)
                .and_then(AttributeValue::category);
            let group = match category {
                Some(group) => group,
                None => {
                    missing += 1;
                    DEFAULT_GROUP.to_string()
                }
            };
            let next = group_names.len();
            let g = *index.entry(group.clone()).or_insert_with(|| {
                group_names.push(group);
                next
            });
            membership.push(g);
        }

        if missing > 0 {
            log::warn!(
                "force `{name}`: {missing} node(s) lack `{}`; grouping them as `{DEFAULT_GROUP}`",
                self.attribute
            );
        }

        self.sums = vec![(0.0, 0.0, 0); group_names.len()];
        self.membership = membership;
        self.group_names = group_names;
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let b = &mut *ctx.bodies;

        for sum in &mut self.sums {
            *sum = (0.0, 0.0, 0);
        }
        for (i, &g) in self.membership.iter().enumerate() {
            let sum = &mut self.sums[g];
            sum.0 += b.x[i];
            sum.1 += b.y[i];
            sum.2 += 1;
        }

        let k = self.strength * ctx.alpha;
        for (i, &g) in self.membership.iter().enumerate() {
            let (sx, sy, count) = self.sums[g];
            let n = count as f64;
            b.vx[i] += (sx / n - b.x[i]) * k;
            b.vy[i] += (sy / n - b.y[i]) * k;
        }
    }
}
