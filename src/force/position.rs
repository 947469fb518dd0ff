//! Per-axis positioning forces.
//!
//! A weak spring along one axis toward a target coordinate. Used in pairs
//! (x and y) as a soft gravity toward the viewport middle, or alone for
//! directional layouts such as levelling by hierarchy.

use super::{Force, ForceContext, NodeParam, any, eval_nodes, unit_interval};
use crate::error::ConfigError;
use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone)]
pub struct PositionForce {
    axis: Axis,
    target: NodeParam,
    strength: NodeParam,
    targets: Vec<f64>,
    strengths: Vec<f64>,
}

impl PositionForce {
    /// Pull toward `target` along `axis` with strength 0.1.
    pub fn new(axis: Axis, target: impl Into<NodeParam>) -> Self {
        Self {
            axis,
            target: target.into(),
            strength: NodeParam::constant(0.1),
            targets: Vec::new(),
            strengths: Vec::new(),
        }
    }

    pub fn x(target: impl Into<NodeParam>) -> Self {
        Self::new(Axis::X, target)
    }

    pub fn y(target: impl Into<NodeParam>) -> Self {
        Self::new(Axis::Y, target)
    }

    /// Fraction of the remaining offset closed per tick (before alpha),
    /// in `[0, 1]`.
    pub fn strength(mut self, strength: impl Into<NodeParam>) -> Self {
        self.strength = strength.into();
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl Force for PositionForce {
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError> {
        self.targets = eval_nodes(graph, &self.target, name, "target", any)?;
        self.strengths = eval_nodes(graph, &self.strength, name, "strength", unit_interval)?;
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let b = &mut *ctx.bodies;
        let (pos, vel) = match self.axis {
            Axis::X => (&b.x, &mut b.vx),
            Axis::Y => (&b.y, &mut b.vy),
        };
        for i in 0..pos.len() {
            vel[i] += (self.targets[i] - pos[i]) * self.strengths[i] * ctx.alpha;
        }
    }
}
