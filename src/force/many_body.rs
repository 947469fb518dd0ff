//! Many-body (charge) force.
//!
//! Every node repels (negative strength) or attracts (positive strength)
//! every other node with magnitude `strength * alpha / distance`. Evaluation
//! uses the Barnes–Hut approximation: a quadtree cell whose width is small
//! relative to its distance from the node (`width / distance < theta`) acts
//! as a single body at its charge-weighted centroid, giving O(n log n) per
//! tick instead of O(n²).

use super::{Force, ForceContext, NodeParam, any, eval_nodes};
use crate::error::ConfigError;
use crate::graph::Graph;
use crate::spatial::{Cell, QuadTree};

#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    strength: NodeParam,
    theta: f64,
    distance_min: f64,
    distance_max: f64,
    strengths: Vec<f64>,
}

impl ManyBodyForce {
    /// Default strength -30, theta 0.9, distance range [1, ∞).
    pub fn new() -> Self {
        Self {
            strength: NodeParam::constant(-30.0),
            theta: 0.9,
            distance_min: 1.0,
            distance_max: f64::INFINITY,
            strengths: Vec::new(),
        }
    }

    pub fn strength(mut self, strength: impl Into<NodeParam>) -> Self {
        self.strength = strength.into();
        self
    }

    /// Barnes–Hut accuracy threshold; smaller is more exact.
    pub fn theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Distances below this are clamped, which bounds the force between
    /// nearly coincident nodes.
    pub fn distance_min(mut self, distance: f64) -> Self {
        self.distance_min = distance;
        self
    }

    /// Pairs further apart than this are ignored.
    pub fn distance_max(mut self, distance: f64) -> Self {
        self.distance_max = distance;
        self
    }
}

impl Default for ManyBodyForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for ManyBodyForce {
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError> {
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(ConfigError::out_of_range(name, "theta", self.theta, "must be > 0"));
        }
        if !(self.distance_min.is_finite() && self.distance_min >= 0.0) {
            return Err(ConfigError::out_of_range(
                name,
                "distance_min",
                self.distance_min,
                "must be finite and >= 0",
            ));
        }
        if self.distance_max.is_nan() || self.distance_max < self.distance_min {
            return Err(ConfigError::out_of_range(
                name,
                "distance_max",
                self.distance_max,
                "must be >= distance_min",
            ));
        }
        self.strengths = eval_nodes(graph, &self.strength, name, "strength", any)?;
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let n = ctx.bodies.len();
        if n < 2 {
            return;
        }

        let mut tree = QuadTree::build(&ctx.bodies.x, &ctx.bodies.y);
        tree.accumulate(&self.strengths, &ctx.bodies.x, &ctx.bodies.y);

        let theta2 = self.theta * self.theta;
        let min2 = self.distance_min * self.distance_min;
        let max2 = self.distance_max * self.distance_max;
        let alpha = ctx.alpha;

        let mut stack = Vec::new();
        for i in 0..n {
            let (xi, yi) = (ctx.bodies.x[i], ctx.bodies.y[i]);
            let (mut dvx, mut dvy) = (0.0, 0.0);

            stack.clear();
            stack.push((tree.root(), tree.extent()));

            while let Some((q, extent)) = stack.pop() {
                let quad = tree.quad(q);
                if quad.value == 0.0 {
                    continue;
                }

                let mut x = quad.x - xi;
                let mut y = quad.y - yi;
                let w = extent.width();
                let mut l = x * x + y * y;

                // Far enough away: treat the whole cell as one body.
                if w * w / theta2 < l {
                    if l < max2 {
                        if x == 0.0 {
                            x = ctx.jiggle.offset();
                            l += x * x;
                        }
                        if y == 0.0 {
                            y = ctx.jiggle.offset();
                            l += y * y;
                        }
                        if l < min2 {
                            l = (min2 * l).sqrt();
                        }
                        dvx += x * quad.value * alpha / l;
                        dvy += y * quad.value * alpha / l;
                    }
                    continue;
                }

                match &quad.cell {
                    Cell::Empty => {}
                    Cell::Branch(children) => {
                        for k in (0..4).rev() {
                            if let Some(child) = children[k] {
                                stack.push((child, extent.quadrant(k)));
                            }
                        }
                    }
                    Cell::Leaf(points) => {
                        if l >= max2 {
                            continue;
                        }
                        if points.len() > 1 || points[0] != i {
                            if x == 0.0 {
                                x = ctx.jiggle.offset();
                                l += x * x;
                            }
                            if y == 0.0 {
                                y = ctx.jiggle.offset();
                                l += y * y;
                            }
                            if l < min2 {
                                l = (min2 * l).sqrt();
                            }
                        }
                        for &p in points {
                            if p != i {
                                let s = self.strengths[p] * alpha / l;
                                dvx += x * s;
                                dvy += y * s;
                            }
                        }
                    }
                }
            }

            ctx.bodies.accelerate(i, dvx, dvy);
        }
    }
}
