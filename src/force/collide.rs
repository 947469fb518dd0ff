//! Collision force.
//!
//! Treats every node as a disc and pushes overlapping pairs apart along the
//! line between their centres. Like the link force it works on predicted
//! positions (`x + vx`). The push is shared in inverse proportion to the
//! discs' areas, so a small node bounces off a large one.
//!
//! Candidate pairs come from an R-tree over predicted positions, queried
//! with `r_i + max_r`; each unordered pair is resolved once per iteration.

use super::{Force, ForceContext, NodeParam, eval_nodes, non_negative};
use crate::error::ConfigError;
use crate::graph::Graph;
use crate::spatial::SpatialIndex;

#[derive(Debug, Clone)]
pub struct CollideForce {
    radius: NodeParam,
    strength: f64,
    iterations: usize,
    radii: Vec<f64>,
    max_radius: f64,
}

impl CollideForce {
    /// Collide with the given per-node radius, strength 1, one iteration.
    pub fn new(radius: impl Into<NodeParam>) -> Self {
        Self {
            radius: radius.into(),
            strength: 1.0,
            iterations: 1,
            radii: Vec::new(),
            max_radius: 0.0,
        }
    }

    /// How much of the overlap is resolved per iteration, in `[0, 1]`.
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Radii evaluated at initialization, by node slot.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }
}

impl Default for CollideForce {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Force for CollideForce {
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ConfigError::out_of_range(
                name,
                "strength",
                self.strength,
                "must be within [0, 1]",
            ));
        }
        if self.iterations == 0 {
            return Err(ConfigError::out_of_range(name, "iterations", 0.0, "must be >= 1"));
        }
        self.radii = eval_nodes(graph, &self.radius, name, "radius", non_negative)?;
        self.max_radius = self.radii.iter().copied().fold(0.0, f64::max);
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let n = ctx.bodies.len();
        if n < 2 || self.max_radius == 0.0 {
            return;
        }

        let strength = self.strength;
        let radii = &self.radii;
        let mut px = vec![0.0; n];
        let mut py = vec![0.0; n];
        let mut index = SpatialIndex::new();

        for _ in 0..self.iterations {
            let b = &mut *ctx.bodies;
            for i in 0..n {
                px[i] = b.x[i] + b.vx[i];
                py[i] = b.y[i] + b.vy[i];
            }
            index.rebuild(&px, &py);

            let jiggle = &mut *ctx.jiggle;
            for i in 0..n {
                let ri = radii[i];
                let ri2 = ri * ri;
                let (xi, yi) = (b.x[i] + b.vx[i], b.y[i] + b.vy[i]);

                index.for_each_in_radius(px[i], py[i], ri + self.max_radius, |point| {
                    let j = point.id.index();
                    if j <= i {
                        return;
                    }
                    let rj = radii[j];
                    let r = ri + rj;
                    let mut x = xi - b.x[j] - b.vx[j];
                    let mut y = yi - b.y[j] - b.vy[j];
                    let mut l = x * x + y * y;
                    if l >= r * r {
                        return;
                    }
                    if x == 0.0 {
                        x = jiggle.offset();
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = jiggle.offset();
                        l += y * y;
                    }
                    let d = l.sqrt();
                    let l = (r - d) / d * strength;
                    x *= l;
                    y *= l;

                    let rj2 = rj * rj;
                    let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };
                    b.vx[i] += x * share;
                    b.vy[i] += y * share;
                    b.vx[j] -= x * (1.0 - share);
                    b.vy[j] -= y * (1.0 - share);
                });
            }
        }
    }
}
