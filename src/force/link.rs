//! Link (spring) force.
//!
//! Each link pulls or pushes its endpoints toward a target separation. The
//! correction is split between the two endpoints by degree, so a leaf
//! attached to a hub moves more than the hub does. Positions are predicted
//! one step ahead (`x + vx`) to damp oscillation.

use super::{Force, ForceContext, LinkParam, non_negative};
use crate::error::ConfigError;
use crate::graph::Graph;

#[derive(Debug, Clone)]
pub struct LinkForce {
    distance: LinkParam,
    /// `None` means `1 / min(degree(source), degree(target))`.
    strength: Option<LinkParam>,
    iterations: usize,
    endpoints: Vec<(usize, usize)>,
    distances: Vec<f64>,
    strengths: Vec<f64>,
    bias: Vec<f64>,
}

impl LinkForce {
    /// Default distance 30, degree-based strength, one iteration.
    pub fn new() -> Self {
        Self {
            distance: LinkParam::constant(30.0),
            strength: None,
            iterations: 1,
            endpoints: Vec::new(),
            distances: Vec::new(),
            strengths: Vec::new(),
            bias: Vec::new(),
        }
    }

    pub fn distance(mut self, distance: impl Into<LinkParam>) -> Self {
        self.distance = distance.into();
        self
    }

    pub fn strength(mut self, strength: impl Into<LinkParam>) -> Self {
        self.strength = Some(strength.into());
        self
    }

    /// Number of relaxation passes per tick. More passes make links
    /// stiffer at proportional cost.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for LinkForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for LinkForce {
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::out_of_range(name, "iterations", 0.0, "must be >= 1"));
        }

        let count = graph.link_count();
        let mut endpoints = Vec::with_capacity(count);
        let mut distances = Vec::with_capacity(count);
        let mut strengths = Vec::with_capacity(count);
        let mut bias = Vec::with_capacity(count);

        for link in graph.link_refs() {
            let (s, t) = (link.link.source(), link.link.target());
            let ds = graph.degree(s) as f64;
            let dt = graph.degree(t) as f64;

            let distance = self.distance.eval(&link);
            if !distance.is_finite() {
                return Err(ConfigError::out_of_range(name, "distance", distance, "must be finite"));
            }
            non_negative(distance)
                .map_err(|reason| ConfigError::out_of_range(name, "distance", distance, reason))?;

            let strength = match &self.strength {
                Some(param) => param.eval(&link),
                None => 1.0 / ds.min(dt),
            };
            if !strength.is_finite() {
                return Err(ConfigError::out_of_range(name, "strength", strength, "must be finite"));
            }
            non_negative(strength)
                .map_err(|reason| ConfigError::out_of_range(name, "strength", strength, reason))?;

            endpoints.push((s.index(), t.index()));
            distances.push(distance);
            strengths.push(strength);
            bias.push(ds / (ds + dt));
        }

        self.endpoints = endpoints;
        self.distances = distances;
        self.strengths = strengths;
        self.bias = bias;
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let b = &mut *ctx.bodies;
        for _ in 0..self.iterations {
            for (k, &(s, t)) in self.endpoints.iter().enumerate() {
                let mut x = b.x[t] + b.vx[t] - b.x[s] - b.vx[s];
                let mut y = b.y[t] + b.vy[t] - b.y[s] - b.vy[s];
                if x == 0.0 {
                    x = ctx.jiggle.offset();
                }
                if y == 0.0 {
                    y = ctx.jiggle.offset();
                }
                let l = (x * x + y * y).sqrt();
                let l = (l - self.distances[k]) / l * ctx.alpha * self.strengths[k];
                x *= l;
                y *= l;

                let bias = self.bias[k];
                b.vx[t] -= x * bias;
                b.vy[t] -= y * bias;
                b.vx[s] += x * (1.0 - bias);
                b.vy[s] += y * (1.0 - bias);
            }
        }
    }
}
