//! Centering force.
//!
//! Shifts every node by the same amount so that the centroid of the whole
//! graph moves toward a fixed point. Relative positions are unaffected, so
//! the force cancels drift without distorting the layout. It does not scale
//! with alpha.

use super::{Force, ForceContext};
use crate::error::ConfigError;
use crate::graph::Graph;

#[derive(Debug, Clone)]
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, strength: 1.0 }
    }

    /// Fraction of the centroid offset corrected per tick, in `[0, 1]`.
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl Default for CenterForce {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Force for CenterForce {
    fn initialize(&mut self, _graph: &Graph, name: &str) -> Result<(), ConfigError> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(ConfigError::out_of_range(
                name,
                "center",
                if self.x.is_finite() { self.y } else { self.x },
                "must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ConfigError::out_of_range(
                name,
                "strength",
                self.strength,
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }

    fn apply(&mut self, ctx: &mut ForceContext<'_>) {
        let Some((cx, cy)) = ctx.bodies.centroid() else {
            return;
        };
        let dx = (cx - self.x) * self.strength;
        let dy = (cy - self.y) * self.strength;
        for i in 0..ctx.bodies.len() {
            ctx.bodies.accelerate(i, -dx, -dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::testing::apply_once;
    use crate::graph::NodeSpec;

    #[test]
    fn test_uniform_shift_toward_center() {
        let mut graph = Graph::from_parts(
            vec![NodeSpec::new("a").at(10.0, 10.0), NodeSpec::new("b").at(30.0, 10.0)],
            vec![],
        )
        .unwrap();
        let mut force = CenterForce::new(0.0, 0.0);
        force.initialize(&graph, "center").unwrap();
        apply_once(&mut force, &mut graph, 0.0);

        assert_eq!(graph.bodies().velocity(0), (-20.0, -10.0));
        assert_eq!(graph.bodies().velocity(1), (-20.0, -10.0));
    }

    #[test]
    fn test_centered_graph_is_untouched() {
        let mut graph = Graph::from_parts(
            vec![NodeSpec::new("a").at(-5.0, 0.0), NodeSpec::new("b").at(5.0, 0.0)],
            vec![],
        )
        .unwrap();
        let mut force = CenterForce::default();
        force.initialize(&graph, "center").unwrap();
        apply_once(&mut force, &mut graph, 1.0);
        assert_eq!(graph.bodies().velocity(0), (0.0, 0.0));
    }

    #[test]
    fn test_invalid_strength() {
        let graph = Graph::default();
        assert!(CenterForce::default().strength(1.5).initialize(&graph, "center").is_err());
        assert!(CenterForce::new(f64::NAN, 0.0).initialize(&graph, "center").is_err());
    }
}
