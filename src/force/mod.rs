//! Force units.
//!
//! A force is one contributor to the per-tick change in node velocities.
//! Each unit holds only its configuration plus whatever it precomputed in
//! [`Force::initialize`]; on every tick it reads positions and adds to
//! velocities through a [`ForceContext`]. Forces never move nodes.
//!
//! | Force | Rationale |
//! |-------|-----------|
//! | [`LinkForce`] | springs pull linked nodes toward a target separation |
//! | [`ManyBodyForce`] | pairwise repulsion, Barnes–Hut approximated |
//! | [`CenterForce`] | keeps the centroid at a fixed point |
//! | [`CollideForce`] | pushes overlapping discs apart |
//! | [`PositionForce`] | weak per-axis pull toward a coordinate |
//! | [`ClusterForce`] | pulls nodes toward their group's centroid |

mod center;
mod cluster;
mod collide;
mod jiggle;
mod link;
mod many_body;
mod param;
mod position;
mod registry;

pub use center::CenterForce;
pub use cluster::ClusterForce;
pub use collide::CollideForce;
pub use jiggle::Jiggle;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;
pub use param::{LinkParam, NodeParam};
pub use position::{Axis, PositionForce};
pub use registry::ForceRegistry;

use crate::error::ConfigError;
use crate::graph::{Bodies, Graph};

/// Per-tick view handed to a force.
pub struct ForceContext<'a> {
    /// Node positions (read) and velocities (accumulate).
    pub bodies: &'a mut Bodies,
    /// Current convergence value in `[0, 1]`.
    pub alpha: f64,
    /// Source of tiny offsets for separating coincident nodes.
    pub jiggle: &'a mut Jiggle,
}

/// A composable contributor to node velocities.
pub trait Force {
    /// Precompute per-node and per-link parameters for `graph` and
    /// validate them. Called once when the force is registered under
    /// `name`; a returned error keeps the force out of the simulation.
    fn initialize(&mut self, graph: &Graph, name: &str) -> Result<(), ConfigError>;

    /// Add this force's contribution to every affected node's velocity.
    fn apply(&mut self, ctx: &mut ForceContext<'_>);
}

/// Evaluate a per-node parameter for every node, rejecting non-finite
/// values and anything `valid` refuses.
pub(crate) fn eval_nodes(
    graph: &Graph,
    param: &NodeParam,
    force: &str,
    parameter: &'static str,
    valid: impl Fn(f64) -> Result<(), &'static str>,
) -> Result<Vec<f64>, ConfigError> {
    graph
        .nodes()
        .iter()
        .map(|node| {
            let value = param.eval(node);
            if !value.is_finite() {
                return Err(ConfigError::out_of_range(
                    force,
                    parameter,
                    value,
                    "must be finite",
                ));
            }
            valid(value).map_err(|reason| ConfigError::out_of_range(force, parameter, value, reason))?;
            Ok(value)
        })
        .collect()
}

/// Reject negative values.
pub(crate) fn non_negative(value: f64) -> Result<(), &'static str> {
    if value < 0.0 { Err("must be >= 0") } else { Ok(()) }
}

/// Reject values outside `[0, 1]`.
pub(crate) fn unit_interval(value: f64) -> Result<(), &'static str> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err("must be within [0, 1]")
    }
}

/// Accept any finite value.
pub(crate) fn any(_: f64) -> Result<(), &'static str> {
    Ok(())
}
