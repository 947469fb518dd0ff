//! Named, ordered collection of forces.
//!
//! Forces are applied in registration order. Replacing a force keeps the
//! slot of the one it replaces so that the evaluation order of a fixed
//! configuration never depends on how it was edited.

use super::{Force, ForceContext};
use crate::error::ConfigError;
use crate::graph::Graph;

#[derive(Default)]
pub struct ForceRegistry {
    entries: Vec<(String, Box<dyn Force>)>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize `force` against `graph` and register it under `name`.
    ///
    /// If a force with that name exists it is replaced in place. When
    /// initialization fails the registry is left untouched, so a previously
    /// registered force of the same name stays active.
    pub fn insert(
        &mut self,
        name: &str,
        mut force: Box<dyn Force>,
        graph: &Graph,
    ) -> Result<(), ConfigError> {
        if let Err(err) = force.initialize(graph, name) {
            log::warn!("rejected force `{name}`: {err}");
            return Err(err);
        }

        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => {
                entry.1 = force;
                log::debug!("replaced force `{name}`");
            }
            None => {
                self.entries.push((name.to_string(), force));
                log::debug!("registered force `{name}`");
            }
        }
        Ok(())
    }

    /// Remove the force registered under `name`. Returns whether one was.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("removed force `{name}`");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Registered names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every force once, in order.
    pub fn apply_all(&mut self, ctx: &mut ForceContext<'_>) {
        for (_, force) in &mut self.entries {
            force.apply(ctx);
        }
    }
}

impl std::fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::{CenterForce, CollideForce, Jiggle, ManyBodyForce, PositionForce};
    use crate::graph::NodeSpec;

    fn graph() -> Graph {
        Graph::from_parts(
            vec![NodeSpec::new("a").at(10.0, 0.0), NodeSpec::new("b").at(30.0, 0.0)],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_registration_order() {
        let graph = graph();
        let mut registry = ForceRegistry::new();
        registry.insert("charge", Box::new(ManyBodyForce::new()), &graph).unwrap();
        registry.insert("center", Box::new(CenterForce::default()), &graph).unwrap();
        registry.insert("x", Box::new(PositionForce::x(0.0)), &graph).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["charge", "center", "x"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let graph = graph();
        let mut registry = ForceRegistry::new();
        registry.insert("charge", Box::new(ManyBodyForce::new()), &graph).unwrap();
        registry.insert("center", Box::new(CenterForce::default()), &graph).unwrap();
        registry
            .insert("charge", Box::new(ManyBodyForce::new().strength(-100.0)), &graph)
            .unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["charge", "center"]);
    }

    #[test]
    fn test_rejected_replacement_keeps_previous() {
        let mut graph = graph();
        let mut registry = ForceRegistry::new();
        registry.insert("center", Box::new(CenterForce::new(0.0, 0.0)), &graph).unwrap();
        let err = registry
            .insert("center", Box::new(CenterForce::default().strength(7.0)), &graph)
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
        assert!(registry.contains("center"));

        // The original strength-1 center force is still the one applied.
        let mut jiggle = Jiggle::default();
        let mut ctx = ForceContext {
            bodies: graph.bodies_mut(),
            alpha: 1.0,
            jiggle: &mut jiggle,
        };
        registry.apply_all(&mut ctx);
        assert_eq!(graph.bodies().velocity(0), (-20.0, 0.0));
    }

    #[test]
    fn test_rejected_new_force_is_not_added() {
        let graph = graph();
        let mut registry = ForceRegistry::new();
        assert!(registry.insert("collide", Box::new(CollideForce::new(-3.0)), &graph).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        let graph = graph();
        let mut registry = ForceRegistry::new();
        registry.insert("center", Box::new(CenterForce::default()), &graph).unwrap();
        assert!(registry.remove("center"));
        assert!(!registry.remove("center"));
        assert!(!registry.contains("center"));
    }
}
