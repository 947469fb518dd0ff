//! Drag gestures.
//!
//! A drag pins its node so the user's pointer overrides the physics, and
//! keeps the simulation warm while any gesture is active: the first gesture
//! to start reheats, the last one to end settles. Gestures are keyed by
//! pointer id, so several pointers can drag different nodes at once.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::graph::NodeId;
use crate::simulation::Simulation;

/// Pointer identifier supplied by the host (mouse = 0, touches > 0, ...).
pub type PointerId = u32;

/// Alpha target held while at least one drag is active.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    node: NodeId,
    /// Node position minus pointer position at grab time, so the node does
    /// not jump to the pointer when grabbed off-centre.
    offset: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct DragController {
    gestures: BTreeMap<PointerId, Gesture>,
    reheat_target: f64,
}

impl DragController {
    pub fn new() -> Self {
        Self {
            gestures: BTreeMap::new(),
            reheat_target: DRAG_ALPHA_TARGET,
        }
    }

    /// Use a different alpha target while dragging.
    pub fn with_reheat_target(target: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&target) {
            return Err(ConfigError::InvalidSimulation {
                parameter: "alpha_target",
                value: target,
            });
        }
        Ok(Self {
            gestures: BTreeMap::new(),
            reheat_target: target,
        })
    }

    /// Begin dragging `node` with `pointer`, grabbed at `grab` (simulation
    /// coordinates). The node is pinned where it currently is.
    ///
    /// A pointer that is already dragging releases its old node first.
    /// Returns false if `node` does not exist.
    pub fn start(
        &mut self,
        sim: &mut Simulation,
        pointer: PointerId,
        node: NodeId,
        grab: (f64, f64),
    ) -> bool {
        let Some((x, y)) = sim.graph().position(node) else {
            return false;
        };
        if self.gestures.contains_key(&pointer) {
            self.end(sim, pointer);
        }

        if self.gestures.is_empty() {
            if let Err(err) = sim.reheat(self.reheat_target) {
                log::warn!("drag could not reheat simulation: {err}");
            }
        }
        sim.pin(node, x, y);
        self.gestures.insert(
            pointer,
            Gesture {
                node,
                offset: (x - grab.0, y - grab.1),
            },
        );
        log::debug!("drag start: pointer {pointer} on {node}");
        true
    }

    /// Pick the nearest node within `radius` of `(x, y)` and start
    /// dragging it.
    pub fn pick(
        &mut self,
        sim: &mut Simulation,
        pointer: PointerId,
        x: f64,
        y: f64,
        radius: f64,
    ) -> Option<NodeId> {
        let node = sim.find(x, y, radius)?;
        self.start(sim, pointer, node, (x, y)).then_some(node)
    }

    /// Move the node held by `pointer` so that it follows the pointer.
    pub fn drag_to(&mut self, sim: &mut Simulation, pointer: PointerId, x: f64, y: f64) -> bool {
        match self.gestures.get(&pointer) {
            Some(gesture) => sim.pin(gesture.node, x + gesture.offset.0, y + gesture.offset.1),
            None => false,
        }
    }

    /// Finish the gesture of `pointer`: unpin its node unless another
    /// pointer still holds it, and settle once no gesture remains.
    pub fn end(&mut self, sim: &mut Simulation, pointer: PointerId) -> bool {
        let Some(gesture) = self.gestures.remove(&pointer) else {
            return false;
        };
        if !self.is_dragging(gesture.node) {
            sim.unpin(gesture.node);
        }
        if self.gestures.is_empty() {
            sim.settle();
        }
        log::debug!("drag end: pointer {pointer} released {}", gesture.node);
        true
    }

    /// End every active gesture.
    pub fn release_all(&mut self, sim: &mut Simulation) {
        let pointers: Vec<_> = self.gestures.keys().copied().collect();
        for pointer in pointers {
            self.end(sim, pointer);
        }
    }

    /// Number of active gestures.
    pub fn active(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_dragging(&self, node: NodeId) -> bool {
        self.gestures.values().any(|g| g.node == node)
    }

    /// Node held by `pointer`, if any.
    pub fn subject(&self, pointer: PointerId) -> Option<NodeId> {
        self.gestures.get(&pointer).map(|g| g.node)
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::force::{LinkForce, ManyBodyForce};
    use crate::graph::{Graph, LinkSpec, NodeSpec};
    use crate::simulation::{Phase, StepOutcome};

    fn simulation() -> Simulation {
        let graph = Graph::from_parts(
            vec![
                NodeSpec::new("A").at(0.0, 0.0),
                NodeSpec::new("B").at(30.0, 0.0),
                NodeSpec::new("C").at(0.0, 30.0),
            ],
            vec![LinkSpec::new("A", "B"), LinkSpec::new("A", "C")],
        )
        .unwrap();
        let mut sim = Simulation::new(graph, SimulationConfig::default()).unwrap();
        sim.force("link", LinkForce::new()).unwrap();
        sim.force("charge", ManyBodyForce::new()).unwrap();
        sim
    }

    #[test]
    fn test_drag_holds_node_exactly() {
        let mut sim = simulation();
        sim.start();
        sim.tick(20);

        let mut drag = DragController::new();
        let a = NodeId(0);
        let grab = sim.graph().position(a).unwrap();
        assert!(drag.start(&mut sim, 0, a, grab));
        assert!(drag.drag_to(&mut sim, 0, 100.0, 100.0));
        sim.step();
        assert_eq!(sim.graph().position(a), Some((100.0, 100.0)));
        sim.step();
        assert_eq!(sim.graph().position(a), Some((100.0, 100.0)));

        assert!(drag.end(&mut sim, 0));
        assert!(!sim.graph().is_pinned(a));
        assert_eq!(sim.alpha_target(), 0.0);
        sim.step();
        assert_ne!(sim.graph().position(a), Some((100.0, 100.0)));
    }

    #[test]
    fn test_first_drag_reheats_converged_simulation() {
        let mut sim = simulation();
        sim.start();
        while sim.step() != StepOutcome::Converged {}

        let mut drag = DragController::new();
        drag.start(&mut sim, 0, NodeId(1), (30.0, 0.0));
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);
    }

    #[test]
    fn test_last_release_settles() {
        let mut sim = simulation();
        sim.start();
        let mut drag = DragController::new();
        drag.start(&mut sim, 1, NodeId(1), (30.0, 0.0));
        drag.start(&mut sim, 2, NodeId(2), (0.0, 30.0));
        assert_eq!(drag.active(), 2);

        drag.end(&mut sim, 1);
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);
        assert!(!sim.graph().is_pinned(NodeId(1)));
        assert!(sim.graph().is_pinned(NodeId(2)));

        drag.end(&mut sim, 2);
        assert_eq!(sim.alpha_target(), 0.0);
        assert!(!drag.end(&mut sim, 2));
    }

    #[test]
    fn test_shared_node_stays_pinned_until_last_release() {
        let mut sim = simulation();
        let mut drag = DragController::new();
        drag.start(&mut sim, 1, NodeId(0), (0.0, 0.0));
        drag.start(&mut sim, 2, NodeId(0), (0.0, 0.0));
        drag.drag_to(&mut sim, 1, 5.0, 5.0);
        drag.drag_to(&mut sim, 2, 7.0, 7.0);
        assert_eq!(sim.graph().bodies().pin(0), Some((7.0, 7.0)));

        drag.end(&mut sim, 1);
        assert!(sim.graph().is_pinned(NodeId(0)));
        drag.end(&mut sim, 2);
        assert!(!sim.graph().is_pinned(NodeId(0)));
    }

    #[test]
    fn test_grab_offset_is_kept() {
        let mut sim = simulation();
        let mut drag = DragController::new();
        // Grab B two units left of its centre.
        drag.start(&mut sim, 0, NodeId(1), (28.0, 0.0));
        drag.drag_to(&mut sim, 0, 50.0, 10.0);
        assert_eq!(sim.graph().bodies().pin(1), Some((52.0, 10.0)));
    }

    #[test]
    fn test_pick() {
        let mut sim = simulation();
        let mut drag = DragController::new();
        assert_eq!(drag.pick(&mut sim, 0, 29.0, 1.0, 5.0), Some(NodeId(1)));
        assert_eq!(drag.subject(0), Some(NodeId(1)));
        assert_eq!(drag.pick(&mut sim, 1, 15.0, 15.0, 2.0), None);
        assert_eq!(drag.active(), 1);

        drag.release_all(&mut sim);
        assert_eq!(drag.active(), 0);
        assert!(!sim.graph().is_pinned(NodeId(1)));
    }

    #[test]
    fn test_unknown_node() {
        let mut sim = simulation();
        let mut drag = DragController::new();
        assert!(!drag.start(&mut sim, 0, NodeId(42), (0.0, 0.0)));
        assert!(!drag.drag_to(&mut sim, 0, 1.0, 1.0));
        assert!(DragController::with_reheat_target(2.0).is_err());
    }
}
