//! One interactive diagram.
//!
//! A [`Scene`] bundles a simulation with its drag controller, viewport and
//! an event queue. Hosts push pointer events whenever they arrive; the
//! events are applied at the next tick boundary in [`Scene::frame`], never
//! in the middle of a step.

use std::collections::VecDeque;

use super::drag::{DragController, PointerId};
use super::viewport::{ViewTransform, Viewport};
use crate::config::ViewportConfig;
use crate::error::ConfigError;
use crate::graph::NodeId;
use crate::simulation::{Simulation, StepOutcome};

/// Default pick radius around a pointer, in screen pixels.
pub const HIT_RADIUS: f64 = 12.0;

/// Pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press: drag whichever node lies under the pointer, if any.
    Down { pointer: PointerId, x: f64, y: f64 },
    /// Press on a node the host has already identified.
    Grab {
        pointer: PointerId,
        node: NodeId,
        x: f64,
        y: f64,
    },
    Move { pointer: PointerId, x: f64, y: f64 },
    Up { pointer: PointerId },
    Pan { dx: f64, dy: f64 },
    Wheel { delta_y: f64, x: f64, y: f64 },
}

pub struct Scene {
    simulation: Simulation,
    drag: DragController,
    viewport: Viewport,
    queue: VecDeque<PointerEvent>,
    hit_radius: f64,
}

impl Scene {
    pub fn new(simulation: Simulation, viewport: &ViewportConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            simulation,
            drag: DragController::new(),
            viewport: Viewport::new(viewport)?,
            queue: VecDeque::new(),
            hit_radius: HIT_RADIUS,
        })
    }

    /// Pick radius in screen pixels.
    pub fn with_hit_radius(mut self, radius: f64) -> Self {
        self.hit_radius = radius;
        self
    }

    /// Queue an event for the next frame.
    pub fn push(&mut self, event: PointerEvent) {
        self.queue.push_back(event);
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply queued events, then step the simulation once.
    pub fn frame(&mut self) -> StepOutcome {
        while let Some(event) = self.queue.pop_front() {
            self.dispatch(event);
        }
        self.simulation.step()
    }

    fn dispatch(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { pointer, x, y } => {
                let (sx, sy) = self.viewport.invert((x, y));
                let radius = self.hit_radius / self.viewport.transform().k;
                self.drag.pick(&mut self.simulation, pointer, sx, sy, radius);
            }
            PointerEvent::Grab { pointer, node, x, y } => {
                let grab = self.viewport.invert((x, y));
                if !self.drag.start(&mut self.simulation, pointer, node, grab) {
                    log::warn!("ignored grab of unknown {node}");
                }
            }
            PointerEvent::Move { pointer, x, y } => {
                let (sx, sy) = self.viewport.invert((x, y));
                self.drag.drag_to(&mut self.simulation, pointer, sx, sy);
            }
            PointerEvent::Up { pointer } => {
                self.drag.end(&mut self.simulation, pointer);
            }
            PointerEvent::Pan { dx, dy } => self.viewport.translate_by(dx, dy),
            PointerEvent::Wheel { delta_y, x, y } => self.viewport.wheel(delta_y, (x, y)),
        }
    }

    /// Release every drag, drop queued input and stop the simulation.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.drag.release_all(&mut self.simulation);
        self.simulation.stop();
    }

    /// Restore a persisted camera framing.
    pub fn set_transform(&mut self, transform: ViewTransform) -> bool {
        self.viewport.set_transform(transform)
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::force::{LinkForce, ManyBodyForce};
    use crate::graph::{Graph, LinkSpec, NodeSpec};

    fn scene() -> Scene {
        let graph = Graph::from_parts(
            vec![NodeSpec::new("A").at(0.0, 0.0), NodeSpec::new("B").at(40.0, 0.0)],
            vec![LinkSpec::new("A", "B")],
        )
        .unwrap();
        let mut sim = Simulation::new(graph, SimulationConfig::default()).unwrap();
        sim.force("link", LinkForce::new().distance(40.0)).unwrap();
        sim.force("charge", ManyBodyForce::new()).unwrap();
        Scene::new(sim, &ViewportConfig::default()).unwrap()
    }

    #[test]
    fn test_events_wait_for_frame() {
        let mut scene = scene();
        scene.push(PointerEvent::Down {
            pointer: 0,
            x: 1.0,
            y: 1.0,
        });
        assert_eq!(scene.pending(), 1);
        assert_eq!(scene.drag().active(), 0);

        // The drag reheats the idle simulation, so this frame ticks.
        assert_eq!(scene.frame(), StepOutcome::Ticked);
        assert_eq!(scene.pending(), 0);
        assert_eq!(scene.drag().subject(0), Some(NodeId(0)));
    }

    #[test]
    fn test_drag_through_zoomed_viewport() {
        let mut scene = scene();
        scene.set_transform(ViewTransform {
            x: 100.0,
            y: 100.0,
            k: 2.0,
        });
        // Node A sits at screen (100, 100).
        scene.push(PointerEvent::Down {
            pointer: 7,
            x: 100.0,
            y: 100.0,
        });
        scene.push(PointerEvent::Move {
            pointer: 7,
            x: 300.0,
            y: 300.0,
        });
        scene.frame();
        assert_eq!(scene.simulation().graph().position(NodeId(0)), Some((100.0, 100.0)));

        scene.push(PointerEvent::Up { pointer: 7 });
        scene.frame();
        assert!(!scene.simulation().graph().is_pinned(NodeId(0)));
        assert_eq!(scene.simulation().alpha_target(), 0.0);
    }

    #[test]
    fn test_viewport_never_moves_nodes() {
        let mut scene = scene();
        let before = scene.simulation().graph().bodies().positions_x().to_vec();
        scene.push(PointerEvent::Pan { dx: 50.0, dy: -20.0 });
        scene.push(PointerEvent::Wheel {
            delta_y: -500.0,
            x: 10.0,
            y: 10.0,
        });
        // Idle simulation: the frame applies the events but does not step.
        assert_eq!(scene.frame(), StepOutcome::Idle);
        assert_eq!(scene.simulation().graph().bodies().positions_x(), before.as_slice());
        assert_eq!(scene.transform().k, 2.0);
    }

    #[test]
    fn test_grab_unknown_node_is_ignored() {
        let mut scene = scene();
        scene.push(PointerEvent::Grab {
            pointer: 0,
            node: NodeId(99),
            x: 0.0,
            y: 0.0,
        });
        scene.frame();
        assert_eq!(scene.drag().active(), 0);
    }

    #[test]
    fn test_stop_releases_drags() {
        let mut scene = scene();
        scene.push(PointerEvent::Grab {
            pointer: 0,
            node: NodeId(1),
            x: 40.0,
            y: 0.0,
        });
        scene.frame();
        assert!(scene.simulation().graph().is_pinned(NodeId(1)));

        scene.push(PointerEvent::Pan { dx: 1.0, dy: 1.0 });
        scene.stop();
        assert_eq!(scene.pending(), 0);
        assert_eq!(scene.drag().active(), 0);
        assert!(!scene.simulation().graph().is_pinned(NodeId(1)));
        assert_eq!(scene.frame(), StepOutcome::Idle);
    }
}
