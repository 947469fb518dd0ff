//! OrgNet Force - WASM Module
//!
//! Force-directed layout engine for organizational network diagrams. A
//! caller supplies nodes (people, with attributes such as team or role) and
//! weighted links; an iterative physics simulation positions them, and an
//! interaction layer lets the user drag nodes and pan/zoom the view without
//! disturbing the simulation's invariants.
//!
//! The native Rust API is the primary surface. [`ForceGraphWasm`] exposes
//! the same operations to JavaScript via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: validated topology (petgraph `StableGraph`) plus SoA kinematic buffers
//! - `force`: composable force units and the named registry that applies them
//! - `spatial`: Barnes–Hut quadtree and R-tree spatial index
//! - `simulation`: alpha-driven time stepping and tick publication
//! - `interaction`: drag gestures, viewport transform and the per-diagram [`Scene`]
//! - `presets`: ready-made force configurations
//!
//! # Example
//!
//! ```
//! use orgnet_force::{Graph, LinkSpec, NodeSpec, Simulation, SimulationConfig, StepOutcome};
//! use orgnet_force::force::{LinkForce, ManyBodyForce};
//!
//! let graph = Graph::from_parts(
//!     vec![NodeSpec::new("ana"), NodeSpec::new("ben")],
//!     vec![LinkSpec::new("ana", "ben")],
//! )
//! .unwrap();
//! let mut sim = Simulation::new(graph, SimulationConfig::default()).unwrap();
//! sim.force("link", LinkForce::new().distance(40.0)).unwrap();
//! sim.force("charge", ManyBodyForce::new()).unwrap();
//!
//! sim.start();
//! while sim.step() != StepOutcome::Converged {}
//! ```

use js_sys::{Float64Array, Function};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod force;
pub mod graph;
pub mod interaction;
pub mod presets;
pub mod simulation;
pub mod spatial;

pub use config::{LayoutOptions, SceneOptions, SimulationConfig, ViewportConfig};
pub use error::{ConfigError, Error, GraphError, Result};
pub use graph::{Graph, GraphData, LinkSpec, NodeId, NodeSpec};
pub use interaction::{DragController, PointerEvent, Scene, ViewTransform, Viewport};
pub use simulation::{Phase, Simulation, StepOutcome, TickFrame, TickListener};

/// Listener name used for the JS tick callback.
const JS_LISTENER: &str = "js";

/// Build a scene from caller data: graph, preset forces, simulation and
/// viewport settings.
pub fn build_scene(data: GraphData, options: &SceneOptions) -> Result<Scene> {
    let graph = Graph::build(data)?;
    let mut simulation = Simulation::new(graph, options.simulation.clone())?;
    let forces = presets::by_name(&options.preset, &options.layout).unwrap_or_else(|| {
        log::warn!("unknown preset `{}`, using `base`", options.preset);
        presets::base(&options.layout)
    });
    simulation.register_all(forces)?;
    Ok(Scene::new(simulation, &options.viewport)?)
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Main entry point for one diagram.
///
/// Wraps a [`Scene`] and exposes it to JavaScript. Pointer input is queued
/// and applied at the next `frame()`, which the host calls from its
/// animation loop.
#[wasm_bindgen]
pub struct ForceGraphWasm {
    scene: Scene,
}

#[wasm_bindgen]
impl ForceGraphWasm {
    /// Create a diagram from `{ nodes, links }` and an optional
    /// `{ preset, layout, simulation, viewport }` options object.
    #[wasm_bindgen(constructor)]
    pub fn new(graph: JsValue, options: JsValue) -> std::result::Result<ForceGraphWasm, JsError> {
        let data: GraphData = serde_wasm_bindgen::from_value(graph)?;
        let options: SceneOptions = if options.is_undefined() || options.is_null() {
            SceneOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        Ok(Self {
            scene: build_scene(data, &options)?,
        })
    }

    // =========================================================================
    // Run Control
    // =========================================================================

    pub fn start(&mut self) {
        self.scene.simulation_mut().start();
    }

    /// Stop the simulation and release any drags. Idempotent.
    pub fn stop(&mut self) {
        self.scene.stop();
    }

    pub fn reheat(&mut self, target: f64) -> std::result::Result<(), JsError> {
        Ok(self.scene.simulation_mut().reheat(target)?)
    }

    pub fn settle(&mut self) {
        self.scene.simulation_mut().settle();
    }

    /// Apply queued input and advance one tick.
    ///
    /// Returns true while the simulation keeps running.
    pub fn frame(&mut self) -> bool {
        self.scene.frame() == StepOutcome::Ticked
    }

    /// Advance `n` ticks immediately without notifying listeners.
    pub fn tick(&mut self, n: u32) {
        self.scene.simulation_mut().tick(n as usize);
    }

    pub fn alpha(&self) -> f64 {
        self.scene.simulation().alpha()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.scene.simulation().is_running()
    }

    #[wasm_bindgen(js_name = tickCount)]
    pub fn tick_count(&self) -> f64 {
        self.scene.simulation().tick_count() as f64
    }

    /// Unregister a force by name, e.g. `"collision"` for dense graphs.
    #[wasm_bindgen(js_name = removeForce)]
    pub fn remove_force(&mut self, name: &str) -> bool {
        self.scene.simulation_mut().remove_force(name)
    }

    // =========================================================================
    // Tick Callback
    // =========================================================================

    /// Call `callback(alpha, tick)` after every scheduled tick. Replaces
    /// any previous callback.
    #[wasm_bindgen(js_name = onTick)]
    pub fn on_tick(&mut self, callback: Function) {
        self.scene.simulation_mut().on_tick(
            JS_LISTENER,
            move |frame: &TickFrame<'_>| {
                let alpha = JsValue::from_f64(frame.alpha);
                let tick = JsValue::from_f64(frame.tick as f64);
                if let Err(err) = callback.call2(&JsValue::NULL, &alpha, &tick) {
                    log::error!("tick callback threw: {err:?}");
                }
            },
        );
    }

    #[wasm_bindgen(js_name = offTick)]
    pub fn off_tick(&mut self) -> bool {
        self.scene.simulation_mut().remove_listener(JS_LISTENER)
    }

    // =========================================================================
    // Position Buffer Access
    // =========================================================================

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.scene.simulation().graph().node_count() as u32
    }

    /// Copy of X positions, indexed by node.
    #[wasm_bindgen(js_name = positionsX)]
    pub fn positions_x(&self) -> Float64Array {
        Float64Array::from(self.scene.simulation().graph().bodies().positions_x())
    }

    /// Copy of Y positions, indexed by node.
    #[wasm_bindgen(js_name = positionsY)]
    pub fn positions_y(&self) -> Float64Array {
        Float64Array::from(self.scene.simulation().graph().bodies().positions_y())
    }

    /// Link endpoints as `[x1, y1, x2, y2, ...]`, in link order.
    #[wasm_bindgen(js_name = linkSegments)]
    pub fn link_segments(&self) -> Vec<f64> {
        self.scene
            .simulation()
            .graph()
            .link_segments()
            .flat_map(|((x1, y1), (x2, y2))| [x1, y1, x2, y2])
            .collect()
    }

    /// Index of the node with the given id.
    #[wasm_bindgen(js_name = nodeIndex)]
    pub fn node_index(&self, key: &str) -> Option<u32> {
        self.scene.simulation().graph().node_id(key).map(NodeId::raw)
    }

    /// Id of the node at `index`.
    #[wasm_bindgen(js_name = nodeKey)]
    pub fn node_key(&self, index: u32) -> Option<String> {
        self.scene
            .simulation()
            .graph()
            .node(NodeId(index))
            .map(|node| node.key().to_string())
    }

    /// Nearest node within `radius` of a point in simulation coordinates.
    pub fn find(&self, x: f64, y: f64, radius: f64) -> Option<u32> {
        self.scene.simulation().find(x, y, radius).map(NodeId::raw)
    }

    // =========================================================================
    // Pointer Input (screen coordinates, applied on next frame)
    // =========================================================================

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, pointer: u32, x: f64, y: f64) {
        self.scene.push(PointerEvent::Down { pointer, x, y });
    }

    /// Start dragging a node the host has already hit-tested.
    pub fn grab(&mut self, pointer: u32, node: u32, x: f64, y: f64) {
        self.scene.push(PointerEvent::Grab {
            pointer,
            node: NodeId(node),
            x,
            y,
        });
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer: u32, x: f64, y: f64) {
        self.scene.push(PointerEvent::Move { pointer, x, y });
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer: u32) {
        self.scene.push(PointerEvent::Up { pointer });
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.scene.push(PointerEvent::Pan { dx, dy });
    }

    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) {
        self.scene.push(PointerEvent::Wheel { delta_y, x, y });
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Current `{ x, y, k }` transform, for persisting a camera framing.
    pub fn transform(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.scene.transform())?)
    }

    /// Restore a camera framing. The scale is clamped to the allowed range.
    #[wasm_bindgen(js_name = setTransform)]
    pub fn set_transform(&mut self, x: f64, y: f64, k: f64) -> bool {
        self.scene.set_transform(ViewTransform { x, y, k })
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn distance(graph: &Graph, a: usize, b: usize) -> f64 {
        let (ax, ay) = graph.bodies().position(a);
        let (bx, by) = graph.bodies().position(b);
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Two teams of six in a chain each, bridged by one weak link.
    fn org() -> GraphData {
        let nodes = (0..12)
            .map(|i| {
                NodeSpec::new(format!("p{i}"))
                    .with("team", if i < 6 { "Platform" } else { "Product" })
                    .with("role", if i % 6 == 0 { "Lead" } else { "Engineer" })
            })
            .collect();
        let mut links: Vec<LinkSpec> = (0..5)
            .chain(6..11)
            .map(|i| LinkSpec::new(format!("p{i}"), format!("p{}", i + 1)).weighted(0.8))
            .collect();
        links.push(LinkSpec::new("p0", "p6").weighted(0.2));
        GraphData { nodes, links }
    }

    fn run(scene: &mut Scene, limit: usize) -> usize {
        for i in 1..=limit {
            if scene.frame() == StepOutcome::Converged {
                return i;
            }
        }
        panic!("no convergence within {limit} frames");
    }

    #[test]
    fn test_clustered_pipeline() {
        let options = SceneOptions {
            preset: "clustered".into(),
            ..Default::default()
        };
        let mut scene = build_scene(org(), &options).unwrap();
        let ticks = std::rc::Rc::new(std::cell::Cell::new(0u64));
        let seen = ticks.clone();
        scene
            .simulation_mut()
            .on_tick("count", move |frame: &TickFrame<'_>| seen.set(frame.tick));

        scene.simulation_mut().start();
        let frames = run(&mut scene, 400);
        assert_eq!(ticks.get(), frames as u64);

        let graph = scene.simulation().graph();
        let team = |i: usize| graph.nodes()[i].text("team").map(str::to_string);
        let (mut intra, mut inter) = (Vec::new(), Vec::new());
        let mut closest = f64::INFINITY;
        for i in 0..12 {
            for j in (i + 1)..12 {
                let d = distance(graph, i, j);
                closest = closest.min(d);
                if team(i) == team(j) {
                    intra.push(d);
                } else {
                    inter.push(d);
                }
            }
        }
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(mean(&intra) < mean(&inter), "{} vs {}", mean(&intra), mean(&inter));

        // Collision radius is 1.5 × 6 per node.
        assert!(closest > 18.0 * 0.9, "closest pair {closest}");

        let (cx, cy) = graph.bodies().centroid().unwrap();
        assert!((cx - 200.0).abs() < 1.0 && (cy - 200.0).abs() < 1.0);
    }

    #[test]
    fn test_drag_mid_simulation() {
        let mut scene = build_scene(org(), &SceneOptions::default()).unwrap();
        scene.simulation_mut().start();
        for _ in 0..30 {
            scene.frame();
        }

        let a = scene.simulation().graph().node_id("p3").unwrap();
        let (x, y) = scene.simulation().graph().position(a).unwrap();
        scene.push(PointerEvent::Grab {
            pointer: 1,
            node: a,
            x,
            y,
        });
        scene.push(PointerEvent::Move {
            pointer: 1,
            x: 100.0,
            y: 100.0,
        });
        scene.frame();
        assert_eq!(scene.simulation().graph().position(a), Some((100.0, 100.0)));
        assert_eq!(scene.simulation().alpha_target(), interaction::DRAG_ALPHA_TARGET);

        for _ in 0..20 {
            scene.frame();
            assert_eq!(scene.simulation().graph().position(a), Some((100.0, 100.0)));
        }

        scene.push(PointerEvent::Up { pointer: 1 });
        scene.frame();
        assert!(!scene.simulation().graph().is_pinned(a));
        assert_eq!(scene.simulation().alpha_target(), 0.0);
        run(&mut scene, 600);
        assert_ne!(scene.simulation().graph().position(a), Some((100.0, 100.0)));
    }

    #[test]
    fn test_scenes_are_isolated() {
        let mut left = build_scene(org(), &SceneOptions::default()).unwrap();
        let right = build_scene(org(), &SceneOptions::default()).unwrap();

        left.simulation_mut().start();
        left.push(PointerEvent::Grab {
            pointer: 0,
            node: NodeId(0),
            x: 0.0,
            y: 0.0,
        });
        left.push(PointerEvent::Wheel {
            delta_y: -100.0,
            x: 0.0,
            y: 0.0,
        });
        left.frame();

        assert_eq!(right.simulation().phase(), Phase::Idle);
        assert_eq!(right.simulation().alpha(), 1.0);
        assert!(!right.simulation().graph().is_pinned(NodeId(0)));
        assert_eq!(right.transform(), ViewTransform::IDENTITY);
        assert_eq!(
            right.simulation().graph().bodies().positions_x(),
            Graph::build(org()).unwrap().bodies().positions_x()
        );
    }

    #[test]
    fn test_construction_errors() {
        let mut data = org();
        data.links.push(LinkSpec::new("p1", "ghost"));
        let err = build_scene(data, &SceneOptions::default()).err().unwrap();
        assert!(matches!(err, Error::Graph(GraphError::UnknownEndpoint { .. })));

        let options = SceneOptions {
            viewport: ViewportConfig {
                scale_extent: [4.0, 0.1],
            },
            ..Default::default()
        };
        let err = build_scene(org(), &options).err().unwrap();
        assert!(matches!(err, Error::Config(ConfigError::InvalidScaleExtent { .. })));

        let options = SceneOptions {
            layout: LayoutOptions {
                node_radius: -2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            build_scene(org(), &options).err().unwrap(),
            Error::Config(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_preset_falls_back_to_base() {
        let options = SceneOptions {
            preset: "spiral".into(),
            ..Default::default()
        };
        let scene = build_scene(org(), &options).unwrap();
        let names: Vec<_> = scene.simulation().forces().names().collect();
        assert_eq!(names, vec!["link", "charge", "center", "collision"]);
    }
}
