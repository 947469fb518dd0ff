//! User interaction: dragging nodes and moving the camera.
//!
//! Dragging works through pins on the simulation; the viewport is a pure
//! screen transform that never touches the simulation. [`Scene`] combines
//! both with a simulation and queues input until the next tick boundary.

mod drag;
mod scene;
mod viewport;

pub use drag::{DRAG_ALPHA_TARGET, DragController, PointerId};
pub use scene::{HIT_RADIUS, PointerEvent, Scene};
pub use viewport::{ViewTransform, Viewport, WHEEL_RATE};
