//! Spatial structures over node positions.
//!
//! - [`QuadTree`]: rebuilt every tick by the many-body force for
//!   Barnes–Hut aggregation.
//! - [`SpatialIndex`]: an R-tree for radius queries (collision) and
//!   nearest-node hit testing.

mod quadtree;
mod rtree;

pub use quadtree::{Cell, Extent, Quad, QuadTree};
pub use rtree::{NodePoint, SpatialIndex};
