//! Graph data structures.
//!
//! This module provides the graph model: petgraph's StableGraph for
//! topology, resolved nodes and links with their attribute bags, and a
//! Structure of Arrays (SoA) layout for positions and velocities.

mod bodies;
mod edge;
mod model;
mod node;

pub use bodies::Bodies;
pub use edge::{Link, LinkId, LinkRef, LinkSpec};
pub use model::{Graph, GraphData};
pub use node::{AttributeValue, Attributes, Node, NodeId, NodeSpec};
