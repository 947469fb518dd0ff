//! Graph - immutable topology plus mutable kinematic state.
//!
//! The Graph stores topology using petgraph's StableGraph and keeps
//! positions and velocities in SoA buffers ([`Bodies`]) indexed by
//! [`NodeId`]. Topology is validated and resolved once in [`Graph::build`];
//! nodes and links cannot be added or removed afterwards.

use std::collections::HashMap;
use std::f64::consts::PI;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::Deserialize;

use super::bodies::Bodies;
use super::edge::{Link, LinkId, LinkRef, LinkSpec};
use super::node::{Node, NodeId, NodeSpec};
use crate::error::GraphError;

/// Radius scale of the phyllotaxis spiral used for unplaced nodes.
const INITIAL_RADIUS: f64 = 10.0;

/// Complete caller input: nodes and links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<NodeSpec>,
    pub links: Vec<LinkSpec>,
}

/// The graph model.
///
/// This struct manages:
/// - Topology via petgraph (node weights are [`NodeId`]s, edge weights [`LinkId`]s)
/// - Resolved nodes and links, with their attribute bags
/// - Key → id lookup
/// - Position/velocity/pin buffers in SoA layout
pub struct Graph {
    topology: StableGraph<NodeId, LinkId, Directed>,
    nodes: Vec<Node>,
    links: Vec<Link>,
    key_to_id: HashMap<String, NodeId>,
    bodies: Bodies,
}

impl Graph {
    /// Validate and resolve caller data into a graph.
    ///
    /// Fails on duplicate node keys, links referencing unknown keys,
    /// non-finite link weights and non-finite initial positions. Nodes
    /// without an initial position are laid out on a phyllotaxis spiral
    /// around the origin.
    pub fn build(data: GraphData) -> Result<Self, GraphError> {
        let GraphData { nodes, links } = data;

        let mut topology = StableGraph::with_capacity(nodes.len(), links.len());
        let mut key_to_id = HashMap::with_capacity(nodes.len());
        let mut resolved_nodes = Vec::with_capacity(nodes.len());
        let mut bodies = Bodies::with_capacity(nodes.len());

        let initial_angle = PI * (3.0 - 5.0_f64.sqrt());

        for (i, spec) in nodes.into_iter().enumerate() {
            if key_to_id.contains_key(&spec.id) {
                return Err(GraphError::DuplicateNode { id: spec.id });
            }

            let (x, y) = match (spec.x, spec.y) {
                (Some(x), Some(y)) => {
                    if !x.is_finite() || !y.is_finite() {
                        return Err(GraphError::NonFinitePosition { id: spec.id });
                    }
                    (x, y)
                }
                _ => {
                    let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                    let angle = i as f64 * initial_angle;
                    (radius * angle.cos(), radius * angle.sin())
                }
            };

            let id = NodeId(i as u32);
            let index = topology.add_node(id);
            debug_assert_eq!(index.index(), i);

            key_to_id.insert(spec.id.clone(), id);
            resolved_nodes.push(Node::new(id, spec.id, spec.attributes));
            bodies.push(x, y);
        }

        let mut resolved_links = Vec::with_capacity(links.len());
        for (i, spec) in links.into_iter().enumerate() {
            let source = *key_to_id
                .get(&spec.source)
                .ok_or_else(|| GraphError::UnknownEndpoint {
                    link: i,
                    id: spec.source.clone(),
                })?;
            let target = *key_to_id
                .get(&spec.target)
                .ok_or_else(|| GraphError::UnknownEndpoint {
                    link: i,
                    id: spec.target.clone(),
                })?;
            if !spec.weight.is_finite() {
                return Err(GraphError::NonFiniteWeight { link: i });
            }

            let id = LinkId(i as u32);
            topology.add_edge(
                NodeIndex::new(source.index()),
                NodeIndex::new(target.index()),
                id,
            );
            resolved_links.push(Link::new(id, source, target, spec.weight, spec.attributes));
        }

        log::debug!(
            "graph built: {} nodes, {} links",
            resolved_nodes.len(),
            resolved_links.len()
        );

        Ok(Self {
            topology,
            nodes: resolved_nodes,
            links: resolved_links,
            key_to_id,
            bodies,
        })
    }

    /// Build from separate node and link lists.
    pub fn from_parts(nodes: Vec<NodeSpec>, links: Vec<LinkSpec>) -> Result<Self, GraphError> {
        Self::build(GraphData { nodes, links })
    }

    // =========================================================================
    // Topology
    // =========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a node by the caller's key.
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_to_id.get(key).copied()
    }

    /// A link together with its endpoint nodes.
    pub fn link_ref<'a>(&'a self, link: &'a Link) -> LinkRef<'a> {
        LinkRef {
            link,
            source: &self.nodes[link.source().index()],
            target: &self.nodes[link.target().index()],
        }
    }

    /// Iterate all links with their endpoint nodes.
    pub fn link_refs(&self) -> impl Iterator<Item = LinkRef<'_>> + '_ {
        self.links.iter().map(|link| self.link_ref(link))
    }

    /// Number of links touching a node, counting both directions.
    /// A self-loop counts twice.
    pub fn degree(&self, id: NodeId) -> usize {
        if id.index() >= self.nodes.len() {
            return 0;
        }
        let index = NodeIndex::new(id.index());
        self.topology
            .edges_directed(index, petgraph::Direction::Outgoing)
            .count()
            + self
                .topology
                .edges_directed(index, petgraph::Direction::Incoming)
                .count()
    }

    // =========================================================================
    // Kinematic state
    // =========================================================================

    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut Bodies {
        &mut self.bodies
    }

    pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
        (id.index() < self.bodies.len()).then(|| self.bodies.position(id.index()))
    }

    pub fn is_pinned(&self, id: NodeId) -> bool {
        id.index() < self.bodies.len() && self.bodies.pin(id.index()).is_some()
    }

    /// Current endpoint positions of every link, in link order.
    pub fn link_segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.links.iter().map(|link| {
            (
                self.bodies.position(link.source().index()),
                self.bodies.position(link.target().index()),
            )
        })
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            topology: StableGraph::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            key_to_id: HashMap::new(),
            bodies: Bodies::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_parts(
            vec![
                NodeSpec::new("a").at(0.0, 0.0),
                NodeSpec::new("b").at(10.0, 0.0),
                NodeSpec::new("c").at(0.0, 10.0),
            ],
            vec![
                LinkSpec::new("a", "b"),
                LinkSpec::new("a", "c").weighted(0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build() {
        let graph = triangle();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.node_id("b"), Some(NodeId(1)));
        assert_eq!(graph.position(NodeId(1)), Some((10.0, 0.0)));
        assert_eq!(graph.links()[1].weight(), 0.5);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let result = Graph::from_parts(vec![NodeSpec::new("a"), NodeSpec::new("a")], vec![]);
        assert_eq!(
            result.err(),
            Some(GraphError::DuplicateNode { id: "a".into() })
        );
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let result = Graph::from_parts(
            vec![NodeSpec::new("a")],
            vec![LinkSpec::new("a", "ghost")],
        );
        assert_eq!(
            result.err(),
            Some(GraphError::UnknownEndpoint {
                link: 0,
                id: "ghost".into()
            })
        );
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let result = Graph::from_parts(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![LinkSpec::new("a", "b").weighted(f64::NAN)],
        );
        assert_eq!(result.err(), Some(GraphError::NonFiniteWeight { link: 0 }));

        let result = Graph::from_parts(vec![NodeSpec::new("a").at(f64::INFINITY, 0.0)], vec![]);
        assert!(matches!(result, Err(GraphError::NonFinitePosition { .. })));
    }

    #[test]
    fn test_unplaced_nodes_get_distinct_positions() {
        let graph = Graph::from_parts(
            (0..20).map(|i| NodeSpec::new(format!("n{i}"))).collect(),
            vec![],
        )
        .unwrap();

        let positions: Vec<_> = (0..20).map(|i| graph.bodies().position(i)).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                assert!(dx * dx + dy * dy > 1.0, "nodes {i} and {j} overlap");
            }
        }
        // First node sits at radius 10 * sqrt(0.5) on the x axis.
        assert!((positions[0].0 - 10.0 * 0.5_f64.sqrt()).abs() < 1e-9);
        assert_eq!(positions[0].1, 0.0);
    }

    #[test]
    fn test_degree() {
        let graph = triangle();
        let a = graph.node_id("a").unwrap();
        let b = graph.node_id("b").unwrap();
        assert_eq!(graph.degree(a), 2);
        assert_eq!(graph.degree(b), 1);
    }

    #[test]
    fn test_link_segments() {
        let graph = triangle();
        let segments: Vec<_> = graph.link_segments().collect();
        assert_eq!(segments[0], ((0.0, 0.0), (10.0, 0.0)));
        assert_eq!(segments.len(), graph.link_count());
        assert!(Graph::default().link_segments().next().is_none());
    }
}
