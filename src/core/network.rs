//! Spatial network graph
//!
//! The narrow graph interface consumed by the metrics side of the crate.
//! External graph-building code populates nodes (coordinates) and edges
//! (resolved distances in meters); this crate only reads them back.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

/// Graph node carrying its geographic position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoNode {
    pub latitude: f64,
    pub longitude: f64,
}

/// Undirected spatial network with meter-weighted edges.
///
/// One instance represents one yearly snapshot. The resolver and the
/// aggregator never mutate node identity or topology; builders add nodes
/// and edges, everything downstream is read-only.
#[derive(Debug)]
pub struct RoadNetwork {
    graph: UnGraph<GeoNode, f64>,
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
        }
    }

    /// Add a node at the given coordinates.
    pub fn add_node(&mut self, latitude: f64, longitude: f64) -> NodeIndex {
        self.graph.add_node(GeoNode {
            latitude,
            longitude,
        })
    }

    /// Add an edge weighted with a resolved travel distance in meters.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, meters: f64) {
        self.graph.add_edge(a, b, meters);
    }

    /// Total node count, singleton components included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Coordinates of a node as (latitude, longitude).
    pub fn coords(&self, node: NodeIndex) -> Option<(f64, f64)> {
        self.graph
            .node_weight(node)
            .map(|n| (n.latitude, n.longitude))
    }

    /// Connected components in discovery order.
    ///
    /// Discovery order is the first-seen order of each component's
    /// lowest-index node, so the decomposition is deterministic for a fixed
    /// graph. Singleton components are included; callers filter as needed.
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        let mut vertex_sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            vertex_sets.union(edge.source().index(), edge.target().index());
        }

        let mut order: Vec<usize> = Vec::new();
        let mut groups: HashMap<usize, Vec<NodeIndex>> = HashMap::new();
        for node in self.graph.node_indices() {
            let root = vertex_sets.find(node.index());
            groups
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    Vec::new()
                })
                .push(node);
        }

        order
            .into_iter()
            .map(|root| groups.remove(&root).unwrap_or_default())
            .collect()
    }

    pub(crate) fn graph(&self) -> &UnGraph<GeoNode, f64> {
        &self.graph
    }
}
