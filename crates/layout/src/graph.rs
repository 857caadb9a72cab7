use petgraph::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers, NodeCount};
use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Copied;
use std::slice;

/// Opaque node identifier, supplied by whoever builds the graph
pub type NodeId = u64;

/// Minimal directed adjacency model
///
/// Nodes are kept sorted, and every node owns an ordered list of destinations.
/// Parallel edges are kept: adding the same edge twice stores the destination
/// twice. Self loops are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    nodes: BTreeSet<NodeId>,
    edges: BTreeMap<NodeId, Vec<NodeId>>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all nodes and edges
    pub fn reset(&mut self) {
        self.edges.clear();
        self.nodes.clear();
    }

    /// Register a node. Adding a known node again does nothing.
    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
        self.edges.entry(node).or_default();
    }

    /// Add the edge `from -> to`, registering both endpoints.
    ///
    /// An edge from a node to itself is dropped: a hierarchy root usually
    /// names itself as its own parent.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.add_node(from);
        self.add_node(to);
        if from == to {
            return;
        }
        self.edges.entry(from).or_default().push(to);
    }

    /// Destinations of the edges leaving `node`, in insertion order.
    /// Unknown nodes have no neighbors.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.edges.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of edges leaving `node`
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Extend<(NodeId, NodeId)> for DirectedGraph {
    fn extend<I: IntoIterator<Item = (NodeId, NodeId)>>(&mut self, edges: I) {
        for (from, to) in edges {
            self.add_edge(from, to);
        }
    }
}

impl FromIterator<(NodeId, NodeId)> for DirectedGraph {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(edges: I) -> Self {
        let mut graph = Self::new();
        graph.extend(edges);
        graph
    }
}

impl fmt::Display for DirectedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}:")?;
            for neighbor in self.neighbors(*node) {
                write!(f, " {neighbor}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// petgraph visitor traits, so layouts can take this graph like any other

impl GraphBase for DirectedGraph {
    type EdgeId = (NodeId, NodeId);
    type NodeId = NodeId;
}

impl NodeCount for DirectedGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<'a> IntoNodeIdentifiers for &'a DirectedGraph {
    type NodeIdentifiers = Copied<btree_set::Iter<'a, NodeId>>;

    fn node_identifiers(self) -> Self::NodeIdentifiers {
        self.nodes.iter().copied()
    }
}

impl<'a> IntoNeighbors for &'a DirectedGraph {
    type Neighbors = Copied<slice::Iter<'a, NodeId>>;

    fn neighbors(self, node: NodeId) -> Self::Neighbors {
        DirectedGraph::neighbors(self, node).iter().copied()
    }
}
