//! Dependency graph wrapper using petgraph::DiGraph keyed by object id

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{DependencyEdge, EdgeKind};

/// Directed graph over object ids. Built once from the extracted edge list.
#[derive(Default)]
pub struct DependencyGraph {
    inner: DiGraph<String, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: &[DependencyEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(&edge.source_id, &edge.target_id, edge.kind);
        }
        graph
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add an edge. A repeated (source, target) pair is ignored.
    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) {
        let s = self.ensure_node(source);
        let t = self.ensure_node(target);
        if self.inner.find_edge(s, t).is_none() {
            self.inner.add_edge(s, t, kind);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids this object depends on.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.inner.neighbors_directed(idx, Direction::Outgoing))
            .map(move |n| self.inner[n].as_str())
    }

    /// Ids that depend on this object.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.inner.neighbors_directed(idx, Direction::Incoming))
            .map(move |n| self.inner[n].as_str())
    }

    /// Global inbound edge count.
    pub fn inbound_count(&self, id: &str) -> usize {
        self.index
            .get(id)
            .map_or(0, |&idx| self.inner.edges_directed(idx, Direction::Incoming).count())
    }

    /// Edge kind between two objects, if linked.
    pub fn edge_kind(&self, source: &str, target: &str) -> Option<EdgeKind> {
        let s = *self.index.get(source)?;
        let t = *self.index.get(target)?;
        self.inner
            .edges_directed(s, Direction::Outgoing)
            .find(|e| e.target() == t)
            .map(|e| *e.weight())
    }

    /// In + out edges whose other end lies in `members`.
    pub fn degree_within(&self, id: &str, members: &BTreeSet<String>) -> usize {
        self.outgoing(id)
            .chain(self.incoming(id))
            .filter(|other| members.contains(*other))
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}
