//! The header→header include graph and the source-to-closure index.

use crate::models::path::CanonicalPath;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// A directed graph whose vertices are canonical paths and whose edges
/// `u -> v` mean "u's source or header text includes v directly" (or, in
/// heuristic mode, "u and v co-occur in a way the builder promoted to an
/// edge" — see `precise`). No self-loops; parallel edges are collapsed.
#[derive(Debug, Clone, Default)]
pub struct IncludeGraph {
    inner: DiGraph<CanonicalPath, ()>,
    index: FxHashMap<CanonicalPath, NodeIndex>,
}

impl IncludeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Inserts a node if absent, returning its index either way.
    pub fn ensure_node(&mut self, path: &CanonicalPath) -> NodeIndex {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.inner.add_node(path.clone());
        self.index.insert(path.clone(), idx);
        idx
    }

    /// Adds `from -> to`, skipping self-loops and duplicate edges.
    pub fn add_edge(&mut self, from: &CanonicalPath, to: &CanonicalPath) {
        if from == to {
            return;
        }
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if self.inner.find_edge(a, b).is_none() {
            self.inner.add_edge(a, b, ());
        }
    }

    pub fn node_index(&self, path: &CanonicalPath) -> Option<NodeIndex> {
        self.index.get(path).copied()
    }

    pub fn path_of(&self, idx: NodeIndex) -> &CanonicalPath {
        &self.inner[idx]
    }

    /// All node paths, sorted, for deterministic iteration.
    pub fn sorted_paths(&self) -> Vec<CanonicalPath> {
        let mut v: Vec<CanonicalPath> = self.index.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
    }

    pub fn predecessors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner
            .neighbors_directed(idx, petgraph::Direction::Incoming)
    }

    pub fn fan_out(&self, idx: NodeIndex) -> usize {
        self.successors(idx).count()
    }

    pub fn fan_in(&self, idx: NodeIndex) -> usize {
        self.predecessors(idx).count()
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.index.contains_key(path)
    }

    pub fn edges(&self) -> impl Iterator<Item = (CanonicalPath, CanonicalPath)> + '_ {
        self.inner.edge_indices().map(move |e| {
            let (a, b) = self.inner.edge_endpoints(e).unwrap();
            (self.inner[a].clone(), self.inner[b].clone())
        })
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.inner.find_edge(from, to).is_some()
    }

    pub fn remove_edge_between(&mut self, from: NodeIndex, to: NodeIndex) {
        if let Some(e) = self.inner.find_edge(from, to) {
            self.inner.remove_edge(e);
        }
    }

    pub fn petgraph(&self) -> &DiGraph<CanonicalPath, ()> {
        &self.inner
    }
}

/// Serializable exchange form of an `IncludeGraph`, used by the snapshot
/// serializer and the exporters (sorted for determinism).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphData {
    pub nodes: Vec<CanonicalPath>,
    pub edges: Vec<(CanonicalPath, CanonicalPath)>,
}

impl From<&IncludeGraph> for GraphData {
    fn from(g: &IncludeGraph) -> Self {
        let mut nodes = g.sorted_paths();
        nodes.sort();
        let mut edges: Vec<(CanonicalPath, CanonicalPath)> = g.edges().collect();
        edges.sort();
        Self { nodes, edges }
    }
}

impl From<&GraphData> for IncludeGraph {
    fn from(d: &GraphData) -> Self {
        let mut g = IncludeGraph::new();
        for n in &d.nodes {
            g.ensure_node(n);
        }
        for (a, b) in &d.edges {
            g.add_edge(a, b);
        }
        g
    }
}

/// `TranslationUnit -> set of included Paths`, plus the inverse index used
/// by the rebuild impact engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceToDeps {
    pub forward: FxHashMap<CanonicalPath, FxHashSet<CanonicalPath>>,
    /// header -> set of TUs whose inclusion set contains it.
    pub inverse: FxHashMap<CanonicalPath, FxHashSet<CanonicalPath>>,
}

impl SourceToDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tu: CanonicalPath, deps: FxHashSet<CanonicalPath>) {
        for dep in &deps {
            self.inverse
                .entry(dep.clone())
                .or_default()
                .insert(tu.clone());
        }
        self.forward.entry(tu).or_default().extend(deps);
    }

    pub fn tu_universe(&self) -> usize {
        self.forward.len()
    }

    /// TUs whose inclusion set contains `header`.
    pub fn dependents_of(&self, header: &CanonicalPath) -> FxHashSet<CanonicalPath> {
        self.inverse.get(header).cloned().unwrap_or_default()
    }
}
