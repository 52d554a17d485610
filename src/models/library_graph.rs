//! Library-level link graph parsed from `build.ninja`.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    StaticLibrary,
    SharedLibrary,
    Executable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryNode {
    pub name: String,
    pub kind: TargetKind,
    pub output_path: String,
}

/// library/executable -> library link graph, plus per-node metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryGraph {
    pub nodes: FxHashMap<String, LibraryNode>,
    /// name -> set of library names it links against (order-only deps).
    pub edges: FxHashMap<String, FxHashSet<String>>,
}

impl LibraryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: LibraryNode) {
        self.nodes.entry(node.name.clone()).or_insert(node);
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    pub fn fan_out(&self, name: &str) -> usize {
        self.edges.get(name).map(|s| s.len()).unwrap_or(0)
    }

    pub fn fan_in(&self, name: &str) -> usize {
        self.edges
            .values()
            .filter(|deps| deps.contains(name))
            .count()
    }

    /// Longest path to a sink (a node with no outgoing edges).
    pub fn depth(&self, name: &str) -> usize {
        let mut memo: FxHashMap<String, usize> = FxHashMap::default();
        self.depth_rec(name, &mut memo, &mut FxHashSet::default())
    }

    fn depth_rec(
        &self,
        name: &str,
        memo: &mut FxHashMap<String, usize>,
        visiting: &mut FxHashSet<String>,
    ) -> usize {
        if let Some(&d) = memo.get(name) {
            return d;
        }
        if !visiting.insert(name.to_string()) {
            // Cycle: don't recurse further down this path.
            return 0;
        }
        let d = match self.edges.get(name) {
            Some(deps) if !deps.is_empty() => {
                1 + deps
                    .iter()
                    .map(|d| self.depth_rec(d, memo, visiting))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        };
        visiting.remove(name);
        memo.insert(name.to_string(), d);
        d
    }

    /// All nodes transitively depending on `name` (BFS over reversed edges).
    pub fn transitive_dependents(&self, name: &str) -> FxHashSet<String> {
        let mut result = FxHashSet::default();
        let mut queue = vec![name.to_string()];
        while let Some(cur) = queue.pop() {
            for (from, deps) in &self.edges {
                if deps.contains(&cur) && result.insert(from.clone()) {
                    queue.push(from.clone());
                }
            }
        }
        result
    }
}
