//! C3: Dependency Graph Builder — derives the header→header include graph
//! and the source-to-closure index from ingested inclusion sets.

use crate::models::graph::{IncludeGraph, SourceToDeps};
use crate::models::path::{CanonicalPath, PathClass};
use rustc_hash::FxHashSet;

/// Result of C3: the graph plus whether it carries direct-include semantics.
pub struct BuiltGraph {
    pub graph: IncludeGraph,
    pub source_to_deps: SourceToDeps,
    pub precise: bool,
}

/// Builds the header→header graph and source-to-closure index from a set of
/// `(TU, inclusion set)` pairs using the co-occurrence proxy:
/// every ordered pair of headers that co-occur in some TU's inclusion set
/// gets an edge, and the snapshot is marked `precise=false`. This is not a
/// substitute for precise direct-include semantics and must never be
/// reported as one.
pub fn build_heuristic(
    tus: &[(CanonicalPath, FxHashSet<CanonicalPath>)],
) -> BuiltGraph {
    let mut graph = IncludeGraph::new();
    let mut source_to_deps = SourceToDeps::new();

    for (tu, deps) in tus {
        source_to_deps.insert(tu.clone(), deps.clone());
        for h in deps {
            graph.ensure_node(h);
        }
    }

    for (_, deps) in tus {
        let members: Vec<&CanonicalPath> = deps.iter().collect();
        for (i, u) in members.iter().enumerate() {
            for v in members.iter().skip(i + 1) {
                // co-occurrence is symmetric in source but the graph
                // records both directions as candidate dependency edges,
                // since the scanner gives no ordering information.
                graph.add_edge(u, v);
                graph.add_edge(v, u);
            }
        }
    }

    BuiltGraph {
        graph,
        source_to_deps,
        precise: false,
    }
}

/// Builds the graph from precise direct-include pairs reported by the
/// scanner (`u` directly includes `v`), when such information is available.
/// Marked `precise=true`.
pub fn build_precise(
    direct_edges: &[(CanonicalPath, CanonicalPath)],
    tus: &[(CanonicalPath, FxHashSet<CanonicalPath>)],
) -> BuiltGraph {
    let mut graph = IncludeGraph::new();
    let mut source_to_deps = SourceToDeps::new();

    for (tu, deps) in tus {
        source_to_deps.insert(tu.clone(), deps.clone());
        for h in deps {
            graph.ensure_node(h);
        }
    }
    for (u, v) in direct_edges {
        graph.add_edge(u, v);
    }

    BuiltGraph {
        graph,
        source_to_deps,
        precise: true,
    }
}

/// Removes nodes of the given classes from a graph's vertex set (and any
/// edge touching them), applied *after* closures are computed so transitive
/// paths through system headers remain visible on the source-TU side.
/// `classify` is a pure lookup, not a callback crossing the component
/// boundary — it is expected to be backed by the same `PathNormalizer` used
/// at ingest time.
pub fn filter_by_class(
    graph: &IncludeGraph,
    classify: impl Fn(&CanonicalPath) -> Option<PathClass>,
    keep: impl Fn(PathClass) -> bool,
) -> IncludeGraph {
    let mut filtered = IncludeGraph::new();
    let keep_path = |p: &CanonicalPath| classify(p).map(&keep).unwrap_or(false);

    for path in graph.sorted_paths() {
        if keep_path(&path) {
            filtered.ensure_node(&path);
        }
    }
    for (from, to) in graph.edges() {
        if keep_path(&from) && keep_path(&to) {
            filtered.add_edge(&from, &to);
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn heuristic_builds_cooccurrence_edges() {
        let tu = p("a.cpp");
        let mut deps = FxHashSet::default();
        deps.insert(p("a.h"));
        deps.insert(p("b.h"));
        let built = build_heuristic(&[(tu, deps)]);
        assert!(!built.precise);
        assert_eq!(built.graph.node_count(), 2);
        assert_eq!(built.graph.edge_count(), 2); // a.h<->b.h both directions
    }

    #[test]
    fn no_self_loops() {
        let tu = p("a.cpp");
        let mut deps = FxHashSet::default();
        deps.insert(p("a.h"));
        let built = build_heuristic(&[(tu, deps)]);
        assert_eq!(built.graph.edge_count(), 0);
    }

    #[test]
    fn precise_uses_direct_edges_only() {
        let mut deps = FxHashSet::default();
        deps.insert(p("a.h"));
        deps.insert(p("b.h"));
        deps.insert(p("c.h"));
        let tus = vec![(p("a.cpp"), deps)];
        let edges = vec![(p("a.h"), p("b.h"))];
        let built = build_precise(&edges, &tus);
        assert!(built.precise);
        assert_eq!(built.graph.edge_count(), 1);
    }
}
