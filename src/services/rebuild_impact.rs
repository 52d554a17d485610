//! C5: Rebuild Impact Engine — transitive-dependent closure over a set of
//! changed files.

use crate::models::graph::{IncludeGraph, SourceToDeps};
use crate::models::path::CanonicalPath;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

/// Result of one rebuild-impact computation.
#[derive(Debug, Clone)]
pub struct RebuildImpact {
    /// Union of TUs whose inclusion set directly contains a changed header,
    /// plus any changed TU itself.
    pub direct_rebuild_set: FxHashSet<CanonicalPath>,
    /// Superset of `direct_rebuild_set`: TUs reachable via the include
    /// graph's transitive closure from a changed header.
    pub transitive_rebuild_set: FxHashSet<CanonicalPath>,
    pub tu_universe: usize,
}

impl RebuildImpact {
    pub fn direct_rebuild_percentage(&self) -> f64 {
        if self.tu_universe == 0 {
            0.0
        } else {
            self.direct_rebuild_set.len() as f64 / self.tu_universe as f64
        }
    }

    pub fn transitive_rebuild_percentage(&self) -> f64 {
        if self.tu_universe == 0 {
            0.0
        } else {
            self.transitive_rebuild_set.len() as f64 / self.tu_universe as f64
        }
    }
}

/// Splits a changed-file set into (TUs that are themselves compiled, headers).
fn partition_changed(
    changed: &[CanonicalPath],
    source_to_deps: &SourceToDeps,
) -> (Vec<CanonicalPath>, Vec<CanonicalPath>) {
    let mut sources = Vec::new();
    let mut headers = Vec::new();
    for path in changed {
        if source_to_deps.forward.contains_key(path) {
            sources.push(path.clone());
        } else {
            headers.push(path.clone());
        }
    }
    (sources, headers)
}

/// All headers that transitively reach `header` in the include graph (i.e.
/// "is included by" closure): `{header} ∪ {h' : h' reaches header}`.
fn headers_reaching(graph: &IncludeGraph, header: &CanonicalPath) -> FxHashSet<CanonicalPath> {
    let mut closure = FxHashSet::default();
    closure.insert(header.clone());
    let Some(start) = graph.node_index(header) else {
        return closure;
    };
    let mut stack = vec![start];
    let mut visited = FxHashSet::default();
    visited.insert(start);
    while let Some(idx) = stack.pop() {
        for pred in graph.predecessors(idx) {
            if visited.insert(pred) {
                closure.insert(graph.path_of(pred).clone());
                stack.push(pred);
            }
        }
    }
    closure
}

/// Computes both the direct and closure-based rebuild sets for a set of
/// changed files. Per-changed-header lookups are independent and run in
/// parallel; the final union is a reduction.
pub fn compute_rebuild_impact(
    changed: &[CanonicalPath],
    source_to_deps: &SourceToDeps,
    graph: &IncludeGraph,
) -> RebuildImpact {
    let (changed_sources, changed_headers) = partition_changed(changed, source_to_deps);

    let mut direct: FxHashSet<CanonicalPath> = changed_sources.iter().cloned().collect();
    let direct_from_headers: Vec<FxHashSet<CanonicalPath>> = changed_headers
        .par_iter()
        .map(|h| source_to_deps.dependents_of(h))
        .collect();
    for set in direct_from_headers {
        direct.extend(set);
    }

    let closures: Vec<FxHashSet<CanonicalPath>> = changed_headers
        .par_iter()
        .map(|h| headers_reaching(graph, h))
        .collect();
    let mut all_reaching_headers: FxHashSet<CanonicalPath> = FxHashSet::default();
    for c in closures {
        all_reaching_headers.extend(c);
    }

    let mut transitive: FxHashSet<CanonicalPath> = direct.clone();
    let expanded: Vec<FxHashSet<CanonicalPath>> = all_reaching_headers
        .par_iter()
        .map(|h| source_to_deps.dependents_of(h))
        .collect();
    for set in expanded {
        transitive.extend(set);
    }

    RebuildImpact {
        direct_rebuild_set: direct,
        transitive_rebuild_set: transitive,
        tu_universe: source_to_deps.tu_universe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn rebuild_impact_scenario_logger_header() {
        let mut source_to_deps = SourceToDeps::new();
        for i in 0..89 {
            let mut deps = FxHashSet::default();
            deps.insert(p("logger.h"));
            source_to_deps.insert(p(&format!("tu_logger_{i}.cpp")), deps);
        }
        for i in 0..(1000 - 89) {
            source_to_deps.insert(p(&format!("tu_other_{i}.cpp")), FxHashSet::default());
        }
        let graph = IncludeGraph::new();
        let impact = compute_rebuild_impact(&[p("logger.h")], &source_to_deps, &graph);
        assert_eq!(impact.direct_rebuild_set.len(), 89);
        assert!((impact.direct_rebuild_percentage() - 0.089).abs() < 1e-9);
    }
}
