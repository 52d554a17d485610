//! Strongly connected components and cycle classification.

use crate::models::graph::IncludeGraph;
use crate::models::metrics::Scc;
use petgraph::algo::tarjan_scc;
use rustc_hash::FxHashMap;

/// Computes SCCs via petgraph's Tarjan implementation, then assigns stable
/// ids by sorting each component's members alphabetically and sorting
/// components by their minimum member. `IncludeGraph` never holds
/// self-loops (see `IncludeGraph::add_edge`), so a singleton component is
/// never a cycle.
pub struct SccAssignment {
    /// path -> scc id, for every node in the graph (singletons included).
    pub node_to_scc: FxHashMap<crate::models::path::CanonicalPath, u32>,
    /// Only components with >= 2 members.
    pub cycles: Vec<Scc>,
    /// All components, including singletons, in stable id order.
    pub all: Vec<Scc>,
}

pub fn compute_sccs(graph: &IncludeGraph) -> SccAssignment {
    let raw = tarjan_scc(graph.petgraph());

    let mut components: Vec<Vec<crate::models::path::CanonicalPath>> = raw
        .into_iter()
        .map(|indices| {
            let mut members: Vec<_> = indices.into_iter().map(|idx| graph.path_of(idx).clone()).collect();
            members.sort();
            members
        })
        .collect();
    components.sort_by(|a, b| a.first().cmp(&b.first()));

    let mut node_to_scc = FxHashMap::default();
    let mut all = Vec::with_capacity(components.len());
    let mut cycles = Vec::new();

    for (id, members) in components.into_iter().enumerate() {
        let id = id as u32;
        for m in &members {
            node_to_scc.insert(m.clone(), id);
        }
        let scc = Scc { id, members };
        if scc.is_cycle() {
            cycles.push(scc.clone());
        }
        all.push(scc);
    }

    SccAssignment {
        node_to_scc,
        cycles,
        all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::path::CanonicalPath;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn triangle_is_one_cycle() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("a.h"), &p("b.h"));
        g.add_edge(&p("b.h"), &p("c.h"));
        g.add_edge(&p("c.h"), &p("a.h"));
        let assignment = compute_sccs(&g);
        assert_eq!(assignment.cycles.len(), 1);
        assert_eq!(assignment.cycles[0].members.len(), 3);
    }

    #[test]
    fn dag_has_no_cycles() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("h1.h"), &p("h2.h"));
        g.add_edge(&p("h2.h"), &p("h3.h"));
        let assignment = compute_sccs(&g);
        assert!(assignment.cycles.is_empty());
        assert_eq!(assignment.all.len(), 3);
    }
}
