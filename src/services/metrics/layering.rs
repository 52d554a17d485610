//! Topological layering over the SCC-contracted DAG.
//!
//! Each SCC is contracted to a single vertex; the contracted DAG is then
//! layered by longest path to a sink (layer 0 = no outgoing edges in the
//! contracted DAG, i.e. "depends on nothing else"), and every member of an
//! SCC shares its component's layer.

use crate::error::{DsmError, Result};
use crate::models::graph::IncludeGraph;
use crate::models::path::CanonicalPath;
use crate::services::metrics::scc::SccAssignment;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

pub fn compute_layers(
    graph: &IncludeGraph,
    assignment: &SccAssignment,
) -> Result<FxHashMap<CanonicalPath, u32>> {
    // Build the contracted DAG: one vertex per SCC id.
    let mut contracted: DiGraph<u32, ()> = DiGraph::new();
    let mut scc_node: FxHashMap<u32, NodeIndex> = FxHashMap::default();
    for scc in &assignment.all {
        let idx = contracted.add_node(scc.id);
        scc_node.insert(scc.id, idx);
    }
    for (from, to) in graph.edges() {
        let a = assignment.node_to_scc[&from];
        let b = assignment.node_to_scc[&to];
        if a != b {
            let (ia, ib) = (scc_node[&a], scc_node[&b]);
            if contracted.find_edge(ia, ib).is_none() {
                contracted.add_edge(ia, ib, ());
            }
        }
    }

    let order = toposort(&contracted, None).map_err(|_| DsmError::AnalysisError {
        detail: "contracted DAG still contains a cycle after SCC contraction".to_string(),
    })?;

    // Process in reverse topological order: every successor of a node has
    // already been assigned a layer by the time we reach it.
    let mut layer_by_idx: FxHashMap<NodeIndex, u32> = FxHashMap::default();
    for &idx in order.iter().rev() {
        let max_successor_layer = contracted
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .map(|succ| layer_by_idx[&succ])
            .max();
        let layer = match max_successor_layer {
            Some(m) => m + 1,
            None => 0,
        };
        layer_by_idx.insert(idx, layer);
    }

    let mut scc_layer: FxHashMap<u32, u32> = FxHashMap::default();
    for (&scc_id, &idx) in &scc_node {
        scc_layer.insert(scc_id, layer_by_idx[&idx]);
    }

    let mut result = FxHashMap::default();
    for scc in &assignment.all {
        for member in &scc.members {
            result.insert(member.clone(), scc_layer[&scc.id]);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::metrics::scc::compute_sccs;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn chain_of_five_layers_from_sink() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("h1.h"), &p("h2.h"));
        g.add_edge(&p("h2.h"), &p("h3.h"));
        g.add_edge(&p("h3.h"), &p("h4.h"));
        g.add_edge(&p("h4.h"), &p("h5.h"));
        let assignment = compute_sccs(&g);
        let layers = compute_layers(&g, &assignment).unwrap();
        assert_eq!(layers[&p("h5.h")], 0);
        assert_eq!(layers[&p("h4.h")], 1);
        assert_eq!(layers[&p("h3.h")], 2);
        assert_eq!(layers[&p("h2.h")], 3);
        assert_eq!(layers[&p("h1.h")], 4);
    }

    #[test]
    fn triangle_members_share_layer_zero() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("a.h"), &p("b.h"));
        g.add_edge(&p("b.h"), &p("c.h"));
        g.add_edge(&p("c.h"), &p("a.h"));
        let assignment = compute_sccs(&g);
        let layers = compute_layers(&g, &assignment).unwrap();
        assert_eq!(layers[&p("a.h")], 0);
        assert_eq!(layers[&p("b.h")], 0);
        assert_eq!(layers[&p("c.h")], 0);
    }
}
