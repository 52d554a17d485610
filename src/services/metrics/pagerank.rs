//! PageRank centrality.

use crate::models::graph::IncludeGraph;
use crate::models::path::CanonicalPath;
use rustc_hash::FxHashMap;

pub struct PageRankResult {
    pub scores: FxHashMap<CanonicalPath, f64>,
    pub converged: bool,
}

/// Standard damped random walk. Deterministic: nodes are processed in
/// sorted-path order and the initial vector is uniform 1/|V|.
pub fn compute_pagerank(
    graph: &IncludeGraph,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
) -> PageRankResult {
    let paths = graph.sorted_paths();
    let n = paths.len();
    if n == 0 {
        return PageRankResult {
            scores: FxHashMap::default(),
            converged: true,
        };
    }

    let index_of: FxHashMap<&CanonicalPath, usize> =
        paths.iter().enumerate().map(|(i, p)| (p, i)).collect();
    let out_degree: Vec<usize> = paths
        .iter()
        .map(|p| graph.fan_out(graph.node_index(p).unwrap()))
        .collect();

    let mut rank = vec![1.0 / n as f64; n];
    let mut converged = false;

    for _ in 0..max_iterations {
        let mut next = vec![(1.0 - damping) / n as f64; n];
        for (i, path) in paths.iter().enumerate() {
            let idx = graph.node_index(path).unwrap();
            if out_degree[i] == 0 {
                // Dangling mass is redistributed uniformly across all nodes.
                let share = damping * rank[i] / n as f64;
                for v in next.iter_mut() {
                    *v += share;
                }
            } else {
                let share = damping * rank[i] / out_degree[i] as f64;
                for succ in graph.successors(idx) {
                    let j = index_of[graph.path_of(succ)];
                    next[j] += share;
                }
            }
        }

        let l1: f64 = rank.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        rank = next;
        if l1 < tolerance {
            converged = true;
            break;
        }
    }

    let scores = paths.into_iter().zip(rank).collect();
    PageRankResult { scores, converged }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn scores_sum_close_to_one() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("a.h"), &p("b.h"));
        g.add_edge(&p("b.h"), &p("c.h"));
        g.add_edge(&p("c.h"), &p("a.h"));
        let result = compute_pagerank(&g, 0.85, 1e-6, 100);
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-3);
        assert!(result.converged);
    }

    #[test]
    fn empty_graph_converges_trivially() {
        let g = IncludeGraph::new();
        let result = compute_pagerank(&g, 0.85, 1e-6, 100);
        assert!(result.scores.is_empty());
        assert!(result.converged);
    }
}
