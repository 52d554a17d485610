//! Betweenness centrality via Brandes' algorithm, unnormalized,
//! over the full directed graph. For graphs with more than
//! `Config::betweenness_sampling_threshold` nodes, sources are sampled
//! uniformly at random with a fixed seed and the result scaled back up.

use crate::models::graph::IncludeGraph;
use crate::models::path::CanonicalPath;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

pub struct BetweennessResult {
    pub scores: FxHashMap<CanonicalPath, f64>,
    pub sampled: bool,
}

/// One Brandes BFS pass from a single source, returning the per-node
/// dependency contribution (unnormalized).
fn brandes_from_source(graph: &IncludeGraph, source: NodeIndex, n: usize) -> Vec<f64> {
    let mut sigma = vec![0.0f64; n]; // number of shortest paths
    let mut dist = vec![-1i64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    sigma[source.index()] = 1.0;
    dist[source.index()] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        for w in graph.successors(v) {
            if dist[w.index()] < 0 {
                dist[w.index()] = dist[v.index()] + 1;
                queue.push_back(w);
            }
            if dist[w.index()] == dist[v.index()] + 1 {
                sigma[w.index()] += sigma[v.index()];
                preds[w.index()].push(v.index());
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    for &w in order.iter().rev() {
        for &v in &preds[w.index()] {
            if sigma[w.index()] > 0.0 {
                delta[v] += (sigma[v] / sigma[w.index()]) * (1.0 + delta[w.index()]);
            }
        }
    }
    delta[source.index()] = 0.0;
    delta
}

/// Deterministic xorshift for fixed-seed sampling, avoiding a dependency on
/// an external RNG crate for this narrow use.
struct Xorshift64(u64);

impl Xorshift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

pub fn compute_betweenness(
    graph: &IncludeGraph,
    sampling_threshold: usize,
    sample_size: usize,
    seed: u64,
) -> BetweennessResult {
    let paths = graph.sorted_paths();
    let n = paths.len();
    if n == 0 {
        return BetweennessResult {
            scores: FxHashMap::default(),
            sampled: false,
        };
    }

    let indices: Vec<NodeIndex> = paths.iter().map(|p| graph.node_index(p).unwrap()).collect();

    let (sources, scale): (Vec<NodeIndex>, f64) = if n > sampling_threshold {
        let mut rng = Xorshift64(if seed == 0 { 0x9e3779b97f4a7c15 } else { seed });
        let mut pool = indices.clone();
        let mut sampled = Vec::with_capacity(sample_size.min(pool.len()));
        for _ in 0..sample_size.min(pool.len()) {
            let i = (rng.next_u64() as usize) % pool.len();
            sampled.push(pool.remove(i));
        }
        let scale = n as f64 / sampled.len() as f64;
        (sampled, scale)
    } else {
        (indices.clone(), 1.0)
    };
    let sampled_flag = sources.len() < n;

    let totals: Vec<f64> = sources
        .par_iter()
        .map(|&src| brandes_from_source(graph, src, n))
        .reduce(
            || vec![0.0f64; n],
            |mut acc, d| {
                for i in 0..n {
                    acc[i] += d[i];
                }
                acc
            },
        );

    let mut scores = FxHashMap::default();
    for (i, path) in paths.into_iter().enumerate() {
        scores.insert(path, totals[i] * scale);
    }

    BetweennessResult {
        scores,
        sampled: sampled_flag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::new(s)
    }

    #[test]
    fn chain_middle_node_has_highest_betweenness() {
        let mut g = IncludeGraph::new();
        g.add_edge(&p("a"), &p("b"));
        g.add_edge(&p("b"), &p("c"));
        let result = compute_betweenness(&g, 5000, 500, 1);
        assert!(!result.sampled);
        assert!(result.scores[&p("b")] > result.scores[&p("a")]);
        assert!(result.scores[&p("b")] > result.scores[&p("c")]);
    }
}
