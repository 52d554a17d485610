//! C4: DSM Metric Engine — ties together fan-in/out, coupling, stability,
//! sparsity, SCCs, layering, feedback arc sets, PageRank and betweenness
//! into one `DsmMetrics` snapshot.

use crate::config::Config;
use crate::models::graph::IncludeGraph;
use crate::models::metrics::{Diagnostics, DsmMetrics, NodeMetrics};
use crate::services::metrics::{betweenness, feedback_arc, layering, pagerank, scc};
use rustc_hash::FxHashMap;

pub struct DsmMetricEngine<'a> {
    config: &'a Config,
}

impl<'a> DsmMetricEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn compute(&self, graph: &IncludeGraph) -> crate::error::Result<DsmMetrics> {
        let n = graph.node_count();
        let e = graph.edge_count();

        if n == 0 {
            return Ok(DsmMetrics::empty());
        }

        let sparsity = if n < 2 {
            0.0
        } else {
            1.0 - (e as f64) / ((n * (n - 1)) as f64)
        };

        let assignment = scc::compute_sccs(graph);
        let layers = layering::compute_layers(graph, &assignment)?;

        let pr = pagerank::compute_pagerank(
            graph,
            self.config.pagerank_damping,
            self.config.pagerank_tolerance,
            self.config.pagerank_max_iterations,
        );
        let bc = betweenness::compute_betweenness(
            graph,
            self.config.betweenness_sampling_threshold,
            self.config.betweenness_sample_size,
            self.config.betweenness_sample_seed,
        );

        let all_edges: Vec<_> = graph.edges().collect();
        let feedback_arc_sets = feedback_arc::compute_feedback_arc_sets(
            &assignment.cycles,
            &all_edges,
            &bc.scores,
            self.config.feedback_arc_exact_threshold,
        );

        let mut per_node = FxHashMap::default();
        for path in graph.sorted_paths() {
            let idx = graph.node_index(&path).unwrap();
            let fan_in = graph.fan_in(idx);
            let fan_out = graph.fan_out(idx);
            let (coupling, stability) = NodeMetrics::coupling_of(fan_in, fan_out);
            per_node.insert(
                path.clone(),
                NodeMetrics {
                    fan_in,
                    fan_out,
                    coupling,
                    stability,
                    layer: layers[&path],
                    scc_id: assignment.node_to_scc[&path],
                    pagerank: pr.scores.get(&path).copied().unwrap_or(0.0),
                    betweenness: bc.scores.get(&path).copied().unwrap_or(0.0),
                },
            );
        }

        let cycle_member_count: usize = assignment.cycles.iter().map(|c| c.members.len()).sum();
        let adp_score = if assignment.cycles.is_empty() {
            100.0
        } else {
            100.0 * (1.0 - cycle_member_count as f64 / n as f64)
        };

        let (mean, std) = {
            let total: f64 = per_node.values().map(|m| m.coupling as f64).sum();
            let mean = total / n as f64;
            let var: f64 = per_node
                .values()
                .map(|m| (m.coupling as f64 - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            (mean, var.sqrt())
        };
        let outlier_free_frac = {
            let ceiling = mean + 2.0 * std;
            let within = per_node.values().filter(|m| m.coupling as f64 <= ceiling).count();
            within as f64 / n as f64
        };
        let stable_interface_frac = {
            let matching = per_node
                .values()
                .filter(|m| m.stability <= 0.5 && m.fan_in >= 10)
                .count();
            matching as f64 / n as f64
        };

        let architecture_quality = 0.40 * (sparsity * 100.0)
            + 0.30 * adp_score
            + 0.20 * (outlier_free_frac * 100.0)
            + 0.10 * (stable_interface_frac * 100.0);

        let diagnostics = Diagnostics {
            parse_errors: 0,
            missing_scanner_output: 0,
            path_errors: 0,
            centrality_converged: pr.converged,
            betweenness_sampled: bc.sampled,
        };

        Ok(DsmMetrics {
            per_node,
            node_count: n,
            edge_count: e,
            sparsity,
            cycles: assignment.cycles,
            cycle_member_count,
            adp_score,
            interface_ratio: stable_interface_frac,
            architecture_quality,
            feedback_arc_sets,
            diagnostics,
        })
    }
}
