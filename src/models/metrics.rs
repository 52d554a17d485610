//! Per-node and matrix-wide DSM metrics.

use crate::models::path::CanonicalPath;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Per-node metric record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub fan_in: usize,
    pub fan_out: usize,
    pub coupling: usize,
    pub stability: f64,
    pub layer: u32,
    pub scc_id: u32,
    pub pagerank: f64,
    pub betweenness: f64,
}

impl NodeMetrics {
    pub fn coupling_of(fan_in: usize, fan_out: usize) -> (usize, f64) {
        let coupling = fan_in + fan_out;
        let stability = if coupling == 0 {
            0.0
        } else {
            fan_out as f64 / coupling as f64
        };
        (coupling, stability)
    }
}

/// A strongly-connected component, stored as the sorted set of its member
/// paths so two snapshots can be compared by value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scc {
    pub id: u32,
    pub members: Vec<CanonicalPath>,
}

impl Scc {
    /// A cycle per: size >= 2, or size 1 with a self-loop. The
    /// metric engine only ever constructs size-1 SCCs here when a self-loop
    /// was detected (self-loops are otherwise dropped at ingest), so any
    /// `Scc` with len() > 1 recorded in `cycles` is definitionally a cycle.
    pub fn is_cycle(&self) -> bool {
        self.members.len() > 1
    }
}

/// Diagnostic counters accumulated during a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub parse_errors: usize,
    pub missing_scanner_output: usize,
    pub path_errors: usize,
    pub centrality_converged: bool,
    pub betweenness_sampled: bool,
}

/// Matrix-wide and per-node metrics for one graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsmMetrics {
    pub per_node: FxHashMap<CanonicalPath, NodeMetrics>,
    pub node_count: usize,
    pub edge_count: usize,
    pub sparsity: f64,
    pub cycles: Vec<Scc>,
    pub cycle_member_count: usize,
    pub adp_score: f64,
    pub interface_ratio: f64,
    pub architecture_quality: f64,
    /// Minimum feedback arc set per cycle, recorded as (scc_id, edges).
    pub feedback_arc_sets: FxHashMap<u32, Vec<(CanonicalPath, CanonicalPath)>>,
    pub diagnostics: Diagnostics,
}

impl DsmMetrics {
    pub fn empty() -> Self {
        Self {
            per_node: FxHashMap::default(),
            node_count: 0,
            edge_count: 0,
            sparsity: 0.0,
            cycles: Vec::new(),
            cycle_member_count: 0,
            adp_score: 100.0,
            interface_ratio: 0.0,
            architecture_quality: 100.0,
            feedback_arc_sets: FxHashMap::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Mean and population standard deviation of coupling across all nodes.
    pub fn coupling_mean_std(&self) -> (f64, f64) {
        if self.per_node.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.per_node.len() as f64;
        let mean: f64 = self.per_node.values().map(|m| m.coupling as f64).sum::<f64>() / n;
        let var: f64 = self
            .per_node
            .values()
            .map(|m| (m.coupling as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, var.sqrt())
    }
}
