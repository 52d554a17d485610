//! Explicit, serializable configuration.
//!
//! There is no process-wide state anywhere in `dsm_core`: every tunable the
//! components need is a field on [`Config`], constructed once by the caller
//! and passed by reference through the pipeline. Optional features
//! (centrality sampling, precise-vs-heuristic ingestion, color) never leak in
//! as ambient globals.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything the DSM pipeline needs to know to behave deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns a path must match at least one of to be kept (empty = accept all).
    pub include_patterns: Vec<String>,
    /// Glob patterns that exclude a path even if it matched an include pattern.
    pub exclude_patterns: Vec<String>,
    /// Prefixes that classify a path as a system header (e.g. `/usr/`, `/lib/`).
    pub system_prefixes: Vec<String>,
    /// Glob patterns that classify a path as third-party (default `*/ThirdParty/*`).
    pub third_party_patterns: Vec<String>,
    /// File extensions treated as "generated" sources when found under a build dir.
    pub generated_extensions: Vec<String>,
    /// When false (the default), nodes classified as `System` are stripped
    /// from the include graph the pipeline hands back, after closures over
    /// them have already been computed.
    pub include_system_headers: bool,

    /// PageRank damping factor.
    pub pagerank_damping: f64,
    /// PageRank L1 convergence tolerance.
    pub pagerank_tolerance: f64,
    /// PageRank iteration ceiling.
    pub pagerank_max_iterations: usize,

    /// Above this node count, betweenness centrality samples source vertices
    /// instead of computing exactly.
    pub betweenness_sampling_threshold: usize,
    /// Number of sampled sources when sampling kicks in.
    pub betweenness_sample_size: usize,
    /// Fixed PRNG seed for sampled betweenness, for reproducibility.
    pub betweenness_sample_seed: u64,

    /// SCCs at or below this size get an exact minimum feedback arc set;
    /// larger SCCs fall back to the greedy approximation.
    pub feedback_arc_exact_threshold: usize,

    /// Minimum |Δcoupling| to report a node in a differential analysis.
    pub coupling_change_threshold: i64,

    /// Divisor used by the break-even estimator.
    pub average_commits_affected: f64,

    /// Hard ceiling on node count before the builder refuses further work.
    pub max_nodes: usize,

    /// Timeout applied to each external scanner invocation.
    pub scanner_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            system_prefixes: vec![
                "/usr/".to_string(),
                "/lib/".to_string(),
                "/opt/".to_string(),
            ],
            third_party_patterns: vec!["*/ThirdParty/*".to_string()],
            generated_extensions: vec!["generated.h".to_string(), "pb.h".to_string()],
            include_system_headers: false,

            pagerank_damping: 0.85,
            pagerank_tolerance: 1e-6,
            pagerank_max_iterations: 100,

            betweenness_sampling_threshold: 5000,
            betweenness_sample_size: 500,
            betweenness_sample_seed: 0x5d5_c0de,

            feedback_arc_exact_threshold: 8,

            coupling_change_threshold: 5,

            average_commits_affected: 10.0,

            max_nodes: 50_000,

            scanner_timeout: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load configuration overrides from a TOML document, falling back to
    /// `Config::default()` for any field the document omits.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
