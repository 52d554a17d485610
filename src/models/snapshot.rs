//! Versioned, immutable analysis results.

use crate::config::Config;
use crate::models::graph::{GraphData, SourceToDeps};
use crate::models::metrics::DsmMetrics;
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"DSM1";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The filter configuration that produced a snapshot, retained so a diff can
/// detect when two snapshots used different filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub system_prefixes: Vec<String>,
    pub third_party_patterns: Vec<String>,
}

impl From<&Config> for FilterSpec {
    fn from(c: &Config) -> Self {
        Self {
            include_patterns: c.include_patterns.clone(),
            exclude_patterns: c.exclude_patterns.clone(),
            system_prefixes: c.system_prefixes.clone(),
            third_party_patterns: c.third_party_patterns.clone(),
        }
    }
}

/// A versioned, immutable aggregate: the complete result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub tool_version: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Project root this snapshot's paths are relative to, recorded for
    /// load-time renormalization.
    pub project_root: String,
    /// A 64-bit hash of `build.ninja`'s canonical contents, identifying the
    /// build directory this snapshot was taken from.
    pub build_dir_hash: u64,
    pub filter_spec: FilterSpec,
    pub graph: GraphData,
    pub source_to_deps: SourceToDeps,
    pub metrics: DsmMetrics,
    /// False when the graph was built from the co-occurrence proxy rather
    /// than precise direct-include scanning.
    pub precise: bool,
    pub centrality_sampled: bool,
}

impl Snapshot {
    pub fn identity_key(&self) -> String {
        format!("{}@{}", self.project_root, self.build_dir_hash)
    }
}
