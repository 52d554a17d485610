//! The typed difference between two snapshots.

use crate::models::metrics::Scc;
use crate::models::path::CanonicalPath;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingChange {
    pub path: CanonicalPath,
    pub coupling_before: usize,
    pub coupling_after: usize,
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityCrossing {
    pub path: CanonicalPath,
    pub stability_before: f64,
    pub stability_after: f64,
    /// true if it crossed from <=0.5 to >0.5 (towards instability).
    pub became_unstable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerMovement {
    pub path: CanonicalPath,
    pub layer_before: u32,
    pub layer_after: u32,
}

/// Estimated rebuild impact of a single changed node, computed by treating
/// that node as the sole entry of a pseudo-changed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RippleImpact {
    pub path: CanonicalPath,
    pub direct_tu_count: usize,
    pub transitive_tu_count: usize,
}

/// Severity tag attached to a generated recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    QuickWin,
    Moderate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingStats {
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalCommentary {
    pub baseline: CouplingStats,
    pub current: CouplingStats,
    pub outlier_count_change_pct: f64,
}

/// Typed difference between baseline snapshot `B` and current snapshot `C`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub nodes_added: Vec<CanonicalPath>,
    pub nodes_removed: Vec<CanonicalPath>,
    pub edges_added: Vec<(CanonicalPath, CanonicalPath)>,
    pub edges_removed: Vec<(CanonicalPath, CanonicalPath)>,
    pub coupling_changed: Vec<CouplingChange>,
    pub stability_threshold_crossings: Vec<StabilityCrossing>,
    pub cycles_added: Vec<Scc>,
    pub cycles_resolved: Vec<Scc>,
    pub layer_movements: Vec<LayerMovement>,
    pub ripple_impact: Vec<RippleImpact>,
    pub quality_delta: f64,
    pub statistics: StatisticalCommentary,
    pub recommendations: Vec<Recommendation>,
}
