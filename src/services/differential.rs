//! C8: Differential Analyzer — diffs two snapshots into a typed delta with
//! statistical commentary.

use crate::config::Config;
use crate::models::delta::{
    CouplingChange, CouplingStats, Delta, LayerMovement, Recommendation, RippleImpact,
    Severity, StabilityCrossing, StatisticalCommentary,
};
use crate::models::metrics::{DsmMetrics, Scc};
use crate::models::path::CanonicalPath;
use crate::models::snapshot::Snapshot;
use crate::services::rebuild_impact::compute_rebuild_impact;
use rustc_hash::{FxHashMap, FxHashSet};

fn coupling_stats(metrics: &DsmMetrics) -> CouplingStats {
    if metrics.per_node.is_empty() {
        return CouplingStats {
            mean: 0.0,
            median: 0.0,
            p95: 0.0,
            outlier_count: 0,
        };
    }
    let mut values: Vec<f64> = metrics.per_node.values().map(|m| m.coupling as f64).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };
    let p95_idx = ((n as f64 - 1.0) * 0.95).round() as usize;
    let p95 = values[p95_idx.min(n - 1)];

    let (mean_c, std_c) = metrics.coupling_mean_std();
    let ceiling = mean_c + 2.0 * std_c;
    let outlier_count = metrics
        .per_node
        .values()
        .filter(|m| m.coupling as f64 > ceiling)
        .count();

    CouplingStats {
        mean,
        median,
        p95,
        outlier_count,
    }
}

fn cycle_key(scc: &Scc) -> Vec<CanonicalPath> {
    let mut members = scc.members.clone();
    members.sort();
    members
}

/// Diffs baseline snapshot `baseline` against current snapshot `current`.
/// Both must apply the same filter configuration; if they
/// differ the caller is expected to have re-applied the active filter to
/// both before calling this (the filter spec mismatch is surfaced via the
/// returned recommendations rather than silently ignored).
pub fn diff(baseline: &Snapshot, current: &Snapshot, config: &Config) -> Delta {
    let nodes_b: FxHashSet<&CanonicalPath> = baseline.graph.nodes.iter().collect();
    let nodes_c: FxHashSet<&CanonicalPath> = current.graph.nodes.iter().collect();

    let mut nodes_added: Vec<CanonicalPath> =
        nodes_c.difference(&nodes_b).map(|p| (*p).clone()).collect();
    nodes_added.sort();
    let mut nodes_removed: Vec<CanonicalPath> =
        nodes_b.difference(&nodes_c).map(|p| (*p).clone()).collect();
    nodes_removed.sort();

    let edges_b: FxHashSet<&(CanonicalPath, CanonicalPath)> = baseline.graph.edges.iter().collect();
    let edges_c: FxHashSet<&(CanonicalPath, CanonicalPath)> = current.graph.edges.iter().collect();
    let mut edges_added: Vec<(CanonicalPath, CanonicalPath)> = edges_c
        .difference(&edges_b)
        .map(|e| (*e).clone())
        .collect();
    edges_added.sort();
    let mut edges_removed: Vec<(CanonicalPath, CanonicalPath)> = edges_b
        .difference(&edges_c)
        .map(|e| (*e).clone())
        .collect();
    edges_removed.sort();

    let common: Vec<&CanonicalPath> = nodes_b.intersection(&nodes_c).cloned().collect();

    let mut coupling_changed = Vec::new();
    let mut stability_threshold_crossings = Vec::new();
    let mut layer_movements = Vec::new();

    for path in &common {
        let mb = &baseline.metrics.per_node[*path];
        let mc = &current.metrics.per_node[*path];
        let delta = mc.coupling as i64 - mb.coupling as i64;
        if delta.abs() >= config.coupling_change_threshold {
            coupling_changed.push(CouplingChange {
                path: (*path).clone(),
                coupling_before: mb.coupling,
                coupling_after: mc.coupling,
                delta,
            });
        }
        let crossed_up = mb.stability <= 0.5 && mc.stability > 0.5;
        let crossed_down = mb.stability > 0.5 && mc.stability <= 0.5;
        if crossed_up || crossed_down {
            stability_threshold_crossings.push(StabilityCrossing {
                path: (*path).clone(),
                stability_before: mb.stability,
                stability_after: mc.stability,
                became_unstable: crossed_up,
            });
        }
        if mb.layer != mc.layer {
            layer_movements.push(LayerMovement {
                path: (*path).clone(),
                layer_before: mb.layer,
                layer_after: mc.layer,
            });
        }
    }
    coupling_changed.sort_by(|a, b| a.path.cmp(&b.path));
    stability_threshold_crossings.sort_by(|a, b| a.path.cmp(&b.path));
    layer_movements.sort_by(|a, b| a.path.cmp(&b.path));

    let cycles_b: FxHashMap<Vec<CanonicalPath>, &Scc> =
        baseline.metrics.cycles.iter().map(|c| (cycle_key(c), c)).collect();
    let cycles_c: FxHashMap<Vec<CanonicalPath>, &Scc> =
        current.metrics.cycles.iter().map(|c| (cycle_key(c), c)).collect();

    let mut cycles_added: Vec<Scc> = cycles_c
        .iter()
        .filter(|(k, _)| !cycles_b.contains_key(*k))
        .map(|(_, v)| (*v).clone())
        .collect();
    cycles_added.sort();
    let mut cycles_resolved: Vec<Scc> = cycles_b
        .iter()
        .filter(|(k, _)| !cycles_c.contains_key(*k))
        .map(|(_, v)| (*v).clone())
        .collect();
    cycles_resolved.sort();

    let current_graph: crate::models::graph::IncludeGraph = (&current.graph).into();
    let mut ripple_targets: Vec<CanonicalPath> = nodes_added.clone();
    ripple_targets.extend(coupling_changed.iter().map(|c| c.path.clone()));
    ripple_targets.sort();
    ripple_targets.dedup();

    let mut ripple_impact = Vec::new();
    for path in &ripple_targets {
        let impact = compute_rebuild_impact(
            std::slice::from_ref(path),
            &current.source_to_deps,
            &current_graph,
        );
        ripple_impact.push(RippleImpact {
            path: path.clone(),
            direct_tu_count: impact.direct_rebuild_set.len(),
            transitive_tu_count: impact.transitive_rebuild_set.len(),
        });
    }

    let quality_delta = current.metrics.architecture_quality - baseline.metrics.architecture_quality;

    let baseline_stats = coupling_stats(&baseline.metrics);
    let current_stats = coupling_stats(&current.metrics);
    let outlier_count_change_pct = if baseline_stats.outlier_count == 0 {
        if current_stats.outlier_count == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        ((current_stats.outlier_count as f64 - baseline_stats.outlier_count as f64)
            / baseline_stats.outlier_count as f64)
            * 100.0
    };

    let mut recommendations = Vec::new();
    for scc in &cycles_added {
        let members: Vec<String> = scc.members.iter().map(|m| m.to_string()).collect();
        let fas_edge = current
            .metrics
            .feedback_arc_sets
            .get(&scc.id)
            .and_then(|edges| edges.first())
            .map(|(a, b)| format!("{a} -> {b}"))
            .unwrap_or_else(|| "(none)".to_string());
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            text: format!(
                "new cycle introduced among [{}]; minimum feedback edge: {fas_edge}",
                members.join(", ")
            ),
        });
    }
    for scc in &cycles_resolved {
        let members: Vec<String> = scc.members.iter().map(|m| m.to_string()).collect();
        recommendations.push(Recommendation {
            severity: Severity::QuickWin,
            text: format!("cycle resolved among [{}]", members.join(", ")),
        });
    }
    if quality_delta < -5.0 {
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            text: format!("architecture quality dropped by {:.1} points", -quality_delta),
        });
    } else if quality_delta > 5.0 {
        recommendations.push(Recommendation {
            severity: Severity::Moderate,
            text: format!("architecture quality improved by {quality_delta:.1} points"),
        });
    }

    Delta {
        nodes_added,
        nodes_removed,
        edges_added,
        edges_removed,
        coupling_changed,
        stability_threshold_crossings,
        cycles_added,
        cycles_resolved,
        layer_movements,
        ripple_impact,
        quality_delta,
        statistics: StatisticalCommentary {
            baseline: baseline_stats,
            current: current_stats,
            outlier_count_change_pct,
        },
        recommendations,
    }
}
