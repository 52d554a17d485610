//! C9: Improvement Advisor — anti-pattern detection, ROI scoring and ranking
//! of refactoring candidates.

use crate::config::Config;
use crate::models::candidate::{AntiPattern, Effort, ImprovementCandidate, Severity};
use crate::models::graph::IncludeGraph;
use crate::models::metrics::DsmMetrics;
use crate::models::path::CanonicalPath;
use crate::services::rebuild_impact::compute_rebuild_impact;
use rustc_hash::FxHashSet;

/// Coupling outlier ceiling: mean + 2 standard deviations.
fn is_coupling_outlier(coupling: usize, mean: f64, std: f64) -> bool {
    coupling as f64 > mean + 2.0 * std
}

fn tag_node(
    path: &CanonicalPath,
    metrics: &DsmMetrics,
    mean_coupling: f64,
    std_coupling: f64,
    in_cycle: &FxHashSet<&CanonicalPath>,
) -> Vec<AntiPattern> {
    let m = &metrics.per_node[path];
    let mut tags = Vec::new();

    if m.fan_out >= 50 {
        tags.push(AntiPattern::GodObject);
    }
    if in_cycle.contains(path) {
        tags.push(AntiPattern::CycleParticipant);
    }
    if is_coupling_outlier(m.coupling, mean_coupling, std_coupling) {
        tags.push(AntiPattern::CouplingOutlier);
    }
    if m.stability > 0.5 && m.fan_in >= 10 {
        tags.push(AntiPattern::UnstableInterface);
    }
    if m.fan_in >= 20 && m.fan_out >= 20 {
        tags.push(AntiPattern::HubNode);
    }
    tags
}

fn severity_for(tags: &[AntiPattern]) -> Severity {
    if tags.contains(&AntiPattern::CycleParticipant) || tags.contains(&AntiPattern::GodObject) {
        Severity::Critical
    } else if tags.contains(&AntiPattern::CouplingOutlier) || tags.contains(&AntiPattern::HubNode) {
        Severity::Moderate
    } else {
        Severity::QuickWin
    }
}

fn steps_for(tags: &[AntiPattern], path: &CanonicalPath) -> Vec<String> {
    let mut steps = Vec::new();
    for tag in tags {
        match tag {
            AntiPattern::GodObject => steps.push(format!(
                "split {path} along its distinct responsibility groups before touching callers"
            )),
            AntiPattern::CycleParticipant => steps.push(format!(
                "break the cycle through {path} by extracting a shared interface header"
            )),
            AntiPattern::CouplingOutlier => steps.push(format!(
                "reduce the include surface of {path}; forward-declare where a full definition isn't needed"
            )),
            AntiPattern::UnstableInterface => steps.push(format!(
                "stabilize {path}'s public interface before further consumers depend on it"
            )),
            AntiPattern::HubNode => steps.push(format!(
                "introduce an intermediate abstraction layer to de-centralize {path}"
            )),
        }
    }
    steps
}

/// Generates and ranks refactoring candidates for `graph`'s precomputed
/// `metrics`. Only nodes carrying at least one anti-pattern tag
/// are returned.
pub fn advise(
    graph: &IncludeGraph,
    metrics: &DsmMetrics,
    source_to_deps: &crate::models::graph::SourceToDeps,
    config: &Config,
) -> Vec<ImprovementCandidate> {
    if metrics.per_node.is_empty() {
        return Vec::new();
    }

    let (mean_coupling, std_coupling) = metrics.coupling_mean_std();
    let in_cycle: FxHashSet<&CanonicalPath> = metrics
        .cycles
        .iter()
        .flat_map(|scc| scc.members.iter())
        .collect();

    let mut candidates = Vec::new();
    let mut paths: Vec<&CanonicalPath> = metrics.per_node.keys().collect();
    paths.sort();

    for path in paths {
        let tags = tag_node(path, metrics, mean_coupling, std_coupling, &in_cycle);
        if tags.is_empty() {
            continue;
        }
        let m = metrics.per_node[path].clone();

        let impact = compute_rebuild_impact(
            std::slice::from_ref(path),
            source_to_deps,
            graph,
        );
        let estimated_rebuild_reduction_pct = impact.transitive_rebuild_percentage() * 100.0;

        // Reduction estimate assumes removing half the outgoing edges of a
        // god-object / hub node is achievable; otherwise a conservative 10%.
        let estimated_coupling_reduction = if tags.contains(&AntiPattern::GodObject)
            || tags.contains(&AntiPattern::HubNode)
        {
            m.coupling as f64 * 0.5
        } else {
            m.coupling as f64 * 0.1
        };

        let effort = Effort::from_fan_out(m.fan_out);
        let impact_score = estimated_rebuild_reduction_pct
            + estimated_coupling_reduction
            + if tags.contains(&AntiPattern::CycleParticipant) {
                20.0
            } else {
                0.0
            };
        let roi = (impact_score * effort.inverse_score() / 100.0).min(100.0);
        let break_even_commits =
            (effort.cost_commits() / (config.average_commits_affected.max(1.0) / 10.0)).ceil() as u32;

        let severity = severity_for(&tags);
        let steps = steps_for(&tags, path);

        candidates.push(ImprovementCandidate {
            path: path.clone(),
            tags,
            metrics: m,
            estimated_coupling_reduction,
            estimated_rebuild_reduction_pct,
            effort,
            roi,
            break_even_commits,
            severity,
            steps,
        });
    }

    candidates.sort_by(|a, b| {
        a.severity
            .priority()
            .cmp(&b.severity.priority())
            .then(b.roi.partial_cmp(&a.roi).unwrap())
            .then(a.path.cmp(&b.path))
    });

    candidates
}
