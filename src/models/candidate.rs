//! Refactoring candidates produced by the improvement advisor.

use crate::models::metrics::NodeMetrics;
use crate::models::path::CanonicalPath;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntiPattern {
    GodObject,
    CycleParticipant,
    CouplingOutlier,
    UnstableInterface,
    HubNode,
}

impl AntiPattern {
    pub fn label(&self) -> &'static str {
        match self {
            AntiPattern::GodObject => "god_object",
            AntiPattern::CycleParticipant => "cycle_participant",
            AntiPattern::CouplingOutlier => "coupling_outlier",
            AntiPattern::UnstableInterface => "unstable_interface",
            AntiPattern::HubNode => "hub_node",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// fan_out >= 50 -> high, >= 20 -> medium, else low.
    pub fn from_fan_out(fan_out: usize) -> Self {
        if fan_out >= 50 {
            Effort::High
        } else if fan_out >= 20 {
            Effort::Medium
        } else {
            Effort::Low
        }
    }

    /// Effort-inverse component, 5/50/100 for high/medium/low.
    pub fn inverse_score(&self) -> f64 {
        match self {
            Effort::High => 5.0,
            Effort::Medium => 50.0,
            Effort::Low => 100.0,
        }
    }

    /// break-even: effort_cost_commits, 40/20/5 for high/medium/low.
    pub fn cost_commits(&self) -> f64 {
        match self {
            Effort::High => 40.0,
            Effort::Medium => 20.0,
            Effort::Low => 5.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    QuickWin,
    Critical,
    Moderate,
}

impl Severity {
    /// Sort priority ranking rule: critical=0, quick_win=1, moderate=2.
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::QuickWin => 1,
            Severity::Moderate => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::QuickWin => "quick_win",
            Severity::Critical => "critical",
            Severity::Moderate => "moderate",
        }
    }
}

/// A refactoring target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementCandidate {
    pub path: CanonicalPath,
    pub tags: Vec<AntiPattern>,
    pub metrics: NodeMetrics,
    pub estimated_coupling_reduction: f64,
    pub estimated_rebuild_reduction_pct: f64,
    pub effort: Effort,
    pub roi: f64,
    pub break_even_commits: u32,
    pub severity: Severity,
    pub steps: Vec<String>,
}

impl ImprovementCandidate {
    /// Renders the multi-line action plan text shown in CLI output.
    pub fn render(&self, rank: usize) -> String {
        let tags: Vec<&str> = self.tags.iter().map(|t| t.label()).collect();
        let mut out = format!(
            "#{rank}. {path}\nAnti-Pattern: {tags}\nMetrics: fan-in={fi}, fan-out={fo}, coupling={c}, stability={s:.2}\nROI: {roi:.0}/100   Effort: {effort}   Break-Even: {be} commits\nRebuild reduction: {rr:.1}%\nSteps:\n",
            rank = rank,
            path = self.path,
            tags = tags.join(", "),
            fi = self.metrics.fan_in,
            fo = self.metrics.fan_out,
            c = self.metrics.coupling,
            s = self.metrics.stability,
            roi = self.roi,
            effort = self.effort.label(),
            be = self.break_even_commits,
            rr = self.estimated_rebuild_reduction_pct,
        );
        for step in &self.steps {
            out.push_str(&format!("  - {step}\n"));
        }
        out
    }
}
