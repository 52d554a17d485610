//! Graphviz DOT export, with cycle members highlighted.

use crate::error::{DsmError, Result};
use crate::models::graph::GraphData;
use crate::models::metrics::DsmMetrics;
use rustc_hash::FxHashSet;
use std::fmt::Write as _;

fn dot_escape(s: &str) -> String {
    s.replace('"', "\\\"")
}

pub fn export_dot(graph: &GraphData, metrics: &DsmMetrics) -> Result<String> {
    let mut out = String::new();
    let wrap = |e: std::fmt::Error| DsmError::AnalysisError {
        detail: format!("dot write failed: {e}"),
    };

    let cycle_members: FxHashSet<_> = metrics
        .cycles
        .iter()
        .flat_map(|scc| scc.members.iter())
        .collect();

    writeln!(out, "digraph dependency_structure_matrix {{").map_err(wrap)?;
    writeln!(out, "  rankdir=LR;").map_err(wrap)?;

    for path in &graph.nodes {
        let label = dot_escape(path.as_str());
        if cycle_members.contains(path) {
            writeln!(
                out,
                r#"  "{label}" [style=filled, fillcolor="#f4cccc"];"#
            )
            .map_err(wrap)?;
        } else {
            writeln!(out, r#"  "{label}";"#).map_err(wrap)?;
        }
    }

    for (from, to) in &graph.edges {
        writeln!(
            out,
            r#"  "{}" -> "{}";"#,
            dot_escape(from.as_str()),
            dot_escape(to.as_str())
        )
        .map_err(wrap)?;
    }

    writeln!(out, "}}").map_err(wrap)?;
    Ok(out)
}
