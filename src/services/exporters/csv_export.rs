//! CSV export of per-node metrics, one row per path.

use crate::error::{DsmError, Result};
use crate::models::metrics::DsmMetrics;

/// Writes `node,fan_in,fan_out,coupling,stability,layer,scc_id,pagerank,betweenness`
/// rows, sorted by path for deterministic output.
pub fn export_csv(metrics: &DsmMetrics) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record([
            "node",
            "fan_in",
            "fan_out",
            "coupling",
            "stability",
            "layer",
            "scc_id",
            "pagerank",
            "betweenness",
        ])
        .map_err(|e| DsmError::AnalysisError {
            detail: format!("csv header write failed: {e}"),
        })?;

    let mut paths: Vec<_> = metrics.per_node.keys().collect();
    paths.sort();

    for path in paths {
        let m = &metrics.per_node[path];
        writer
            .write_record([
                path.as_str().to_string(),
                m.fan_in.to_string(),
                m.fan_out.to_string(),
                m.coupling.to_string(),
                format!("{:.6}", m.stability),
                m.layer.to_string(),
                m.scc_id.to_string(),
                format!("{:.6}", m.pagerank),
                format!("{:.6}", m.betweenness),
            ])
            .map_err(|e| DsmError::AnalysisError {
                detail: format!("csv row write failed: {e}"),
            })?;
    }

    let bytes = writer.into_inner().map_err(|e| DsmError::AnalysisError {
        detail: format!("csv flush failed: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| DsmError::AnalysisError {
        detail: format!("csv output was not valid utf-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::graph::IncludeGraph;
    use crate::models::path::CanonicalPath;
    use crate::services::metrics::DsmMetricEngine;

    #[test]
    fn exports_header_and_sorted_rows() {
        let mut g = IncludeGraph::new();
        g.add_edge(&CanonicalPath::new("b.h"), &CanonicalPath::new("a.h"));
        let config = Config::default();
        let metrics = DsmMetricEngine::new(&config).compute(&g).unwrap();

        let csv_text = export_csv(&metrics).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next().unwrap(), "node,fan_in,fan_out,coupling,stability,layer,scc_id,pagerank,betweenness");
        assert!(lines.next().unwrap().starts_with("a.h,"));
        assert!(lines.next().unwrap().starts_with("b.h,"));
    }
}
