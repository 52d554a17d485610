//! GraphML export with full metric attributes.

use crate::error::{DsmError, Result};
use crate::models::graph::GraphData;
use crate::models::metrics::DsmMetrics;
use std::fmt::Write as _;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn export_graphml(graph: &GraphData, metrics: &DsmMetrics) -> Result<String> {
    let mut out = String::new();
    let wrap = |e: std::fmt::Error| DsmError::AnalysisError {
        detail: format!("graphml write failed: {e}"),
    };

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#).map_err(wrap)?;
    writeln!(
        out,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">"#
    )
    .map_err(wrap)?;
    for (id, name) in [
        ("fan_in", "fan_in"),
        ("fan_out", "fan_out"),
        ("coupling", "coupling"),
        ("stability", "stability"),
        ("layer", "layer"),
        ("pagerank", "pagerank"),
        ("betweenness", "betweenness"),
    ] {
        writeln!(
            out,
            r#"  <key id="{id}" for="node" attr.name="{name}" attr.type="double" />"#
        )
        .map_err(wrap)?;
    }
    writeln!(out, r#"  <graph id="G" edgedefault="directed">"#).map_err(wrap)?;

    for path in &graph.nodes {
        let id = xml_escape(path.as_str());
        writeln!(out, r#"    <node id="{id}">"#).map_err(wrap)?;
        if let Some(m) = metrics.per_node.get(path) {
            writeln!(out, r#"      <data key="fan_in">{}</data>"#, m.fan_in).map_err(wrap)?;
            writeln!(out, r#"      <data key="fan_out">{}</data>"#, m.fan_out).map_err(wrap)?;
            writeln!(out, r#"      <data key="coupling">{}</data>"#, m.coupling).map_err(wrap)?;
            writeln!(out, r#"      <data key="stability">{:.6}</data>"#, m.stability).map_err(wrap)?;
            writeln!(out, r#"      <data key="layer">{}</data>"#, m.layer).map_err(wrap)?;
            writeln!(out, r#"      <data key="pagerank">{:.6}</data>"#, m.pagerank).map_err(wrap)?;
            writeln!(out, r#"      <data key="betweenness">{:.6}</data>"#, m.betweenness)
                .map_err(wrap)?;
        }
        writeln!(out, "    </node>").map_err(wrap)?;
    }

    for (from, to) in &graph.edges {
        writeln!(
            out,
            r#"    <edge source="{}" target="{}" />"#,
            xml_escape(from.as_str()),
            xml_escape(to.as_str())
        )
        .map_err(wrap)?;
    }

    writeln!(out, "  </graph>").map_err(wrap)?;
    writeln!(out, "</graphml>").map_err(wrap)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::graph::IncludeGraph;
    use crate::models::path::CanonicalPath;
    use crate::services::metrics::DsmMetricEngine;

    #[test]
    fn exports_well_formed_document() {
        let mut g = IncludeGraph::new();
        g.add_edge(&CanonicalPath::new("a.h"), &CanonicalPath::new("b.h"));
        let config = Config::default();
        let metrics = DsmMetricEngine::new(&config).compute(&g).unwrap();
        let data = GraphData::from(&g);

        let xml = export_graphml(&data, &metrics).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<node id="a.h">"#));
        assert!(xml.contains(r#"<edge source="a.h" target="b.h" />"#));
        assert!(xml.trim_end().ends_with("</graphml>"));
    }
}
