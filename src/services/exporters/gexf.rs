//! GEXF export (Gephi's native format), sibling to the GraphML writer.

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

pub fn export_gexf(graph: &GraphData, metrics: &DsmMetrics) -> Result<String> {
    let mut out = String::new();
    let wrap = |e: std::fmt::Error| DsmError::AnalysisError {
        detail: format!("gexf write failed: {e}"),
    };

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#).map_err(wrap)?;
    writeln!(out, r#"<gexf xmlns="http://www.gexf.net/1.3" version="1.3">"#).map_err(wrap)?;
    writeln!(out, r#"  <graph mode="static" defaultedgetype="directed">"#).map_err(wrap)?;
    writeln!(out, "    <attributes class=\"node\">").map_err(wrap)?;
    for (id, title, atype) in [
        ("0", "fan_in", "integer"),
        ("1", "fan_out", "integer"),
        ("2", "coupling", "integer"),
        ("3", "stability", "double"),
        ("4", "layer", "integer"),
        ("5", "pagerank", "double"),
        ("6", "betweenness", "double"),
    ] {
        writeln!(
            out,
            r#"      <attribute id="{id}" title="{title}" type="{atype}" />"#
        )
        .map_err(wrap)?;
    }
    writeln!(out, "    </attributes>").map_err(wrap)?;

    writeln!(out, "    <nodes>").map_err(wrap)?;
    for path in &graph.nodes {
        let id = xml_escape(path.as_str());
        writeln!(out, r#"      <node id="{id}" label="{id}">"#).map_err(wrap)?;
        if let Some(m) = metrics.per_node.get(path) {
            writeln!(out, "        <attvalues>").map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="0" value="{}" />"#, m.fan_in).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="1" value="{}" />"#, m.fan_out).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="2" value="{}" />"#, m.coupling).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="3" value="{:.6}" />"#, m.stability).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="4" value="{}" />"#, m.layer).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="5" value="{:.6}" />"#, m.pagerank).map_err(wrap)?;
            writeln!(out, r#"          <attvalue for="6" value="{:.6}" />"#, m.betweenness)
                .map_err(wrap)?;
            writeln!(out, "        </attvalues>").map_err(wrap)?;
        }
        writeln!(out, "      </node>").map_err(wrap)?;
    }
    writeln!(out, "    </nodes>").map_err(wrap)?;

    writeln!(out, "    <edges>").map_err(wrap)?;
    for (i, (from, to)) in graph.edges.iter().enumerate() {
        writeln!(
            out,
            r#"      <edge id="{i}" source="{}" target="{}" />"#,
            xml_escape(from.as_str()),
            xml_escape(to.as_str())
        )
        .map_err(wrap)?;
    }
    writeln!(out, "    </edges>").map_err(wrap)?;

    writeln!(out, "  </graph>").map_err(wrap)?;
    writeln!(out, "</gexf>").map_err(wrap)?;
    Ok(out)
}
