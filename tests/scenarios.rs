//! End-to-end scenario tests exercising the public `Pipeline` API against
//! literal inputs with known-good expected outputs.

use dsm_core::models::candidate::AntiPattern;
use dsm_core::models::graph::{GraphData, IncludeGraph, SourceToDeps};
use dsm_core::models::path::CanonicalPath;
use dsm_core::services::metrics::DsmMetricEngine;
use dsm_core::{Config, Pipeline};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

fn p(s: &str) -> CanonicalPath {
    CanonicalPath::new(s)
}

#[test]
fn scenario_triangle_cycle() {
    init_tracing();
    let config = Config::default();
    let pipeline = Pipeline::new(&config);
    let scanner_text = "a.o: a.cpp a.h b.h c.h\nb.o: b.cpp a.h b.h c.h\nc.o: c.cpp a.h b.h c.h\n";
    let snapshot = pipeline
        .analyze_scanner_output(scanner_text, "/proj")
        .unwrap();

    assert_eq!(snapshot.metrics.cycles.len(), 1);
    assert_eq!(snapshot.metrics.cycle_member_count, 3);
    assert_eq!(snapshot.metrics.adp_score, 0.0);
    for h in [p("a.h"), p("b.h"), p("c.h")] {
        assert_eq!(snapshot.metrics.per_node[&h].layer, 0);
    }
    let fas = snapshot.metrics.feedback_arc_sets.values().next().unwrap();
    assert_eq!(fas.len(), 1);
}

#[test]
fn scenario_chain_of_five() {
    init_tracing();
    let mut g = IncludeGraph::new();
    g.add_edge(&p("h1"), &p("h2"));
    g.add_edge(&p("h2"), &p("h3"));
    g.add_edge(&p("h3"), &p("h4"));
    g.add_edge(&p("h4"), &p("h5"));

    let config = Config::default();
    let metrics = DsmMetricEngine::new(&config).compute(&g).unwrap();

    assert_eq!(metrics.cycles.len(), 0);
    assert_eq!(metrics.per_node[&p("h5")].layer, 0);
    assert_eq!(metrics.per_node[&p("h4")].layer, 1);
    assert_eq!(metrics.per_node[&p("h3")].layer, 2);
    assert_eq!(metrics.per_node[&p("h2")].layer, 3);
    assert_eq!(metrics.per_node[&p("h1")].layer, 4);
    assert!(metrics.architecture_quality > 0.0 && metrics.architecture_quality <= 100.0);
}

#[test]
fn scenario_god_object() {
    init_tracing();
    let mut g = IncludeGraph::new();
    for i in 0..60 {
        g.add_edge(&p("g.h"), &p(&format!("dep_{i}.h")));
    }
    let config = Config::default();
    let metrics = DsmMetricEngine::new(&config).compute(&g).unwrap();
    let source_to_deps = SourceToDeps::new();

    let candidates = dsm_core::services::advisor::advise(&g, &metrics, &source_to_deps, &config);
    let god = candidates
        .iter()
        .find(|c| c.path == p("g.h"))
        .expect("g.h flagged as a candidate");

    assert!(god.tags.contains(&AntiPattern::GodObject));
    assert_eq!(god.effort, dsm_core::models::candidate::Effort::High);
}

#[test]
fn scenario_rebuild_impact_logger_header() {
    init_tracing();
    let mut source_to_deps = SourceToDeps::new();
    for i in 0..89 {
        let mut deps = rustc_hash::FxHashSet::default();
        deps.insert(p("logger.h"));
        source_to_deps.insert(p(&format!("tu_logger_{i}.cpp")), deps);
    }
    for i in 0..(1000 - 89) {
        source_to_deps.insert(
            p(&format!("tu_other_{i}.cpp")),
            rustc_hash::FxHashSet::default(),
        );
    }
    let graph = IncludeGraph::new();
    let config = Config::default();
    let pipeline = Pipeline::new(&config);

    let snapshot = dsm_core::Snapshot {
        format_version: dsm_core::models::snapshot::SNAPSHOT_FORMAT_VERSION,
        tool_version: "test".to_string(),
        created_at: chrono::Utc::now(),
        project_root: "/proj".to_string(),
        build_dir_hash: 0,
        filter_spec: dsm_core::models::snapshot::FilterSpec::from(&config),
        graph: GraphData::from(&graph),
        source_to_deps,
        metrics: dsm_core::models::metrics::DsmMetrics::empty(),
        precise: true,
        centrality_sampled: false,
    };

    let impact = pipeline.rebuild_impact(&snapshot, &[p("logger.h")]);
    assert_eq!(impact.direct_rebuild_set.len(), 89);
    assert!((impact.direct_rebuild_percentage() - 0.089).abs() < 1e-9);
}

#[test]
fn scenario_diff_with_new_cycle() {
    init_tracing();
    let mut baseline_graph = IncludeGraph::new();
    baseline_graph.add_edge(&p("a.h"), &p("b.h"));
    let config = Config::default();
    let baseline_metrics = DsmMetricEngine::new(&config).compute(&baseline_graph).unwrap();

    let mut current_graph = IncludeGraph::new();
    current_graph.add_edge(&p("a.h"), &p("b.h"));
    current_graph.add_edge(&p("b.h"), &p("a.h"));
    let current_metrics = DsmMetricEngine::new(&config).compute(&current_graph).unwrap();

    let make_snapshot = |graph: &IncludeGraph, metrics: dsm_core::models::metrics::DsmMetrics| {
        dsm_core::Snapshot {
            format_version: dsm_core::models::snapshot::SNAPSHOT_FORMAT_VERSION,
            tool_version: "test".to_string(),
            created_at: chrono::Utc::now(),
            project_root: "/proj".to_string(),
            build_dir_hash: 0,
            filter_spec: dsm_core::models::snapshot::FilterSpec::from(&config),
            graph: GraphData::from(graph),
            source_to_deps: SourceToDeps::default(),
            metrics,
            precise: true,
            centrality_sampled: false,
        }
    };
    let baseline = make_snapshot(&baseline_graph, baseline_metrics);
    let current = make_snapshot(&current_graph, current_metrics);

    let pipeline = Pipeline::new(&config);
    let delta = pipeline.diff(&baseline, &current);

    assert_eq!(delta.cycles_added.len(), 1);
    assert_eq!(delta.cycles_added[0].members, vec![p("a.h"), p("b.h")]);
    assert!(delta.quality_delta < 0.0);
    assert!(delta.recommendations.iter().any(|r| {
        r.severity == dsm_core::models::delta::Severity::Critical
            && r.text.contains("a.h")
            && r.text.contains("b.h")
    }));
}

#[test]
fn scenario_snapshot_round_trip() {
    init_tracing();
    let config = Config::default();
    let pipeline = Pipeline::new(&config);
    let scanner_text = "a.o: a.cpp a.h b.h c.h\nb.o: b.cpp a.h b.h c.h\nc.o: c.cpp a.h b.h c.h\n";
    let snapshot = pipeline
        .analyze_scanner_output(scanner_text, "/proj")
        .unwrap();

    let bytes = dsm_core::services::snapshot_serializer::save(&snapshot).unwrap();
    let loaded = dsm_core::services::snapshot_serializer::load(&bytes).unwrap();

    assert_eq!(loaded.graph.nodes, snapshot.graph.nodes);
    assert_eq!(loaded.graph.edges, snapshot.graph.edges);
    assert_eq!(loaded.metrics.cycles, snapshot.metrics.cycles);
    for (path, m) in &snapshot.metrics.per_node {
        assert_eq!(loaded.metrics.per_node[path], *m);
    }
}
