//! Dependency Structure Matrix analysis engine for Ninja-built C/C++
//! codebases: builds a header-include graph from scanner output, computes
//! DSM metrics, rebuild impact, snapshot diffs and refactoring candidates.
//!
//! `dsm_core` is a library with no binary target. CLIs, colorized output,
//! shell completion and invocation of `ninja`/`clang-scan-deps` remain
//! external collaborators; this crate only consumes their outputs.

pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod services;

pub use config::Config;
pub use error::{DsmError, ErrorKind, Result};
pub use models::{
    CanonicalPath, ClassifiedPath, CompileDbEntry, Delta, DsmMetrics, GraphData, IncludeGraph,
    ImprovementCandidate, PathClass, Snapshot, SourceToDeps, TranslationUnit,
};
pub use progress::{CancellationToken, NullProgress, Phase, ProgressObserver};

use rustc_hash::FxHashSet;
use services::graph_builder::BuiltGraph;
use services::path_normalizer::PathNormalizer;
use tracing::info_span;

/// Ties together C1-C9 into the single-call path a caller typically wants:
/// normalize and ingest scanner output, build the include graph, compute
/// metrics, and (optionally) rebuild impact / advisor output. Each stage is
/// wrapped in a `tracing` span named after its `Phase`.
pub struct Pipeline<'a> {
    config: &'a Config,
    progress: &'a dyn ProgressObserver,
    cancellation: CancellationToken,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            progress: &NullProgress,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressObserver) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Ingests raw scanner output text and builds the heuristic (co-occurrence)
    /// include graph plus DSM metrics for it, honoring cancellation between
    /// phases. No compile database is consulted, so a rule's own primary
    /// source is identified positionally (see `scan_ingestor::normalize_rule`).
    pub fn analyze_scanner_output(
        &self,
        scanner_text: &str,
        project_root: &str,
    ) -> Result<Snapshot> {
        let (tus, diagnostics) =
            self.ingest(scanner_text, project_root, &FxHashSet::default())?;
        let built = self.build_graph(|| services::graph_builder::build_heuristic(&tus))?;
        self.finish(built, diagnostics, scanner_text, project_root)
    }

    /// Same as `analyze_scanner_output`, but first derives translation units
    /// from a compile database: each entry's canonicalized source is excluded
    /// from every rule's inclusion set, so compiled sources never become
    /// vertices in the header→header graph regardless of where the scanner
    /// places them in a rule.
    pub fn analyze(
        &self,
        compile_db: &[CompileDbEntry],
        scanner_text: &str,
        project_root: &str,
    ) -> Result<Snapshot> {
        let normalizer = PathNormalizer::new(self.config, project_root)?;
        let translation_units =
            services::scan_ingestor::translation_units_from_compile_db(compile_db, &normalizer);
        let known_sources: FxHashSet<CanonicalPath> = translation_units
            .iter()
            .map(|tu| tu.source.clone())
            .collect();

        let (tus, diagnostics) = self.ingest(scanner_text, project_root, &known_sources)?;
        let built = self.build_graph(|| services::graph_builder::build_heuristic(&tus))?;
        self.finish(built, diagnostics, scanner_text, project_root)
    }

    /// Same as `analyze_scanner_output`, but builds the graph from precise
    /// direct-include pairs (`u` directly includes `v`) reported by the
    /// scanner instead of the co-occurrence proxy, yielding a `precise: true`
    /// snapshot.
    pub fn analyze_precise(
        &self,
        scanner_text: &str,
        direct_edges: &[(CanonicalPath, CanonicalPath)],
        project_root: &str,
    ) -> Result<Snapshot> {
        let (tus, diagnostics) =
            self.ingest(scanner_text, project_root, &FxHashSet::default())?;
        let built =
            self.build_graph(|| services::graph_builder::build_precise(direct_edges, &tus))?;
        self.finish(built, diagnostics, scanner_text, project_root)
    }

    fn ingest(
        &self,
        scanner_text: &str,
        project_root: &str,
        known_sources: &FxHashSet<CanonicalPath>,
    ) -> Result<(
        Vec<(CanonicalPath, FxHashSet<CanonicalPath>)>,
        models::metrics::Diagnostics,
    )> {
        let ingest_span = info_span!("ingest");
        let _enter = ingest_span.enter();
        self.progress.on_progress(Phase::Ingest, 0);
        let mut diag = models::metrics::Diagnostics::default();
        let rules = services::scan_ingestor::parse_scanner_output(scanner_text, &mut diag);
        if self.cancellation.is_cancelled() {
            return Err(DsmError::analysis_error("cancelled during ingest"));
        }
        let (pairs, ingest_diag) = services::scan_ingestor::ingest_rules_parallel(
            &rules,
            self.config,
            project_root,
            known_sources,
        )?;
        diag.parse_errors += ingest_diag.parse_errors;
        diag.path_errors += ingest_diag.path_errors;
        self.progress.on_progress(Phase::Ingest, 100);
        Ok((pairs, diag))
    }

    /// Runs `builder` (the heuristic co-occurrence proxy or the precise
    /// direct-include path) inside the graph-build phase, honoring
    /// cancellation observed since the end of ingest.
    fn build_graph(&self, builder: impl FnOnce() -> BuiltGraph) -> Result<BuiltGraph> {
        if self.cancellation.is_cancelled() {
            return Err(DsmError::analysis_error("cancelled after ingest"));
        }
        let graph_span = info_span!("graph_build");
        let _enter = graph_span.enter();
        self.progress.on_progress(Phase::GraphBuild, 0);
        let built = builder();
        self.progress.on_progress(Phase::GraphBuild, 100);
        Ok(built)
    }

    /// Filters system headers out of the built graph (unless explicitly kept
    /// by config), computes metrics on the filtered graph, and assembles the
    /// final snapshot. `source_to_deps` is left unfiltered, since rebuild
    /// impact needs closures through system headers preserved on the
    /// source-TU side.
    fn finish(
        &self,
        built: BuiltGraph,
        mut diagnostics: models::metrics::Diagnostics,
        scanner_text: &str,
        project_root: &str,
    ) -> Result<Snapshot> {
        let normalizer = PathNormalizer::new(self.config, project_root)?;
        let include_system_headers = self.config.include_system_headers;
        let filtered_graph = services::graph_builder::filter_by_class(
            &built.graph,
            |p| Some(normalizer.classify_canonical(p)),
            move |class| include_system_headers || class != PathClass::System,
        );

        if graph::node_count_exceeds(&filtered_graph, self.config.max_nodes) {
            return Err(DsmError::ResourceLimit {
                detail: format!(
                    "graph has {} nodes, exceeding configured ceiling of {}",
                    filtered_graph.node_count(),
                    self.config.max_nodes
                ),
            });
        }

        let metrics_span = info_span!("metrics");
        let metrics = {
            let _enter = metrics_span.enter();
            self.progress.on_progress(Phase::Metrics, 0);
            let metrics = services::metrics::DsmMetricEngine::new(self.config)
                .compute(&filtered_graph)?;
            self.progress.on_progress(Phase::Metrics, 100);
            metrics
        };

        diagnostics.centrality_converged = metrics.diagnostics.centrality_converged;
        diagnostics.betweenness_sampled = metrics.diagnostics.betweenness_sampled;
        let mut metrics = metrics;
        metrics.diagnostics = diagnostics;

        let build_dir_hash = {
            let mut hasher = blake3::Hasher::new();
            hasher.update(scanner_text.as_bytes());
            u64::from_le_bytes(hasher.finalize().as_bytes()[..8].try_into().unwrap())
        };

        Ok(Snapshot {
            format_version: models::snapshot::SNAPSHOT_FORMAT_VERSION,
            tool_version: models::snapshot::TOOL_VERSION.to_string(),
            created_at: chrono::Utc::now(),
            project_root: project_root.to_string(),
            build_dir_hash,
            filter_spec: models::snapshot::FilterSpec::from(self.config),
            graph: GraphData::from(&filtered_graph),
            source_to_deps: built.source_to_deps,
            metrics,
            precise: built.precise,
            centrality_sampled: false,
        })
    }

    /// Computes rebuild impact for a set of changed paths against a snapshot.
    pub fn rebuild_impact(
        &self,
        snapshot: &Snapshot,
        changed: &[CanonicalPath],
    ) -> services::rebuild_impact::RebuildImpact {
        let _span = info_span!("impact").entered();
        self.progress.on_progress(Phase::Impact, 0);
        let graph: IncludeGraph = (&snapshot.graph).into();
        let impact =
            services::rebuild_impact::compute_rebuild_impact(changed, &snapshot.source_to_deps, &graph);
        self.progress.on_progress(Phase::Impact, 100);
        impact
    }

    /// Diffs two snapshots.
    pub fn diff(&self, baseline: &Snapshot, current: &Snapshot) -> Delta {
        let _span = info_span!("diff").entered();
        self.progress.on_progress(Phase::Diff, 0);
        let delta = services::differential::diff(baseline, current, self.config);
        self.progress.on_progress(Phase::Diff, 100);
        delta
    }

    /// Ranks refactoring candidates for a snapshot.
    pub fn advise(&self, snapshot: &Snapshot) -> Vec<ImprovementCandidate> {
        let _span = info_span!("advise").entered();
        self.progress.on_progress(Phase::Advise, 0);
        let graph: IncludeGraph = (&snapshot.graph).into();
        let candidates = services::advisor::advise(
            &graph,
            &snapshot.metrics,
            &snapshot.source_to_deps,
            self.config,
        );
        self.progress.on_progress(Phase::Advise, 100);
        candidates
    }
}

/// Small helper kept out of `models::graph` since it only matters to the
/// pipeline's resource-ceiling check.
mod graph {
    use crate::models::graph::IncludeGraph;

    pub fn node_count_exceeds(graph: &IncludeGraph, max_nodes: usize) -> bool {
        graph.node_count() > max_nodes
    }
}
