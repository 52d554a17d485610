//! Data model for the DSM analysis core.

pub mod candidate;
pub mod delta;
pub mod graph;
pub mod library_graph;
pub mod metrics;
pub mod path;
pub mod snapshot;
pub mod tu;

pub use candidate::ImprovementCandidate;
pub use delta::Delta;
pub use graph::{GraphData, IncludeGraph, SourceToDeps};
pub use library_graph::LibraryGraph;
pub use metrics::DsmMetrics;
pub use path::{CanonicalPath, ClassifiedPath, PathClass};
pub use snapshot::Snapshot;
pub use tu::{CompileDbEntry, TranslationUnit};
