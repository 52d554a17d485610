//! Closed error taxonomy for the DSM analysis core.
//!
//! Every fallible operation in `dsm_core` returns exactly one of these
//! variants. No error is swallowed silently: per-TU and per-path failures are
//! instead accumulated into a snapshot's diagnostic counters
//! (`DsmMetrics::diagnostics`) and only the top-level error kinds below ever
//! abort a call.

use std::path::PathBuf;
use thiserror::Error;

/// The tag half of an error: stable, matchable, independent of the detail
/// string. Callers that only care "what kind of failure was this" should
/// match on `DsmError::kind()` rather than the full enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    ScannerTimeout,
    ScannerFailure,
    ParseError,
    PathError,
    BaselineIncompatible,
    AnalysisError,
    CacheError,
    ResourceLimit,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ScannerTimeout => "scanner_timeout",
            ErrorKind::ScannerFailure => "scanner_failure",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::PathError => "path_error",
            ErrorKind::BaselineIncompatible => "baseline_incompatible",
            ErrorKind::AnalysisError => "analysis_error",
            ErrorKind::CacheError => "cache_error",
            ErrorKind::ResourceLimit => "resource_limit",
        };
        write!(f, "{s}")
    }
}

/// Closed set of error kinds raised by the DSM core.
#[derive(Error, Debug)]
pub enum DsmError {
    #[error("invalid input: {detail}")]
    InvalidInput { detail: String },

    #[error("scanner timed out after {timeout_secs}s ingesting {source}")]
    ScannerTimeout { source: PathBuf, timeout_secs: u64 },

    #[error("scanner failed for {source}: {detail}")]
    ScannerFailure { source: PathBuf, detail: String },

    #[error("failed to parse scanner rule near line {line}: {detail}")]
    ParseError { line: usize, detail: String },

    #[error("path could not be canonicalized: {path} ({detail})")]
    PathError { path: String, detail: String },

    #[error(
        "snapshot format_version {found} is incompatible with the current format_version {expected}"
    )]
    BaselineIncompatible { expected: u32, found: u32 },

    #[error("internal invariant violation: {detail}")]
    AnalysisError { detail: String },

    #[error("cache I/O failed: {detail}")]
    CacheError { detail: String },

    #[error("graph exceeds configured resource ceiling: {detail}")]
    ResourceLimit { detail: String },
}

impl DsmError {
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        DsmError::InvalidInput {
            detail: detail.into(),
        }
    }

    pub fn analysis_error(detail: impl Into<String>) -> Self {
        DsmError::AnalysisError {
            detail: detail.into(),
        }
    }

    /// The stable tag for this error, independent of its detail payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DsmError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DsmError::ScannerTimeout { .. } => ErrorKind::ScannerTimeout,
            DsmError::ScannerFailure { .. } => ErrorKind::ScannerFailure,
            DsmError::ParseError { .. } => ErrorKind::ParseError,
            DsmError::PathError { .. } => ErrorKind::PathError,
            DsmError::BaselineIncompatible { .. } => ErrorKind::BaselineIncompatible,
            DsmError::AnalysisError { .. } => ErrorKind::AnalysisError,
            DsmError::CacheError { .. } => ErrorKind::CacheError,
            DsmError::ResourceLimit { .. } => ErrorKind::ResourceLimit,
        }
    }

    /// Whether the caller may retry the same call and plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ScannerTimeout | ErrorKind::CacheError
        )
    }
}

pub type Result<T> = std::result::Result<T, DsmError>;
