//! Translation units and the compile database entries they are derived from.

use crate::models::path::CanonicalPath;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// One entry of a compile database, as consumed from the outside world. The
/// core ignores every token in `arguments` except include-search roots and
/// the source path itself; ccache/distcc wrappers and `sloppiness=`-style
/// pseudo-arguments must already be stripped by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileDbEntry {
    pub source: String,
    pub directory: String,
    pub arguments: Vec<String>,
}

impl CompileDbEntry {
    /// Extract `-I`/`-isystem`-style include roots from the raw command
    /// line, ignoring every other token.
    pub fn include_roots(&self) -> Vec<String> {
        let mut roots = Vec::new();
        let mut iter = self.arguments.iter().peekable();
        while let Some(tok) = iter.next() {
            if let Some(rest) = tok.strip_prefix("-I") {
                if !rest.is_empty() {
                    roots.push(rest.to_string());
                } else if let Some(next) = iter.peek() {
                    roots.push((*next).clone());
                }
            } else if tok == "-isystem" {
                if let Some(next) = iter.peek() {
                    roots.push((*next).clone());
                }
            }
        }
        roots
    }
}

/// One compilation unit: immutable once derived from the compile DB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub source: CanonicalPath,
    pub include_roots: Vec<String>,
    /// Opaque to the core; retained only for diagnostics.
    pub raw_command: Vec<String>,
    /// Filled in by the scan ingestor (C2).
    pub inclusions: FxHashSet<CanonicalPath>,
}

impl TranslationUnit {
    pub fn new(source: CanonicalPath, include_roots: Vec<String>, raw_command: Vec<String>) -> Self {
        Self {
            source,
            include_roots,
            raw_command,
            inclusions: FxHashSet::default(),
        }
    }
}
