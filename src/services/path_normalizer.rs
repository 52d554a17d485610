//! C1: Path Normalizer — canonicalization, classification, glob filtering.

use crate::config::Config;
use crate::error::{DsmError, Result};
use crate::models::path::{CanonicalPath, PathClass};
use glob::Pattern;
use std::path::{Component, Path, PathBuf};

/// Classifies and canonicalizes paths against a fixed project root and a
/// `Config`'s filter patterns. Pure data in, pure data out: no callbacks
/// cross this boundary.
pub struct PathNormalizer<'a> {
    config: &'a Config,
    project_root: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    third_party: Vec<Pattern>,
}

impl<'a> PathNormalizer<'a> {
    pub fn new(config: &'a Config, project_root: impl Into<PathBuf>) -> Result<Self> {
        let include = compile_patterns(&config.include_patterns)?;
        let exclude = compile_patterns(&config.exclude_patterns)?;
        let third_party = compile_patterns(&config.third_party_patterns)?;
        Ok(Self {
            config,
            project_root: project_root.into(),
            include,
            exclude,
            third_party,
        })
    }

    /// Canonicalize `raw` (textually; the filesystem is never consulted) and
    /// classify it, returning `None` if the filter set rejects the path.
    pub fn classify(&self, raw: &str) -> Result<Option<(CanonicalPath, PathClass)>> {
        let canonical = self.canonicalize(raw)?;
        if !self.passes_filters(&canonical) {
            return Ok(None);
        }
        let class = self.classify_only(&canonical);
        Ok(Some((CanonicalPath::new(canonical), class)))
    }

    /// Canonicalize without classifying or filtering (used internally and by
    /// callers who only need the normal form).
    pub fn canonicalize(&self, raw: &str) -> Result<String> {
        if raw.chars().any(|c| c == '\u{FFFD}') {
            return Err(DsmError::PathError {
                path: raw.to_string(),
                detail: "invalid UTF-8".to_string(),
            });
        }
        let path = Path::new(raw);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };
        let normalized = normalize_lexically(&absolute);

        if let Ok(rel) = normalized.strip_prefix(&self.project_root) {
            Ok(to_slash(rel))
        } else {
            Ok(to_slash(&normalized))
        }
    }

    fn passes_filters(&self, canonical: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| p.matches(canonical));
        let excluded = self.exclude.iter().any(|p| p.matches(canonical));
        included && !excluded
    }

    /// Classifies an already-canonical path without reapplying include/exclude
    /// filters or touching the filesystem. Backs `filter_by_class`, which
    /// needs to re-derive each graph node's class after ingest without
    /// re-running the full `classify` pipeline on it.
    pub fn classify_canonical(&self, path: &CanonicalPath) -> PathClass {
        self.classify_only(path.as_str())
    }

    fn classify_only(&self, canonical: &str) -> PathClass {
        if self
            .config
            .system_prefixes
            .iter()
            .any(|prefix| canonical.starts_with(prefix.as_str()))
        {
            return PathClass::System;
        }
        if self.third_party.iter().any(|p| p.matches(canonical)) {
            return PathClass::ThirdParty;
        }
        if self
            .config
            .generated_extensions
            .iter()
            .any(|ext| canonical.ends_with(ext.as_str()))
        {
            return PathClass::Generated;
        }
        PathClass::Project
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| DsmError::InvalidInput {
                detail: format!("malformed glob pattern {p:?}: {e}"),
            })
        })
        .collect()
}

/// Lexical `.`/`..` resolution without touching the filesystem (paths are
/// analyzed textually).
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Detects the project root: the nearest ancestor of `build_dir` containing
/// a recognized marker, or `explicit_root` if the caller supplied one.
pub fn detect_project_root(
    build_dir: &Path,
    explicit_root: Option<&Path>,
    marker_exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    if let Some(root) = explicit_root {
        return root.to_path_buf();
    }
    let markers = [".git", "README.md", "README"];
    let mut cur = Some(build_dir);
    while let Some(dir) = cur {
        if markers.iter().any(|m| marker_exists(&dir.join(m))) {
            return dir.to_path_buf();
        }
        cur = dir.parent();
    }
    build_dir.to_path_buf()
}
