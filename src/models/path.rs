//! Canonicalized paths and their classification.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A canonicalized path, shared by `Arc<str>` because the same string keys
/// into node tables, edge lists and metric maps many times over.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalPath(Arc<str>);

impl CanonicalPath {
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CanonicalPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CanonicalPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Classification tag assigned by the path normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathClass {
    Project,
    ThirdParty,
    System,
    Generated,
}

impl std::fmt::Display for PathClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PathClass::Project => "project",
            PathClass::ThirdParty => "third_party",
            PathClass::System => "system",
            PathClass::Generated => "generated",
        };
        write!(f, "{s}")
    }
}

/// A canonicalized path paired with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPath {
    pub path: CanonicalPath,
    pub class: PathClass,
}
