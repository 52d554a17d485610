//! Cache key derivation.

use crate::models::snapshot::{FilterSpec, TOOL_VERSION};
use crate::models::tu::CompileDbEntry;

/// Computes a 128-bit digest (hex-encoded) over the sorted compile-DB
/// entries, the canonical `build.ninja` bytes, the active filter spec and
/// the crate version. Two runs over an unchanged input produce the same key
/// regardless of compile-DB entry order.
pub fn cache_key(
    compile_db: &[CompileDbEntry],
    ninja_bytes: &[u8],
    filter_spec: &FilterSpec,
) -> String {
    let mut sorted: Vec<&CompileDbEntry> = compile_db.iter().collect();
    sorted.sort_by(|a, b| a.source.cmp(&b.source).then(a.directory.cmp(&b.directory)));

    let mut hasher = blake3::Hasher::new();
    for entry in &sorted {
        hasher.update(entry.source.as_bytes());
        hasher.update(b"\0");
        hasher.update(entry.directory.as_bytes());
        hasher.update(b"\0");
        for arg in &entry.arguments {
            hasher.update(arg.as_bytes());
            hasher.update(b"\x1f");
        }
        hasher.update(b"\n");
    }
    hasher.update(ninja_bytes);
    hasher.update(serde_json::to_vec(filter_spec).unwrap_or_default().as_slice());
    hasher.update(TOOL_VERSION.as_bytes());

    let digest = hasher.finalize();
    digest.as_bytes()[..16]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str) -> CompileDbEntry {
        CompileDbEntry {
            source: source.to_string(),
            directory: "/build".to_string(),
            arguments: vec!["-Iinclude".to_string()],
        }
    }

    fn filter_spec() -> FilterSpec {
        FilterSpec {
            include_patterns: vec![],
            exclude_patterns: vec![],
            system_prefixes: vec![],
            third_party_patterns: vec![],
        }
    }

    #[test]
    fn key_is_order_independent() {
        let a = vec![entry("a.cpp"), entry("b.cpp")];
        let b = vec![entry("b.cpp"), entry("a.cpp")];
        let spec = filter_spec();
        assert_eq!(
            cache_key(&a, b"ninja", &spec),
            cache_key(&b, b"ninja", &spec)
        );
    }

    #[test]
    fn key_changes_with_ninja_bytes() {
        let a = vec![entry("a.cpp")];
        let spec = filter_spec();
        assert_ne!(
            cache_key(&a, b"ninja-v1", &spec),
            cache_key(&a, b"ninja-v2", &spec)
        );
    }

    #[test]
    fn key_is_32_hex_chars() {
        let a = vec![entry("a.cpp")];
        let spec = filter_spec();
        assert_eq!(cache_key(&a, b"ninja", &spec).len(), 32);
    }
}
