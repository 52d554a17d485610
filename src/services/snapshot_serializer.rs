//! C7: Snapshot Serializer — versioned, compressed on-disk container.

use crate::error::{DsmError, Result};
use crate::models::snapshot::{Snapshot, SNAPSHOT_FORMAT_VERSION, SNAPSHOT_MAGIC};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Serializes a snapshot to the on-disk container: magic bytes, a `u32`
/// format version, then a gzip-compressed `bincode` payload.
pub fn save(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let payload = bincode::serialize(snapshot).map_err(|e| DsmError::CacheError {
        detail: format!("failed to serialize snapshot: {e}"),
    })?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&payload)
        .map_err(|e| DsmError::CacheError {
            detail: format!("failed to compress snapshot: {e}"),
        })?;
    let compressed = encoder.finish().map_err(|e| DsmError::CacheError {
        detail: format!("failed to finish snapshot compression: {e}"),
    })?;

    let mut out = Vec::with_capacity(compressed.len() + 8);
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Loads and validates a snapshot container, renormalizing nothing itself —
/// path renormalization against the caller's current root is the caller's
/// responsibility once the graph is back in memory.
pub fn load(bytes: &[u8]) -> Result<Snapshot> {
    if bytes.len() < 8 || &bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(DsmError::InvalidInput {
            detail: "not a DSM1 snapshot container".to_string(),
        });
    }
    let format_version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    if format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(DsmError::BaselineIncompatible {
            expected: SNAPSHOT_FORMAT_VERSION,
            found: format_version,
        });
    }

    let mut decoder = GzDecoder::new(&bytes[8..]);
    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(|e| DsmError::CacheError {
            detail: format!("failed to decompress snapshot: {e}"),
        })?;

    bincode::deserialize(&payload).map_err(|e| DsmError::CacheError {
        detail: format!("failed to deserialize snapshot: {e}"),
    })
}
