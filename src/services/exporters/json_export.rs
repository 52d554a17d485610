//! JSON export of a full snapshot or any serializable analysis result.

use crate::error::{DsmError, Result};
use serde::Serialize;

pub fn export_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| DsmError::AnalysisError {
        detail: format!("json export failed: {e}"),
    })
}
