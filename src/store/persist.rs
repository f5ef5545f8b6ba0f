//! JSON persistence shared by both stores
//!
//! Stores are pretty-printed JSON arrays. Writes go to a sibling `.tmp`
//! file first and are renamed into place so a crash mid-write never leaves
//! a truncated store behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Load a JSON array from disk; a missing file is an empty collection
pub async fn load_array<T: DeserializeOwned>(path: &Path) -> PipelineResult<Vec<T>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Store file {} not found, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(PipelineError::StoreIo {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|e| PipelineError::StoreCorrupt {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Save a JSON array to disk via write-temp-then-rename
pub async fn save_array<T: Serialize>(path: &Path, items: &[T]) -> PipelineResult<()> {
    let json = serde_json::to_string_pretty(items).map_err(|e| PipelineError::StoreCorrupt {
        path: path.to_path_buf(),
        detail: format!("serialization failed: {e}"),
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PipelineError::StoreIo {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| PipelineError::StoreIo {
            path: tmp.clone(),
            source: e,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PipelineError::StoreIo {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Persisted {} records to {}", items.len(), path.display());
    Ok(())
}
