use std::path::Path;

use personalia_core::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// Reads and decodes one JSON document; `label` names it in errors.
pub(crate) async fn read_json_file<T: DeserializeOwned>(path: &Path, label: &str) -> AppResult<T> {
    let bytes = tokio::fs::read(path).await.map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("{label} file '{}' does not exist", path.display()))
        } else {
            AppError::Internal(format!(
                "failed to read {label} file '{}': {error}",
                path.display()
            ))
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|error| {
        AppError::Validation(format!(
            "failed to decode {label} file '{}': {error}",
            path.display()
        ))
    })
}
