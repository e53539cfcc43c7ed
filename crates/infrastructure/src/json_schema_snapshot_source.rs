//! Schema snapshot read from a JSON file.

use std::path::PathBuf;

use async_trait::async_trait;
use personalia_application::SchemaSnapshotSource;
use personalia_core::AppResult;
use personalia_domain::SchemaSnapshot;
use tracing::debug;

use crate::json_file::read_json_file;

/// Schema snapshot stored as a JSON map of qualified table to columns.
#[derive(Debug, Clone)]
pub struct JsonFileSchemaSnapshotSource {
    path: PathBuf,
}

impl JsonFileSchemaSnapshotSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SchemaSnapshotSource for JsonFileSchemaSnapshotSource {
    async fn load_schema_snapshot(&self) -> AppResult<SchemaSnapshot> {
        let snapshot: SchemaSnapshot = read_json_file(&self.path, "schema snapshot").await?;
        debug!(
            path = %self.path.display(),
            tables = snapshot.table_count(),
            "loaded schema snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use personalia_application::SchemaSnapshotSource;
    use personalia_core::AppError;
    use tempfile::NamedTempFile;

    use super::JsonFileSchemaSnapshotSource;

    #[tokio::test]
    async fn loads_table_map() {
        let mut file = NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        let written = file.write_all(
            br#"{"dbo.employees": [{"name": "emp_id", "type": "int", "nullable": false}]}"#,
        );
        assert!(written.is_ok());

        let snapshot = JsonFileSchemaSnapshotSource::new(file.path())
            .load_schema_snapshot()
            .await;
        assert!(snapshot.is_ok());

        let snapshot = snapshot.unwrap_or_default();
        assert_eq!(snapshot.table_count(), 1);
        assert!(snapshot.find_table("DBO.EMPLOYEES").is_some());
    }

    #[tokio::test]
    async fn malformed_snapshot_is_validation_error() {
        let mut file = NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        assert!(file.write_all(b"[1, 2").is_ok());

        let result = JsonFileSchemaSnapshotSource::new(file.path())
            .load_schema_snapshot()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
