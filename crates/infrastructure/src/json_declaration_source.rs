//! Declaration list read from a JSON file.

use std::path::PathBuf;

use async_trait::async_trait;
use personalia_application::DeclarationSource;
use personalia_core::AppResult;
use personalia_domain::ColumnDeclaration;
use tracing::debug;

use crate::json_file::read_json_file;

/// Declarations exported from the mapping spreadsheet as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileDeclarationSource {
    path: PathBuf,
}

impl JsonFileDeclarationSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DeclarationSource for JsonFileDeclarationSource {
    async fn load_declarations(&self) -> AppResult<Vec<ColumnDeclaration>> {
        let declarations: Vec<ColumnDeclaration> =
            read_json_file(&self.path, "declarations").await?;
        debug!(
            path = %self.path.display(),
            declarations = declarations.len(),
            "loaded declarations"
        );
        Ok(declarations)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use personalia_application::DeclarationSource;
    use personalia_core::AppError;
    use tempfile::NamedTempFile;

    use super::JsonFileDeclarationSource;

    #[tokio::test]
    async fn loads_rows_with_optional_fields() {
        let mut file = NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        let written = file.write_all(
            br#"[
                {"table": "employees; employee_bank", "column": "emp_id"},
                {"column": "iban"},
                {"table": "employees", "schema": "hr"}
            ]"#,
        );
        assert!(written.is_ok());

        let declarations = JsonFileDeclarationSource::new(file.path())
            .load_declarations()
            .await;
        assert!(declarations.is_ok());

        let declarations = declarations.unwrap_or_default();
        assert_eq!(declarations.len(), 3);
        assert_eq!(declarations[0].table_names().len(), 2);
        assert!(declarations[1].table_names().is_empty());
        assert_eq!(declarations[2].schema_name(), Some("hr"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let result = JsonFileDeclarationSource::new(directory.path().join("sheet.json"))
            .load_declarations()
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
