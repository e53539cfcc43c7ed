use async_trait::async_trait;
use personalia_core::AppResult;
use personalia_domain::{ColumnDeclaration, SchemaSnapshot};

/// Source of the scanned database schema.
#[async_trait]
pub trait SchemaSnapshotSource: Send + Sync {
    /// Loads the schema snapshot taken at scan time.
    async fn load_schema_snapshot(&self) -> AppResult<SchemaSnapshot>;
}

/// Source of spreadsheet-declared table/column pairs.
#[async_trait]
pub trait DeclarationSource: Send + Sync {
    /// Loads declarations in sheet order.
    async fn load_declarations(&self) -> AppResult<Vec<ColumnDeclaration>>;
}
