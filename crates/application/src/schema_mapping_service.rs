//! Schema reconciliation use case.

use std::sync::Arc;

use personalia_core::{AppError, AppResult};
use personalia_domain::MappingReport;
use tracing::{info, warn};

use crate::{DeclarationSource, SchemaSnapshotSource};

mod reconcile;

pub use reconcile::{ReconciliationOptions, reconcile};

/// Application service running one schema reconciliation.
#[derive(Clone)]
pub struct SchemaMappingService {
    schema_source: Arc<dyn SchemaSnapshotSource>,
    declaration_source: Arc<dyn DeclarationSource>,
    options: ReconciliationOptions,
}

impl SchemaMappingService {
    /// Creates a new mapping service from source implementations.
    #[must_use]
    pub fn new(
        schema_source: Arc<dyn SchemaSnapshotSource>,
        declaration_source: Arc<dyn DeclarationSource>,
        options: ReconciliationOptions,
    ) -> Self {
        Self {
            schema_source,
            declaration_source,
            options,
        }
    }

    /// Loads both inputs and classifies every declaration.
    ///
    /// Fails only when an input cannot be loaded or the schema snapshot is
    /// empty.
    pub async fn run(&self) -> AppResult<MappingReport> {
        let schema = self.schema_source.load_schema_snapshot().await?;
        if schema.is_empty() {
            return Err(AppError::Validation(
                "no scanned schema: the snapshot contains no tables".to_owned(),
            ));
        }

        let declarations = self.declaration_source.load_declarations().await?;
        if declarations.is_empty() {
            warn!("declaration source is empty; report will contain no records");
        }

        info!(
            tables = schema.table_count(),
            columns = schema.column_count(),
            declarations = declarations.len(),
            default_schema = %self.options.default_schema,
            "reconciling declared columns"
        );

        let report = reconcile(&schema, &declarations, &self.options);
        let summary = report.summary();

        info!(
            records = summary.total,
            column_matched = summary.column_matched,
            column_missing = summary.column_missing,
            table_only = summary.table_only,
            table_missing = summary.table_missing,
            "reconciliation finished"
        );

        Ok(report)
    }
}
