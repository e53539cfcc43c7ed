//! Personalia command-line composition root.

#![forbid(unsafe_code)]

mod cli_config;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use personalia_application::{
    CapabilityService, CapabilitySnapshot, SchemaMappingService, TypeAccessIndex,
};
use personalia_core::{ActorIdentity, AppError, AppResult};
use personalia_domain::{CoverageCounts, MappingReport};
use personalia_infrastructure::{
    JsonFileDeclarationSource, JsonFileSchemaSnapshotSource, load_access_control_snapshot,
};
use serde::Serialize;
use tracing::info;

use crate::cli_config::{CapabilitiesConfig, CliConfig, MapConfig, init_tracing};

#[derive(Debug, Serialize)]
struct MappingReportDocument {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: MappingReport,
    summary: CoverageCounts,
}

#[derive(Debug, Serialize)]
struct CapabilitiesDocument {
    capabilities: CapabilitySnapshot,
    type_access: TypeAccessIndex,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    match CliConfig::load()? {
        CliConfig::Map(config) => run_map(config).await,
        CliConfig::Capabilities(config) => run_capabilities(config).await,
    }
}

async fn run_map(config: MapConfig) -> AppResult<()> {
    info!(
        schema_path = %config.schema_path.display(),
        declarations_path = %config.declarations_path.display(),
        "starting schema reconciliation"
    );

    let service = SchemaMappingService::new(
        Arc::new(JsonFileSchemaSnapshotSource::new(config.schema_path)),
        Arc::new(JsonFileDeclarationSource::new(config.declarations_path)),
        config.options,
    );
    let report = service.run().await?;

    for (table, counts) in &report.coverage {
        info!(
            table = %table,
            total = counts.total,
            column_matched = counts.column_matched,
            column_missing = counts.column_missing,
            table_only = counts.table_only,
            table_missing = counts.table_missing,
            "table coverage"
        );
    }

    let document = MappingReportDocument {
        generated_at: Utc::now(),
        summary: report.summary(),
        report,
    };
    emit_json(&document, config.report_path.as_deref()).await
}

async fn run_capabilities(config: CapabilitiesConfig) -> AppResult<()> {
    let repository = load_access_control_snapshot(&config.access_control_path).await?;
    let service = CapabilityService::new(Arc::new(repository));
    let actor = ActorIdentity::new("cli", "command line", config.roles);

    let capabilities = service.capabilities_for(&actor).await?;
    let type_access = service.type_access_index().await?;

    info!(
        roles = capabilities.roles().len(),
        type_access_entries = type_access.len(),
        "resolved capabilities"
    );

    let document = CapabilitiesDocument {
        capabilities: capabilities.snapshot(),
        type_access,
    };
    emit_json(&document, None).await
}

async fn emit_json<T: Serialize>(document: &T, path: Option<&Path>) -> AppResult<()> {
    let body = serde_json::to_string_pretty(document)
        .map_err(|error| AppError::Internal(format!("failed to encode report: {error}")))?;

    match path {
        Some(path) => {
            tokio::fs::write(path, body).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to write report '{}': {error}",
                    path.display()
                ))
            })?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{body}"),
    }

    Ok(())
}
