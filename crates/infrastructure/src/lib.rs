//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_control_repository;
mod json_access_control_snapshot;
mod json_declaration_source;
mod json_file;
mod json_schema_snapshot_source;

pub use in_memory_access_control_repository::InMemoryAccessControlRepository;
pub use json_access_control_snapshot::{AccessControlSnapshot, load_access_control_snapshot};
pub use json_declaration_source::JsonFileDeclarationSource;
pub use json_schema_snapshot_source::JsonFileSchemaSnapshotSource;
