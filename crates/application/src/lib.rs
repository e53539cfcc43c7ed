//! Application services and ports.

#![forbid(unsafe_code)]

mod access_control_ports;
mod capability_service;
mod schema_mapping_ports;
mod schema_mapping_service;
mod type_access_index;

pub use access_control_ports::AccessControlRepository;
pub use capability_service::{
    Capabilities, CapabilityService, CapabilitySnapshot, ColumnCapability,
};
pub use schema_mapping_ports::{DeclarationSource, SchemaSnapshotSource};
pub use schema_mapping_service::{ReconciliationOptions, SchemaMappingService, reconcile};
pub use type_access_index::TypeAccessIndex;
