//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod employee;
mod mapping;
mod naming;
mod schema;
mod security;

pub use employee::{
    ALL_SECTIONS, EMPLOYEE_SECTION_PREFIX, EmployeeType, TypeColumnAccessGrant, section_alias,
};
pub use mapping::{CoverageCounts, MappingRecord, MappingReport, MappingStatus, Suggestion};
pub use naming::{normalize_exact, normalize_fuzzy, qualify_table_name, similarity};
pub use schema::{ColumnDeclaration, SchemaColumn, SchemaSnapshot};
pub use security::{AccessMode, Action, ColumnAccessGrant, Module, Role, RolePermission, RoleSet};
