//! Access-control snapshot file decoding.

use std::path::Path;
use std::str::FromStr;

use personalia_core::AppResult;
use personalia_domain::{
    Action, ColumnAccessGrant, EmployeeType, Module, Role, RolePermission,
    TypeColumnAccessGrant,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::InMemoryAccessControlRepository;
use crate::json_file::read_json_file;

/// Access-control tables exported from the grant store.
///
/// Rows are kept as stored strings so one bad row does not reject the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessControlSnapshot {
    #[serde(default)]
    permissions: Vec<StoredRolePermission>,
    #[serde(default)]
    column_access: Vec<StoredColumnAccess>,
    #[serde(default)]
    type_column_access: Vec<StoredTypeColumnAccess>,
}

#[derive(Debug, Clone, Deserialize)]
struct StoredRolePermission {
    role: String,
    module: String,
    action: String,
    #[serde(default)]
    allowed: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct StoredColumnAccess {
    role: String,
    section: String,
    column: String,
    #[serde(default)]
    read: bool,
    #[serde(default)]
    write: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct StoredTypeColumnAccess {
    #[serde(rename = "type")]
    employee_type: String,
    section: String,
    column: String,
    #[serde(default)]
    accessible: bool,
}

impl AccessControlSnapshot {
    /// Converts stored rows into domain grants, skipping rows that do not
    /// parse.
    #[must_use]
    pub fn into_repository(self) -> InMemoryAccessControlRepository {
        let permissions: Vec<RolePermission> = self
            .permissions
            .into_iter()
            .filter_map(decode_permission)
            .collect();

        let column_access: Vec<ColumnAccessGrant> = self
            .column_access
            .into_iter()
            .filter_map(|row| {
                let Some(role) = Role::normalize(row.role.as_str()) else {
                    warn!(
                        section = %row.section,
                        column = %row.column,
                        "skipping column grant without role"
                    );
                    return None;
                };
                Some(ColumnAccessGrant {
                    role,
                    section: row.section,
                    column: row.column,
                    read: row.read,
                    write: row.write,
                })
            })
            .collect();

        let type_column_access: Vec<TypeColumnAccessGrant> = self
            .type_column_access
            .into_iter()
            .filter_map(decode_type_column_access)
            .collect();

        info!(
            permissions = permissions.len(),
            column_grants = column_access.len(),
            type_grants = type_column_access.len(),
            "loaded access-control snapshot"
        );

        InMemoryAccessControlRepository::with_rows(permissions, column_access, type_column_access)
    }
}

fn decode_permission(row: StoredRolePermission) -> Option<RolePermission> {
    let decoded = Role::normalize(row.role.as_str()).and_then(|role| {
        let module = Module::from_str(row.module.as_str()).ok()?;
        let action = Action::from_str(row.action.as_str()).ok()?;
        Some(RolePermission {
            role,
            module,
            action,
            allowed: row.allowed,
        })
    });

    if decoded.is_none() {
        warn!(
            role = %row.role,
            module = %row.module,
            action = %row.action,
            "skipping unrecognized permission row"
        );
    }

    decoded
}

fn decode_type_column_access(row: StoredTypeColumnAccess) -> Option<TypeColumnAccessGrant> {
    match EmployeeType::from_str(row.employee_type.as_str()) {
        Ok(employee_type) => Some(TypeColumnAccessGrant {
            employee_type,
            section: row.section,
            column: row.column,
            accessible: row.accessible,
        }),
        Err(error) => {
            warn!(
                section = %row.section,
                column = %row.column,
                error = %error,
                "skipping type grant with unknown employee type"
            );
            None
        }
    }
}

/// Loads an access-control snapshot file into an in-memory repository.
pub async fn load_access_control_snapshot(
    path: &Path,
) -> AppResult<InMemoryAccessControlRepository> {
    let snapshot: AccessControlSnapshot = read_json_file(path, "access-control snapshot").await?;
    Ok(snapshot.into_repository())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use personalia_application::AccessControlRepository;
    use personalia_core::AppError;
    use personalia_domain::{EmployeeType, Module, Role, RoleSet};
    use tempfile::NamedTempFile;

    use super::load_access_control_snapshot;

    #[tokio::test]
    async fn snapshot_skips_unparseable_rows() {
        let mut file = NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        let written = file.write_all(
            br#"{
                "permissions": [
                    {"role": "HR Staff", "module": "employees", "action": "update", "allowed": true},
                    {"role": "hr", "module": "payroll", "action": "read", "allowed": true},
                    {"role": " ", "module": "employees", "action": "read", "allowed": true}
                ],
                "column_access": [
                    {"role": "manager", "section": "bank", "column": "iban", "write": true},
                    {"role": "", "section": "bank", "column": "iban", "read": true}
                ],
                "type_column_access": [
                    {"type": "expat", "section": "Employee Bank", "column": "iban", "accessible": true},
                    {"type": "indonesian", "section": "travel", "column": "kitas_number"},
                    {"type": "Local", "section": "travel", "column": "visa_type"},
                    {"type": "contractor", "section": "travel", "column": "passport_no"}
                ]
            }"#,
        );
        assert!(written.is_ok());

        let repository = load_access_control_snapshot(file.path()).await;
        assert!(repository.is_ok());
        let repository = repository.unwrap_or_default();

        let permissions = repository
            .list_role_permissions(&RoleSet::from_iter([Role::HrGeneral]))
            .await
            .unwrap_or_default();
        assert_eq!(permissions.len(), 1);
        assert_eq!(permissions[0].module, Module::Employees);

        let columns = repository
            .list_column_access(&RoleSet::from_iter([Role::Manager]))
            .await
            .unwrap_or_default();
        assert_eq!(columns.len(), 1);
        assert!(columns[0].effective_read());

        let type_rows = repository.list_type_column_access().await.unwrap_or_default();
        assert_eq!(type_rows.len(), 3);
        assert_eq!(type_rows[0].employee_type, EmployeeType::Expat);
        assert_eq!(type_rows[1].employee_type, EmployeeType::Indonesia);
        assert!(!type_rows[1].accessible);
        assert_eq!(type_rows[2].employee_type, EmployeeType::Indonesia);
    }

    #[tokio::test]
    async fn missing_snapshot_file_is_not_found() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let result = load_access_control_snapshot(&directory.path().join("missing.json")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
