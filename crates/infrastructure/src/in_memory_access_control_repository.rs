//! Read-only access-control store built from a loaded snapshot.

use async_trait::async_trait;
use personalia_application::AccessControlRepository;
use personalia_core::AppResult;
use personalia_domain::{ColumnAccessGrant, RolePermission, RoleSet, TypeColumnAccessGrant};

/// In-memory access-control repository implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessControlRepository {
    permissions: Vec<RolePermission>,
    column_access: Vec<ColumnAccessGrant>,
    type_column_access: Vec<TypeColumnAccessGrant>,
}

impl InMemoryAccessControlRepository {
    /// Creates a repository holding the given rows.
    #[must_use]
    pub fn with_rows(
        permissions: Vec<RolePermission>,
        column_access: Vec<ColumnAccessGrant>,
        type_column_access: Vec<TypeColumnAccessGrant>,
    ) -> Self {
        Self {
            permissions,
            column_access,
            type_column_access,
        }
    }
}

#[async_trait]
impl AccessControlRepository for InMemoryAccessControlRepository {
    async fn list_role_permissions(&self, roles: &RoleSet) -> AppResult<Vec<RolePermission>> {
        Ok(self
            .permissions
            .iter()
            .filter(|permission| roles.contains(&permission.role))
            .cloned()
            .collect())
    }

    async fn list_column_access(&self, roles: &RoleSet) -> AppResult<Vec<ColumnAccessGrant>> {
        Ok(self
            .column_access
            .iter()
            .filter(|grant| roles.contains(&grant.role))
            .cloned()
            .collect())
    }

    async fn list_type_column_access(&self) -> AppResult<Vec<TypeColumnAccessGrant>> {
        Ok(self.type_column_access.clone())
    }
}
