use async_trait::async_trait;
use personalia_core::AppResult;
use personalia_domain::{ColumnAccessGrant, RolePermission, RoleSet, TypeColumnAccessGrant};

/// Repository port for role and field access tables.
#[async_trait]
pub trait AccessControlRepository: Send + Sync {
    /// Lists module/action grants attached to any of `roles`.
    async fn list_role_permissions(&self, roles: &RoleSet) -> AppResult<Vec<RolePermission>>;

    /// Lists column-level grants attached to any of `roles`.
    async fn list_column_access(&self, roles: &RoleSet) -> AppResult<Vec<ColumnAccessGrant>>;

    /// Lists per-employee-type field applicability rows in stored order.
    async fn list_type_column_access(&self) -> AppResult<Vec<TypeColumnAccessGrant>>;
}
