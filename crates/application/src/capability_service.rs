//! Capability resolution for actors and role sets.

use std::sync::Arc;

use personalia_core::{ActorIdentity, AppResult};
use personalia_domain::{Action, Module, RoleSet};
use tracing::debug;

use crate::{AccessControlRepository, TypeAccessIndex};

mod capabilities;

pub use capabilities::{Capabilities, CapabilitySnapshot, ColumnCapability};

/// Application service resolving capabilities for an actor.
#[derive(Clone)]
pub struct CapabilityService {
    repository: Arc<dyn AccessControlRepository>,
}

impl CapabilityService {
    /// Creates a new capability service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessControlRepository>) -> Self {
        Self { repository }
    }

    /// Loads grants for the actor's roles and builds their capabilities.
    pub async fn capabilities_for(&self, actor: &ActorIdentity) -> AppResult<Capabilities> {
        let roles = RoleSet::from_raw(actor.roles());
        self.capabilities_for_roles(roles).await
    }

    /// Loads grants for an already normalized role set.
    pub async fn capabilities_for_roles(&self, roles: RoleSet) -> AppResult<Capabilities> {
        let permissions = self.repository.list_role_permissions(&roles).await?;
        let column_access = self.repository.list_column_access(&roles).await?;

        debug!(
            roles = roles.len(),
            permissions = permissions.len(),
            column_grants = column_access.len(),
            "resolved capability inputs"
        );

        Ok(Capabilities::new(roles, &permissions, &column_access))
    }

    /// Ensures the actor may perform `action` on `module`.
    pub async fn require_permission(
        &self,
        actor: &ActorIdentity,
        module: Module,
        action: Action,
    ) -> AppResult<()> {
        self.capabilities_for(actor)
            .await?
            .require(module, action)
            .inspect_err(|_| {
                debug!(
                    subject = %actor.subject(),
                    module = module.as_str(),
                    action = action.as_str(),
                    "permission denied"
                );
            })
    }

    /// Loads the employee-type field applicability index.
    pub async fn type_access_index(&self) -> AppResult<TypeAccessIndex> {
        let grants = self.repository.list_type_column_access().await?;
        let index = TypeAccessIndex::build(&grants);

        debug!(
            grants = grants.len(),
            entries = index.len(),
            "built type access index"
        );

        Ok(index)
    }
}
