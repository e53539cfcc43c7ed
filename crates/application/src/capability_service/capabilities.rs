use std::collections::{BTreeMap, BTreeSet};

use personalia_core::{AppError, AppResult};
use personalia_domain::{
    AccessMode, Action, ColumnAccessGrant, EmployeeType, Module, RolePermission, RoleSet,
};
use serde::Serialize;

use crate::TypeAccessIndex;

/// Effective read/write state for one explicitly granted column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ColumnState {
    read: bool,
    write: bool,
}

/// Capabilities of one actor, computed from the roles they hold.
///
/// Module/action checks are default-deny. Column checks consult explicit
/// grants first and fall back to the roles' default section lists; explicit
/// grants only ever add access on top of those defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    roles: RoleSet,
    allowed_actions: BTreeSet<(Module, Action)>,
    columns: BTreeMap<(String, String), ColumnState>,
    default_readable: BTreeSet<&'static str>,
    default_writable: BTreeSet<&'static str>,
}

impl Capabilities {
    /// Computes capabilities for `roles`. Grants for roles outside the set
    /// are ignored.
    #[must_use]
    pub fn new(
        roles: RoleSet,
        permissions: &[RolePermission],
        column_access: &[ColumnAccessGrant],
    ) -> Self {
        let allowed_actions = permissions
            .iter()
            .filter(|permission| permission.allowed && roles.contains(&permission.role))
            .map(|permission| (permission.module, permission.action))
            .collect();

        let mut columns: BTreeMap<(String, String), ColumnState> = BTreeMap::new();
        for grant in column_access
            .iter()
            .filter(|grant| roles.contains(&grant.role))
        {
            let state = columns
                .entry((grant.section.clone(), grant.column.clone()))
                .or_default();
            state.read |= grant.effective_read();
            state.write |= grant.write;
        }

        let default_readable = roles
            .iter()
            .flat_map(|role| role.default_sections(AccessMode::Read).iter().copied())
            .collect();
        let default_writable = roles
            .iter()
            .flat_map(|role| role.default_sections(AccessMode::Write).iter().copied())
            .collect();

        Self {
            roles,
            allowed_actions,
            columns,
            default_readable,
            default_writable,
        }
    }

    /// Roles these capabilities were computed for.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns whether any held role is allowed `action` on `module`.
    #[must_use]
    pub fn can(&self, module: Module, action: Action) -> bool {
        self.allowed_actions.contains(&(module, action))
    }

    /// Like [`Capabilities::can`], as a forbidden error when denied.
    pub fn require(&self, module: Module, action: Action) -> AppResult<()> {
        if self.can(module, action) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "roles [{}] are missing permission '{}.{}'",
            self.roles
                .iter()
                .map(|role| role.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            module.as_str(),
            action.as_str()
        )))
    }

    /// Returns whether the column may be accessed in `mode`.
    #[must_use]
    pub fn can_column(&self, section: &str, column: &str, mode: AccessMode) -> bool {
        let explicit = self
            .columns
            .get(&(section.to_owned(), column.to_owned()))
            .is_some_and(|state| match mode {
                AccessMode::Read => state.read,
                AccessMode::Write => state.write,
            });

        explicit || self.default_sections(mode).contains(section)
    }

    /// Shorthand for a read check.
    #[must_use]
    pub fn can_read_column(&self, section: &str, column: &str) -> bool {
        self.can_column(section, column, AccessMode::Read)
    }

    /// Shorthand for a write check.
    #[must_use]
    pub fn can_write_column(&self, section: &str, column: &str) -> bool {
        self.can_column(section, column, AccessMode::Write)
    }

    /// Whether the field is shown for an employee of `employee_type`.
    #[must_use]
    pub fn can_view_field(
        &self,
        type_access: &TypeAccessIndex,
        employee_type: EmployeeType,
        section: &str,
        column: &str,
    ) -> bool {
        self.can_read_column(section, column)
            && type_access.is_applicable(employee_type, section, column)
    }

    /// Whether the field is editable for an employee of `employee_type`.
    #[must_use]
    pub fn can_edit_field(
        &self,
        type_access: &TypeAccessIndex,
        employee_type: EmployeeType,
        section: &str,
        column: &str,
    ) -> bool {
        self.can_write_column(section, column)
            && type_access.is_applicable(employee_type, section, column)
    }

    fn default_sections(&self, mode: AccessMode) -> &BTreeSet<&'static str> {
        match mode {
            AccessMode::Read => &self.default_readable,
            AccessMode::Write => &self.default_writable,
        }
    }

    /// Serializable view handed to the admin UI.
    #[must_use]
    pub fn snapshot(&self) -> CapabilitySnapshot {
        let mut modules: BTreeMap<Module, Vec<Action>> = BTreeMap::new();
        for (module, action) in &self.allowed_actions {
            modules.entry(*module).or_default().push(*action);
        }

        CapabilitySnapshot {
            roles: self.roles.iter().map(|role| role.as_str().to_owned()).collect(),
            modules,
            readable_sections: self
                .default_readable
                .iter()
                .map(|section| (*section).to_owned())
                .collect(),
            writable_sections: self
                .default_writable
                .iter()
                .map(|section| (*section).to_owned())
                .collect(),
            columns: self
                .columns
                .iter()
                .map(|((section, column), state)| ColumnCapability {
                    section: section.clone(),
                    column: column.clone(),
                    read: state.read,
                    write: state.write,
                })
                .collect(),
        }
    }
}

/// Serializable capabilities document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySnapshot {
    /// Canonical role names.
    pub roles: Vec<String>,
    /// Allowed actions per module.
    pub modules: BTreeMap<Module, Vec<Action>>,
    /// Sections readable through role defaults.
    pub readable_sections: Vec<String>,
    /// Sections writable through role defaults.
    pub writable_sections: Vec<String>,
    /// Explicitly granted columns.
    pub columns: Vec<ColumnCapability>,
}

/// Explicit column grant after merging all held roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCapability {
    /// Section name.
    pub section: String,
    /// Column name.
    pub column: String,
    /// Read access, write implied.
    pub read: bool,
    /// Write access.
    pub write: bool,
}
