//! Roles, permission grants and the default section table.

use std::collections::BTreeSet;
use std::str::FromStr;

use personalia_core::AppError;
use serde::{Deserialize, Serialize};

use crate::employee::ALL_SECTIONS;

/// Coarse-grained application areas gated by role permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Employee master data.
    Employees,
    /// Application user accounts.
    Users,
    /// Reporting and exports.
    Reports,
    /// Application settings, including access-control tables.
    Settings,
    /// Audit trail.
    Audit,
}

impl Module {
    /// Returns a stable storage value for this module.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Users => "users",
            Self::Reports => "reports",
            Self::Settings => "settings",
            Self::Audit => "audit",
        }
    }

    /// Returns all known modules.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Module] = &[
            Module::Employees,
            Module::Users,
            Module::Reports,
            Module::Settings,
            Module::Audit,
        ];

        ALL
    }
}

impl FromStr for Module {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "employees" => Ok(Self::Employees),
            "users" => Ok(Self::Users),
            "reports" => Ok(Self::Reports),
            "settings" => Ok(Self::Settings),
            "audit" => Ok(Self::Audit),
            _ => Err(AppError::Validation(format!("unknown module '{value}'"))),
        }
    }
}

/// Actions that may be granted on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read records.
    Read,
    /// Create records.
    Create,
    /// Update records.
    Update,
    /// Delete records.
    Delete,
    /// Administer user accounts and their roles.
    ManageUsers,
    /// Export records.
    Export,
}

impl Action {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ManageUsers => "manage_users",
            Self::Export => "export",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::ManageUsers,
            Action::Export,
        ];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "manage_users" => Ok(Self::ManageUsers),
            "export" => Ok(Self::Export),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// Column access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// The column may be displayed.
    Read,
    /// The column may be edited.
    Write,
}

impl AccessMode {
    /// Returns a stable storage value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl FromStr for AccessMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            _ => Err(AppError::Validation(format!(
                "unknown access mode '{value}'"
            ))),
        }
    }
}

/// Normalized actor category used for permission and column lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Unrestricted administrator.
    SuperAdmin,
    /// Application administrator.
    Admin,
    /// HR staff maintaining employee records.
    HrGeneral,
    /// Line manager with read access to their team.
    Manager,
    /// Regular employee.
    Employee,
    /// Unrecognized role, kept as its lowercased raw value.
    Other(String),
}

impl Role {
    /// Maps a raw role string from the session or the grant store to a role.
    ///
    /// Matching is loose on purpose: stored role names such as `"HR Staff"`
    /// or `"hr_manager"` all resolve to [`Role::HrGeneral`]. Returns `None`
    /// for blank input.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }

        let role = if value.contains("super") {
            Self::SuperAdmin
        } else if value.contains("admin") {
            Self::Admin
        } else if value.contains("hr") {
            Self::HrGeneral
        } else if value.contains("manager") || value.contains("supervisor") {
            Self::Manager
        } else if matches!(value.as_str(), "employee" | "staff" | "user") {
            Self::Employee
        } else {
            Self::Other(value)
        };

        Some(role)
    }

    /// Returns the canonical name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::HrGeneral => "hr_general",
            Self::Manager => "manager",
            Self::Employee => "employee",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns the sections this role may access in `mode` regardless of
    /// column-level grants.
    #[must_use]
    pub fn default_sections(&self, mode: AccessMode) -> &'static [&'static str] {
        const HR_WRITABLE: &[&str] = &[
            "core",
            "contact",
            "employment",
            "onboard",
            "insurance",
            "travel",
            "checklist",
            "notes",
        ];
        const MANAGER_READABLE: &[&str] = &["core", "contact", "employment", "onboard"];
        const EMPLOYEE_READABLE: &[&str] = &["core", "contact"];

        match (self, mode) {
            (Self::SuperAdmin | Self::Admin, _) => ALL_SECTIONS,
            (Self::HrGeneral, AccessMode::Read) => ALL_SECTIONS,
            (Self::HrGeneral, AccessMode::Write) => HR_WRITABLE,
            (Self::Manager, AccessMode::Read) => MANAGER_READABLE,
            (Self::Employee, AccessMode::Read) => EMPLOYEE_READABLE,
            (Self::Manager | Self::Employee | Self::Other(_), _) => &[],
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(value.as_str())
            .ok_or_else(|| AppError::Validation("role must not be empty".to_owned()))
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_owned()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Deduplicated set of normalized roles held by one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Normalizes raw role strings, dropping blank entries.
    #[must_use]
    pub fn from_raw<I, S>(raw_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            raw_roles
                .into_iter()
                .filter_map(|raw| Role::normalize(raw.as_ref()))
                .collect(),
        )
    }

    /// Returns whether the set holds `role`.
    #[must_use]
    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    /// Iterates roles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    /// Returns the number of distinct roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no role is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Module/action grant attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Role receiving the grant.
    pub role: Role,
    /// Module the grant applies to.
    pub module: Module,
    /// Action the grant applies to.
    pub action: Action,
    /// Whether the action is allowed.
    pub allowed: bool,
}

/// Column-level read/write grant attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAccessGrant {
    /// Role receiving the grant.
    pub role: Role,
    /// Employee record section holding the column.
    pub section: String,
    /// Column name inside the section.
    pub column: String,
    /// Stored read flag.
    #[serde(default)]
    pub read: bool,
    /// Stored write flag.
    #[serde(default)]
    pub write: bool,
}

impl ColumnAccessGrant {
    /// Read access after applying write-implies-read.
    #[must_use]
    pub fn effective_read(&self) -> bool {
        self.read || self.write
    }

    /// Returns whether the grant allows `mode`.
    #[must_use]
    pub fn allows(&self, mode: AccessMode) -> bool {
        match mode {
            AccessMode::Read => self.effective_read(),
            AccessMode::Write => self.write,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AccessMode, Action, ColumnAccessGrant, Module, Role, RoleSet};

    #[test]
    fn module_and_action_roundtrip_storage_value() {
        for module in Module::all() {
            assert_eq!(Module::from_str(module.as_str()).ok(), Some(*module));
        }
        for action in Action::all() {
            assert_eq!(Action::from_str(action.as_str()).ok(), Some(*action));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(Action::from_str("approve").is_err());
        assert!(Module::from_str("payroll").is_err());
    }

    #[test]
    fn role_normalization_uses_loose_matching() {
        assert_eq!(Role::normalize("HR Staff"), Some(Role::HrGeneral));
        assert_eq!(Role::normalize("hr_manager"), Some(Role::HrGeneral));
        assert_eq!(Role::normalize(" Super Admin "), Some(Role::SuperAdmin));
        assert_eq!(Role::normalize("system_admin"), Some(Role::Admin));
        assert_eq!(Role::normalize("Department Manager"), Some(Role::Manager));
        assert_eq!(Role::normalize("Staff"), Some(Role::Employee));
        assert_eq!(
            Role::normalize("Auditor"),
            Some(Role::Other("auditor".to_owned()))
        );
        assert_eq!(Role::normalize("   "), None);
    }

    #[test]
    fn canonical_names_normalize_to_themselves() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::HrGeneral,
            Role::Manager,
            Role::Employee,
        ] {
            assert_eq!(Role::normalize(role.as_str()), Some(role));
        }
    }

    #[test]
    fn role_set_drops_blank_and_duplicate_entries() {
        let roles = RoleSet::from_raw(["hr", "", "HR General", "  ", "auditor"]);
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&Role::HrGeneral));
        assert!(roles.contains(&Role::Other("auditor".to_owned())));
    }

    #[test]
    fn role_deserializes_through_normalization() {
        let role: Result<Role, _> = serde_json::from_str("\"HR Officer\"");
        assert_eq!(role.ok(), Some(Role::HrGeneral));

        let blank: Result<Role, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }

    #[test]
    fn write_grant_implies_read() {
        let grant = ColumnAccessGrant {
            role: Role::Manager,
            section: "bank".to_owned(),
            column: "iban".to_owned(),
            read: false,
            write: true,
        };
        assert!(grant.allows(AccessMode::Read));
        assert!(grant.allows(AccessMode::Write));
    }

    #[test]
    fn hr_default_write_excludes_bank() {
        let writable = Role::HrGeneral.default_sections(AccessMode::Write);
        assert!(!writable.contains(&"bank"));
        assert!(Role::HrGeneral.default_sections(AccessMode::Read).contains(&"bank"));
        assert!(
            Role::Other("auditor".to_owned())
                .default_sections(AccessMode::Read)
                .is_empty()
        );
    }
}
