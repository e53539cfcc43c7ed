//! Employee classification and record sections.

use std::str::FromStr;

use personalia_core::AppError;
use serde::{Deserialize, Serialize};

/// Every section of an employee record.
pub const ALL_SECTIONS: &[&str] = &[
    "core",
    "contact",
    "employment",
    "onboard",
    "bank",
    "insurance",
    "travel",
    "checklist",
    "notes",
];

/// Prefix some stored section names carry, e.g. `"Employee Bank"`.
pub const EMPLOYEE_SECTION_PREFIX: &str = "employee ";

/// Returns the section name with the employee prefix stripped.
///
/// The prefix match ignores ASCII case. Returns `None` when the prefix is
/// absent or nothing is left after stripping it.
#[must_use]
pub fn section_alias(section: &str) -> Option<&str> {
    let prefix_len = EMPLOYEE_SECTION_PREFIX.len();
    let head = section.get(..prefix_len)?;
    if !head.eq_ignore_ascii_case(EMPLOYEE_SECTION_PREFIX) {
        return None;
    }

    let alias = section[prefix_len..].trim();
    (!alias.is_empty()).then_some(alias)
}

/// Employee classification deciding which fields apply to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeType {
    /// Indonesian national.
    Indonesia,
    /// Expatriate.
    Expat,
}

impl EmployeeType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indonesia => "indonesia",
            Self::Expat => "expat",
        }
    }
}

impl FromStr for EmployeeType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "indonesia" | "indonesian" | "local" => Ok(Self::Indonesia),
            "expat" | "expatriate" => Ok(Self::Expat),
            _ => Err(AppError::Validation(format!(
                "unknown employee type '{value}'"
            ))),
        }
    }
}

/// Field applicability for one employee type, independent of the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeColumnAccessGrant {
    /// Employee type the grant applies to.
    #[serde(rename = "type")]
    pub employee_type: EmployeeType,
    /// Section holding the column.
    pub section: String,
    /// Column name inside the section.
    pub column: String,
    /// Whether the column applies to the employee type.
    pub accessible: bool,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{EmployeeType, TypeColumnAccessGrant, section_alias};

    #[test]
    fn section_alias_strips_employee_prefix() {
        assert_eq!(section_alias("Employee Bank"), Some("Bank"));
        assert_eq!(section_alias("employee   Travel "), Some("Travel"));
        assert_eq!(section_alias("Bank"), None);
        assert_eq!(section_alias("Employee "), None);
        assert_eq!(section_alias("Employees"), None);
    }

    #[test]
    fn employee_type_accepts_aliases() {
        assert_eq!(
            EmployeeType::from_str("Indonesian").ok(),
            Some(EmployeeType::Indonesia)
        );
        assert_eq!(
            EmployeeType::from_str("expatriate").ok(),
            Some(EmployeeType::Expat)
        );
        assert!(EmployeeType::from_str("contractor").is_err());
    }

    #[test]
    fn type_grant_reads_type_field() {
        let grant: Result<TypeColumnAccessGrant, _> = serde_json::from_str(
            r#"{"type":"expat","section":"Employee Bank","column":"iban","accessible":true}"#,
        );
        assert!(grant.is_ok());
        let grant = grant.unwrap_or_else(|_| unreachable!());
        assert_eq!(grant.employee_type, EmployeeType::Expat);
    }
}
