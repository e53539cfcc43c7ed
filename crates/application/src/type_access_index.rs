//! Employee-type field applicability lookup.

use std::collections::BTreeMap;

use personalia_domain::{EmployeeType, TypeColumnAccessGrant, section_alias};
use serde::Serialize;

/// Nested `type -> section -> column -> accessible` lookup.
///
/// Sections carrying the `Employee ` prefix are indexed under both their
/// stored name and the stripped alias, so `"Employee Bank"` and `"Bank"`
/// resolve to the same entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeAccessIndex {
    entries: BTreeMap<EmployeeType, BTreeMap<String, BTreeMap<String, bool>>>,
}

impl TypeAccessIndex {
    /// Builds the index from stored grants. Later rows overwrite earlier rows
    /// with the same (type, section, column) key.
    #[must_use]
    pub fn build(grants: &[TypeColumnAccessGrant]) -> Self {
        let mut index = Self::default();
        for grant in grants {
            index.insert(grant.employee_type, grant.section.as_str(), grant);
            if let Some(alias) = section_alias(grant.section.as_str()) {
                index.insert(grant.employee_type, alias, grant);
            }
        }
        index
    }

    fn insert(
        &mut self,
        employee_type: EmployeeType,
        section: &str,
        grant: &TypeColumnAccessGrant,
    ) {
        self.entries
            .entry(employee_type)
            .or_default()
            .entry(section.to_owned())
            .or_default()
            .insert(grant.column.clone(), grant.accessible);
    }

    /// Returns the stored flag, or `None` when no row covers the field.
    ///
    /// An exact section match wins; otherwise sections compare ignoring
    /// ASCII case, so `"bank"` finds rows stored as `"Employee Bank"`.
    #[must_use]
    pub fn is_accessible(
        &self,
        employee_type: EmployeeType,
        section: &str,
        column: &str,
    ) -> Option<bool> {
        let sections = self.entries.get(&employee_type)?;
        let section = section.trim();
        let columns = sections.get(section).or_else(|| {
            sections
                .iter()
                .find(|(stored, _)| stored.eq_ignore_ascii_case(section))
                .map(|(_, columns)| columns)
        })?;

        columns.get(column).copied()
    }

    /// Returns whether the field applies to the employee type. Fields without
    /// a row apply.
    #[must_use]
    pub fn is_applicable(&self, employee_type: EmployeeType, section: &str, column: &str) -> bool {
        self.is_accessible(employee_type, section, column)
            .unwrap_or(true)
    }

    /// Number of (type, section, column) entries, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use personalia_domain::{EmployeeType, TypeColumnAccessGrant};

    use super::TypeAccessIndex;

    fn grant(
        employee_type: EmployeeType,
        section: &str,
        column: &str,
        accessible: bool,
    ) -> TypeColumnAccessGrant {
        TypeColumnAccessGrant {
            employee_type,
            section: section.to_owned(),
            column: column.to_owned(),
            accessible,
        }
    }

    #[test]
    fn prefixed_section_is_indexed_under_alias() {
        let index =
            TypeAccessIndex::build(&[grant(EmployeeType::Expat, "Employee Bank", "iban", true)]);

        assert_eq!(
            index.is_accessible(EmployeeType::Expat, "Employee Bank", "iban"),
            Some(true)
        );
        assert_eq!(index.is_accessible(EmployeeType::Expat, "Bank", "iban"), Some(true));
        assert_eq!(index.is_accessible(EmployeeType::Indonesia, "Bank", "iban"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn section_lookup_ignores_case() {
        let index = TypeAccessIndex::build(&[grant(
            EmployeeType::Indonesia,
            "Employee Bank",
            "iban",
            false,
        )]);

        assert_eq!(
            index.is_accessible(EmployeeType::Indonesia, "bank", "iban"),
            Some(false)
        );
        assert_eq!(
            index.is_accessible(EmployeeType::Indonesia, "employee bank", "iban"),
            Some(false)
        );
        assert!(!index.is_applicable(EmployeeType::Indonesia, "bank", "iban"));
    }

    #[test]
    fn plain_section_is_indexed_once() {
        let index = TypeAccessIndex::build(&[grant(EmployeeType::Indonesia, "core", "nik", true)]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn last_row_wins_on_duplicate_key() {
        let index = TypeAccessIndex::build(&[
            grant(EmployeeType::Expat, "travel", "kitas_number", true),
            grant(EmployeeType::Expat, "travel", "kitas_number", false),
        ]);

        assert_eq!(
            index.is_accessible(EmployeeType::Expat, "travel", "kitas_number"),
            Some(false)
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn unlisted_field_is_applicable() {
        let index = TypeAccessIndex::build(&[grant(
            EmployeeType::Indonesia,
            "travel",
            "passport_no",
            false,
        )]);

        assert!(!index.is_applicable(EmployeeType::Indonesia, "travel", "passport_no"));
        assert!(index.is_applicable(EmployeeType::Indonesia, "travel", "visa_type"));
    }

    #[test]
    fn index_serializes_as_nested_maps() {
        let index =
            TypeAccessIndex::build(&[grant(EmployeeType::Expat, "Employee Bank", "iban", true)]);
        let value = serde_json::to_value(&index).unwrap_or_default();
        assert_eq!(value["expat"]["Bank"]["iban"], serde_json::Value::Bool(true));
    }
}
