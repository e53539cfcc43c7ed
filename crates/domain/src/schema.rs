//! Scanned schema snapshot and declared columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::naming::normalize_exact;

/// Column as found by the database catalog scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Column name.
    pub name: String,
    /// Declared database type.
    #[serde(rename = "type", default)]
    pub data_type: String,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: bool,
}

impl SchemaColumn {
    /// Creates a column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Immutable snapshot of scanned tables keyed by qualified table name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSnapshot {
    tables: BTreeMap<String, Vec<SchemaColumn>>,
}

impl SchemaSnapshot {
    /// Creates a snapshot from scanned tables.
    #[must_use]
    pub fn new(tables: BTreeMap<String, Vec<SchemaColumn>>) -> Self {
        Self { tables }
    }

    /// Iterates tables in qualified-name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[SchemaColumn])> {
        self.tables
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    /// Finds a table by exact-normalized qualified name.
    #[must_use]
    pub fn find_table(&self, qualified_name: &str) -> Option<(&str, &[SchemaColumn])> {
        let wanted = normalize_exact(qualified_name);
        self.tables()
            .find(|(name, _)| normalize_exact(name) == wanted)
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns the number of columns across all tables.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Returns whether the scan found no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// One spreadsheet row naming a table and column that should exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDeclaration {
    /// Table field; may list several tables separated by `;` or `,`.
    #[serde(default)]
    pub table: Option<String>,
    /// Column field.
    #[serde(default)]
    pub column: Option<String>,
    /// Explicit schema overriding the default qualification.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ColumnDeclaration {
    /// Creates a declaration without an explicit schema.
    #[must_use]
    pub fn new(table: Option<&str>, column: Option<&str>) -> Self {
        Self {
            table: table.map(str::to_owned),
            column: column.map(str::to_owned),
            schema: None,
        }
    }

    /// Table names listed by this declaration, trimmed, blanks dropped.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.table
            .as_deref()
            .map(|field| {
                field
                    .split([';', ','])
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Declared column name, trimmed; `None` when blank.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        self.column
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Explicit schema, trimmed; `None` when blank.
    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ColumnDeclaration, SchemaColumn, SchemaSnapshot};

    #[test]
    fn declaration_splits_multiple_tables() {
        let declaration =
            ColumnDeclaration::new(Some("employees; employee_bank ,,"), Some(" iban "));
        assert_eq!(declaration.table_names(), vec!["employees", "employee_bank"]);
        assert_eq!(declaration.column_name(), Some("iban"));
    }

    #[test]
    fn blank_fields_are_absent() {
        let declaration = ColumnDeclaration::new(Some(" ; "), Some("  "));
        assert!(declaration.table_names().is_empty());
        assert_eq!(declaration.column_name(), None);
    }

    #[test]
    fn find_table_ignores_case_and_spacing() {
        let snapshot = SchemaSnapshot::new(BTreeMap::from([(
            "dbo.employees".to_owned(),
            vec![SchemaColumn::new("emp_id", "int", false)],
        )]));

        let found = snapshot.find_table(" DBO.Employees ");
        assert_eq!(found.map(|(name, _)| name), Some("dbo.employees"));
        assert_eq!(snapshot.column_count(), 1);
    }

    #[test]
    fn snapshot_reads_table_map_shape() {
        let snapshot: Result<SchemaSnapshot, _> = serde_json::from_str(
            r#"{"dbo.employees":[{"name":"emp_id","type":"int","nullable":false},{"name":"full_name"}]}"#,
        );
        assert!(snapshot.is_ok());
        let snapshot = snapshot.unwrap_or_default();
        assert_eq!(snapshot.table_count(), 1);
        assert_eq!(snapshot.column_count(), 2);
    }
}
