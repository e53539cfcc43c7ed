//! Reconciliation records, coverage counters and reports.

use std::collections::BTreeMap;
use std::str::FromStr;

use personalia_core::AppError;
use serde::{Deserialize, Serialize};

use crate::naming::normalize_exact;

/// Coverage key for records that named no table.
const UNSPECIFIED_TABLE: &str = "(unspecified)";

/// Outcome of resolving one declared table/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Table and column both resolved.
    ColumnMatched,
    /// Table resolved, column did not.
    ColumnMissing,
    /// Table resolved and no column was declared.
    TableOnly,
    /// No table declared, or the declared table does not exist.
    TableMissing,
}

impl MappingStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnMatched => "column_matched",
            Self::ColumnMissing => "column_missing",
            Self::TableOnly => "table_only",
            Self::TableMissing => "table_missing",
        }
    }
}

impl FromStr for MappingStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "column_matched" => Ok(Self::ColumnMatched),
            "column_missing" => Ok(Self::ColumnMissing),
            "table_only" => Ok(Self::TableOnly),
            "table_missing" => Ok(Self::TableMissing),
            _ => Err(AppError::Validation(format!(
                "unknown mapping status '{value}'"
            ))),
        }
    }
}

/// Candidate correction for an unresolved name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Qualified table holding the candidate.
    pub table: String,
    /// Candidate name.
    pub value: String,
    /// Similarity ratio in `[0, 1]`.
    pub score: f64,
}

/// Classified result for one declared (table, column) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Position of the source declaration.
    pub declaration_index: usize,
    /// Table name as declared, if any.
    pub declared_table: Option<String>,
    /// Column name as declared, if any.
    pub declared_column: Option<String>,
    /// Declared table after schema qualification.
    pub qualified_table: Option<String>,
    /// Schema table the declaration resolved to.
    pub resolved_table: Option<String>,
    /// Schema column the declaration resolved to.
    pub resolved_column: Option<String>,
    /// Declared type of the resolved column.
    pub column_type: Option<String>,
    /// Classification.
    pub status: MappingStatus,
    /// Best candidate, when any candidate scored above the threshold.
    pub suggestion: Option<Suggestion>,
    /// Column candidates, best first.
    pub suggestions: Vec<Suggestion>,
    /// Table candidates for an unknown declared table, best first.
    pub table_suggestions: Vec<Suggestion>,
}

impl MappingRecord {
    /// Returns whether the record resolved to a schema column.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.status == MappingStatus::ColumnMatched
    }

    /// Key the record is counted under in per-table coverage.
    ///
    /// The resolved schema table when there is one, otherwise the normalized
    /// qualified name, so spelling variants of one table share a row.
    #[must_use]
    pub fn coverage_key(&self) -> String {
        match (&self.resolved_table, &self.qualified_table) {
            (Some(resolved), _) => resolved.clone(),
            (None, Some(qualified)) => normalize_exact(qualified),
            (None, None) => UNSPECIFIED_TABLE.to_owned(),
        }
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCounts {
    /// Records counted.
    pub total: usize,
    /// Records with [`MappingStatus::ColumnMatched`].
    pub column_matched: usize,
    /// Records with [`MappingStatus::ColumnMissing`].
    pub column_missing: usize,
    /// Records with [`MappingStatus::TableOnly`].
    pub table_only: usize,
    /// Records with [`MappingStatus::TableMissing`].
    pub table_missing: usize,
}

impl CoverageCounts {
    /// Counts one record with `status`.
    pub fn record(&mut self, status: MappingStatus) {
        self.total += 1;
        match status {
            MappingStatus::ColumnMatched => self.column_matched += 1,
            MappingStatus::ColumnMissing => self.column_missing += 1,
            MappingStatus::TableOnly => self.table_only += 1,
            MappingStatus::TableMissing => self.table_missing += 1,
        }
    }
}

/// Output of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingReport {
    /// Records in declaration order, then table listing order.
    pub records: Vec<MappingRecord>,
    /// Counters keyed by [`MappingRecord::coverage_key`].
    pub coverage: BTreeMap<String, CoverageCounts>,
    /// Every record not resolved to a column.
    pub unmatched: Vec<MappingRecord>,
}

impl MappingReport {
    /// Builds coverage and the unmatched list from classified records.
    #[must_use]
    pub fn from_records(records: Vec<MappingRecord>) -> Self {
        let mut coverage: BTreeMap<String, CoverageCounts> = BTreeMap::new();
        for record in &records {
            coverage
                .entry(record.coverage_key())
                .or_default()
                .record(record.status);
        }

        let unmatched = records
            .iter()
            .filter(|record| !record.is_matched())
            .cloned()
            .collect();

        Self {
            records,
            coverage,
            unmatched,
        }
    }

    /// Totals across every table.
    #[must_use]
    pub fn summary(&self) -> CoverageCounts {
        let mut summary = CoverageCounts::default();
        for record in &self.records {
            summary.record(record.status);
        }
        summary
    }
}
