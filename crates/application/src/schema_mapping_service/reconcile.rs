use std::collections::HashMap;

use personalia_domain::{
    ColumnDeclaration, MappingRecord, MappingReport, MappingStatus, SchemaColumn, SchemaSnapshot,
    Suggestion, normalize_exact, qualify_table_name, similarity,
};
use serde::{Deserialize, Serialize};

/// Tuning for table qualification and fuzzy suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOptions {
    /// Schema prefix applied to bare table names.
    pub default_schema: String,
    /// Minimum similarity for a candidate to be suggested.
    pub suggestion_threshold: f64,
    /// Maximum number of suggestions per record.
    pub suggestion_limit: usize,
}

impl Default for ReconciliationOptions {
    fn default() -> Self {
        Self {
            default_schema: "dbo".to_owned(),
            suggestion_threshold: 0.6,
            suggestion_limit: 3,
        }
    }
}

/// Classifies every declared (table, column) pair against `schema`.
///
/// A declaration listing several tables yields one record per table, in the
/// order they were listed. Unresolved names are data, never errors.
#[must_use]
pub fn reconcile(
    schema: &SchemaSnapshot,
    declarations: &[ColumnDeclaration],
    options: &ReconciliationOptions,
) -> MappingReport {
    let reconciler = Reconciler::new(schema, options);
    let mut records = Vec::with_capacity(declarations.len());

    for (index, declaration) in declarations.iter().enumerate() {
        let table_names = declaration.table_names();
        if table_names.is_empty() {
            records.push(reconciler.classify_without_table(index, declaration));
            continue;
        }

        for table_name in table_names {
            records.push(reconciler.classify(index, declaration, table_name));
        }
    }

    MappingReport::from_records(records)
}

struct Reconciler<'a> {
    schema: &'a SchemaSnapshot,
    options: &'a ReconciliationOptions,
    tables: HashMap<String, (&'a str, &'a [SchemaColumn])>,
}

impl<'a> Reconciler<'a> {
    fn new(schema: &'a SchemaSnapshot, options: &'a ReconciliationOptions) -> Self {
        let mut tables = HashMap::with_capacity(schema.table_count());
        for (name, columns) in schema.tables() {
            tables
                .entry(normalize_exact(name))
                .or_insert((name, columns));
        }

        Self {
            schema,
            options,
            tables,
        }
    }

    fn classify_without_table(
        &self,
        index: usize,
        declaration: &ColumnDeclaration,
    ) -> MappingRecord {
        let column = declaration.column_name();
        let suggestions = column
            .map(|column| {
                self.rank(
                    column,
                    self.schema.tables().flat_map(|(table, columns)| {
                        columns
                            .iter()
                            .map(move |candidate| (table, candidate.name.as_str()))
                    }),
                )
            })
            .unwrap_or_default();

        let mut record = empty_record(index, None, column, None, MappingStatus::TableMissing);
        record.suggestion = suggestions.first().cloned();
        record.suggestions = suggestions;
        record
    }

    fn classify(
        &self,
        index: usize,
        declaration: &ColumnDeclaration,
        table_name: &str,
    ) -> MappingRecord {
        let column = declaration.column_name();
        let qualified = qualify_table_name(
            table_name,
            declaration.schema_name(),
            self.options.default_schema.as_str(),
        );

        let Some(&(resolved_table, columns)) = self.tables.get(&normalize_exact(&qualified)) else {
            let mut record = empty_record(
                index,
                Some(table_name),
                column,
                Some(qualified),
                MappingStatus::TableMissing,
            );
            record.table_suggestions = self.rank_tables(table_name);
            return record;
        };

        let Some(column) = column else {
            let mut record = empty_record(
                index,
                Some(table_name),
                None,
                Some(qualified),
                MappingStatus::TableOnly,
            );
            record.resolved_table = Some(resolved_table.to_owned());
            return record;
        };

        let wanted = normalize_exact(column);
        if let Some(found) = columns
            .iter()
            .find(|candidate| normalize_exact(&candidate.name) == wanted)
        {
            let mut record = empty_record(
                index,
                Some(table_name),
                Some(column),
                Some(qualified),
                MappingStatus::ColumnMatched,
            );
            record.resolved_table = Some(resolved_table.to_owned());
            record.resolved_column = Some(found.name.clone());
            record.column_type = Some(found.data_type.clone());
            return record;
        }

        let suggestions = self.rank(
            column,
            columns
                .iter()
                .map(|candidate| (resolved_table, candidate.name.as_str())),
        );
        let mut record = empty_record(
            index,
            Some(table_name),
            Some(column),
            Some(qualified),
            MappingStatus::ColumnMissing,
        );
        record.resolved_table = Some(resolved_table.to_owned());
        record.suggestion = suggestions.first().cloned();
        record.suggestions = suggestions;
        record
    }

    fn rank_tables(&self, table_name: &str) -> Vec<Suggestion> {
        let wanted = unqualified(table_name);
        let mut scored: Vec<Suggestion> = self
            .schema
            .tables()
            .map(|(table, _)| Suggestion {
                table: table.to_owned(),
                value: table.to_owned(),
                score: similarity(wanted, unqualified(table)),
            })
            .filter(|suggestion| suggestion.score >= self.options.suggestion_threshold)
            .collect();
        sort_and_truncate(&mut scored, self.options.suggestion_limit);
        scored
    }

    fn rank<'c>(
        &self,
        name: &str,
        candidates: impl Iterator<Item = (&'c str, &'c str)>,
    ) -> Vec<Suggestion> {
        let mut scored: Vec<Suggestion> = candidates
            .map(|(table, value)| Suggestion {
                table: table.to_owned(),
                value: value.to_owned(),
                score: similarity(name, value),
            })
            .filter(|suggestion| suggestion.score >= self.options.suggestion_threshold)
            .collect();
        sort_and_truncate(&mut scored, self.options.suggestion_limit);
        scored
    }
}

// Stable sort keeps schema order among equal scores.
fn sort_and_truncate(scored: &mut Vec<Suggestion>, limit: usize) {
    scored.sort_by(|left, right| right.score.total_cmp(&left.score));
    scored.truncate(limit);
}

fn unqualified(table: &str) -> &str {
    table.rsplit_once('.').map_or(table, |(_, name)| name)
}

fn empty_record(
    index: usize,
    declared_table: Option<&str>,
    declared_column: Option<&str>,
    qualified_table: Option<String>,
    status: MappingStatus,
) -> MappingRecord {
    MappingRecord {
        declaration_index: index,
        declared_table: declared_table.map(str::to_owned),
        declared_column: declared_column.map(str::to_owned),
        qualified_table,
        resolved_table: None,
        resolved_column: None,
        column_type: None,
        status,
        suggestion: None,
        suggestions: Vec::new(),
        table_suggestions: Vec::new(),
    }
}
