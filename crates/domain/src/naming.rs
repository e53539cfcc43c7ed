//! Name normalization and similarity scoring for schema identifiers.

/// Normalizes a name for identity comparison.
///
/// Trims, collapses internal whitespace runs to one space and lowercases.
#[must_use]
pub fn normalize_exact(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a name for similarity scoring only.
///
/// Lowercases, drops every character outside `[a-z0-9_]` and whitespace,
/// then collapses whitespace and trims.
#[must_use]
pub fn normalize_fuzzy(value: &str) -> String {
    let kept: String = value
        .to_lowercase()
        .chars()
        .filter(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || *character == '_'
                || character.is_whitespace()
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Qualifies a table name with a schema prefix.
///
/// An explicit schema always wins. Otherwise a name already containing `.`
/// is kept as-is and a bare name gets `default_schema`.
#[must_use]
pub fn qualify_table_name(
    name: &str,
    explicit_schema: Option<&str>,
    default_schema: &str,
) -> String {
    let name = name.trim();
    match explicit_schema.map(str::trim).filter(|schema| !schema.is_empty()) {
        Some(schema) => format!("{schema}.{name}"),
        None if name.contains('.') => name.to_owned(),
        None => format!("{default_schema}.{name}"),
    }
}

/// Similarity ratio in `[0, 1]` between two names.
///
/// Computed as `1 - levenshtein / max_len` over the fuzzy-normalized
/// strings; two names that are both empty after normalization score `1`.
#[must_use]
pub fn similarity(left: &str, right: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize_fuzzy(left), &normalize_fuzzy(right))
}
