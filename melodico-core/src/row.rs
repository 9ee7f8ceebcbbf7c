use std::collections::BTreeMap;

use crate::value::Value;

/// Columns applied to a row during one imputation pass, in column order.
pub type ChangeSet = BTreeMap<String, Value>;

/// One record of the tabular dataset being enriched.
///
/// Rows are cheap value objects: enrichment never mutates a row in place but
/// derives a new one together with the set of columns that actually changed
/// (see [`apply_derived`]).
///
/// # Examples
/// ```
/// use melodico_core::{Row, Value};
///
/// let row = Row::from_pairs([("gender", Value::Null), ("name", Value::from("Ghali"))]);
/// assert!(row.is_missing("gender"));
/// assert!(!row.is_missing("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    /// Construct an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a row from `(column, value)` pairs.
    pub fn from_pairs<C, I>(pairs: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = (C, Value)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }

    /// Borrow the value stored under `column`, when the column exists.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Report whether the row has a cell for `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Report whether `column` needs imputation.
    ///
    /// An absent column counts as missing, the same as a null cell.
    #[must_use]
    pub fn is_missing(&self, column: &str) -> bool {
        self.values.get(column).is_none_or(Value::is_missing)
    }

    /// Store `value` under `column`, replacing any existing cell.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Iterate over the row's `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(column, value)| (column.as_str(), value))
    }
}

/// Derive a new row by applying `derived` column values under the conflict
/// policy.
///
/// A column is written iff `overwrite_existing` is enabled or the current
/// cell is missing; every column actually written is reported in the
/// returned [`ChangeSet`]. Derived values that are themselves missing are
/// never applied. The input row is left untouched.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use melodico_core::{Row, Value, apply_derived};
///
/// let row = Row::from_pairs([("gender", Value::Null), ("region", Value::from("Lazio"))]);
/// let derived = BTreeMap::from([
///     ("gender".to_owned(), Value::from("M")),
///     ("region".to_owned(), Value::from("Lombardia")),
/// ]);
/// let (updated, applied) = apply_derived(&row, &derived, false);
///
/// assert_eq!(updated.get("gender"), Some(&Value::from("M")));
/// assert_eq!(updated.get("region"), Some(&Value::from("Lazio")));
/// assert_eq!(applied.len(), 1);
/// ```
#[must_use]
pub fn apply_derived(
    row: &Row,
    derived: &BTreeMap<String, Value>,
    overwrite_existing: bool,
) -> (Row, ChangeSet) {
    let mut updated = row.clone();
    let mut applied = ChangeSet::new();
    for (column, value) in derived {
        if value.is_missing() {
            continue;
        }
        if overwrite_existing || row.is_missing(column) {
            updated.insert(column.clone(), value.clone());
            applied.insert(column.clone(), value.clone());
        }
    }
    (updated, applied)
}

/// An ordered tabular dataset: a column list plus its rows.
///
/// The column list preserves the source file's order so an enriched dataset
/// can be written back with the original shape; columns discovered during
/// enrichment are appended at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Construct a dataset from a column list and rows.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// The dataset's columns, in output order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The dataset's rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the dataset holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append `column` to the column list when not already present.
    pub fn ensure_column(&mut self, column: &str) {
        if !self.columns.iter().any(|existing| existing == column) {
            self.columns.push(column.to_owned());
        }
    }

    /// Replace the row at `index`, registering any new columns.
    ///
    /// Out-of-range indices are ignored.
    pub fn replace_row(&mut self, index: usize, row: Row) {
        let new_columns: Vec<String> = row
            .iter()
            .filter(|&(column, _)| !self.columns.iter().any(|existing| existing == column))
            .map(|(column, _)| column.to_owned())
            .collect();
        for column in new_columns {
            self.columns.push(column);
        }
        if let Some(slot) = self.rows.get_mut(index) {
            *slot = row;
        }
    }
}
