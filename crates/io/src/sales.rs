//! Long-format sales observations.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::IoError;

/// Long-format sales observations, one row per (hierarchy keys, item, date).
///
/// Storage is column-wise: `keys()[r]` holds one value per hierarchy column
/// (outermost level first) and `items()[r]`, `dates()[r]`, `values()[r]`
/// complete row `r`. Rows are kept in file order; aggregation into aligned
/// series happens downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    /// Hierarchy key column names, outermost level first.
    key_columns: Vec<String>,
    /// Per-row hierarchy key values, one entry per key column.
    keys: Vec<Vec<String>>,
    /// Per-row item id.
    items: Vec<String>,
    /// Per-row observation date.
    dates: Vec<NaiveDate>,
    /// Per-row observed value.
    values: Vec<f64>,
}

impl SalesTable {
    /// Assemble a table from parallel columns.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] when the columns disagree in
    /// length, and [`IoError::Validation`] when `key_columns` is empty, a
    /// row's key arity differs from `key_columns`, or a value is non-finite.
    pub fn new(
        key_columns: Vec<String>,
        keys: Vec<Vec<String>>,
        items: Vec<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, IoError> {
        if key_columns.is_empty() {
            return Err(IoError::Validation {
                count: 1,
                details: "at least one hierarchy key column is required".to_string(),
            });
        }

        let n = keys.len();
        for (name, len) in [
            ("items", items.len()),
            ("dates", dates.len()),
            ("values", values.len()),
        ] {
            if len != n {
                return Err(IoError::DimensionMismatch {
                    name: name.to_string(),
                    expected: n,
                    got: len,
                });
            }
        }

        let mut problems: Vec<String> = Vec::new();
        for (r, key) in keys.iter().enumerate() {
            if key.len() != key_columns.len() {
                problems.push(format!(
                    "row {}: expected {} key value(s), got {}",
                    r + 1,
                    key_columns.len(),
                    key.len()
                ));
            }
        }
        for (r, v) in values.iter().enumerate() {
            if !v.is_finite() {
                problems.push(format!("row {}: non-finite value {v}", r + 1));
            }
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }

        Ok(Self {
            key_columns,
            keys,
            items,
            dates,
            values,
        })
    }

    /// Number of observation rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Hierarchy key column names, outermost level first.
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Per-row hierarchy key values.
    pub fn keys(&self) -> &[Vec<String>] {
        &self.keys
    }

    /// Per-row item ids.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Per-row observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Per-row observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Distinct item ids in first-appearance order.
    pub fn item_ids(&self) -> Vec<String> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut ids = Vec::new();
        for item in &self.items {
            if seen.insert(item.as_str()) {
                ids.push(item.clone());
            }
        }
        ids
    }

    /// Rows belonging to a single item, in original order.
    ///
    /// The result is empty when the item does not occur in the table.
    pub fn filter_item(&self, item: &str) -> SalesTable {
        let mut keys = Vec::new();
        let mut items = Vec::new();
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for r in 0..self.len() {
            if self.items[r] == item {
                keys.push(self.keys[r].clone());
                items.push(self.items[r].clone());
                dates.push(self.dates[r]);
                values.push(self.values[r]);
            }
        }
        SalesTable {
            key_columns: self.key_columns.clone(),
            keys,
            items,
            dates,
            values,
        }
    }
}
