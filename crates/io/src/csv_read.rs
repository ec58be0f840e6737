//! Low-level CSV parsing into [`SalesTable`].

use std::path::Path;

use chrono::NaiveDate;

use crate::error::IoError;
use crate::reader::ReaderConfig;
use crate::sales::SalesTable;

/// Parse a headered CSV file into a [`SalesTable`].
///
/// Row numbers in [`IoError::InvalidCell`] are 1-based data rows, the
/// header excluded.
pub(crate) fn read_csv(path: &Path, config: &ReaderConfig) -> Result<SalesTable, IoError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::MissingColumn {
                name: name.to_string(),
                path: path.to_path_buf(),
            })
    };

    let key_indices: Vec<usize> = config
        .key_columns()
        .iter()
        .map(|c| column(c))
        .collect::<Result<_, _>>()?;
    let item_index = column(config.item_column())?;
    let date_index = column(config.date_column())?;
    let target_index = column(config.target_column())?;

    let mut keys: Vec<Vec<String>> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for (r, record) in reader.records().enumerate() {
        let record = record?;
        let row = r + 1;
        let cell = |i: usize| record.get(i).unwrap_or("");

        keys.push(key_indices.iter().map(|&i| cell(i).to_string()).collect());
        items.push(cell(item_index).to_string());

        let date_raw = cell(date_index);
        let date = NaiveDate::parse_from_str(date_raw, config.date_format()).map_err(|_| {
            IoError::InvalidCell {
                row,
                column: config.date_column().to_string(),
                value: date_raw.to_string(),
            }
        })?;
        dates.push(date);

        let value_raw = cell(target_index);
        let value = value_raw
            .trim()
            .parse::<f64>()
            .map_err(|_| IoError::InvalidCell {
                row,
                column: config.target_column().to_string(),
                value: value_raw.to_string(),
            })?;
        values.push(value);
    }

    SalesTable::new(config.key_columns().to_vec(), keys, items, dates, values)
}
