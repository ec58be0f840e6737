//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use chrono::{Duration, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;
use crate::reader::ReaderConfig;
use crate::sales::SalesTable;

/// Date column storage variants accepted by the reader.
enum DateColumn<'a> {
    /// Arrow `Date32`: days since the Unix epoch.
    Days(&'a arrow::array::PrimitiveArray<Date32Type>),
    /// `Utf8` cells parsed with the configured date format.
    Text(&'a StringArray),
}

/// Target column storage variants accepted by the reader.
enum TargetColumn<'a> {
    Float(&'a arrow::array::PrimitiveArray<Float64Type>),
    Int(&'a arrow::array::PrimitiveArray<Int64Type>),
}

/// Read a Parquet file into a [`SalesTable`].
///
/// Row numbers in [`IoError::InvalidCell`] are 1-based and run across all
/// record batches.
pub(crate) fn read_parquet(path: &Path, config: &ReaderConfig) -> Result<SalesTable, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;

    let mut keys: Vec<Vec<String>> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    let mut row = 0usize;
    for batch in &batches {
        let schema = batch.schema_ref();
        let locate = |name: &str| -> Result<usize, IoError> {
            schema
                .column_with_name(name)
                .map(|(i, _)| i)
                .ok_or_else(|| IoError::MissingColumn {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                })
        };

        let key_arrays = config
            .key_columns()
            .iter()
            .map(|name| string_column(batch.column(locate(name)?), name))
            .collect::<Result<Vec<_>, _>>()?;
        let item_array = string_column(batch.column(locate(config.item_column())?), config.item_column())?;
        let date_array = date_column(batch.column(locate(config.date_column())?), config.date_column())?;
        let target_array =
            target_column(batch.column(locate(config.target_column())?), config.target_column())?;

        for r in 0..batch.num_rows() {
            row += 1;

            let mut key = Vec::with_capacity(key_arrays.len());
            for (array, name) in key_arrays.iter().zip(config.key_columns()) {
                key.push(string_cell(array, r, row, name)?);
            }
            keys.push(key);
            items.push(string_cell(item_array, r, row, config.item_column())?);
            dates.push(date_cell(&date_array, r, row, config)?);
            values.push(target_cell(&target_array, r, row, config.target_column())?);
        }
    }

    SalesTable::new(config.key_columns().to_vec(), keys, items, dates, values)
}

fn string_column<'a>(array: &'a dyn Array, name: &str) -> Result<&'a StringArray, IoError> {
    array.as_string_opt::<i32>().ok_or_else(|| IoError::Validation {
        count: 1,
        details: format!(
            "column '{name}' must be Utf8, got {:?}",
            array.data_type()
        ),
    })
}

fn date_column<'a>(array: &'a dyn Array, name: &str) -> Result<DateColumn<'a>, IoError> {
    match array.data_type() {
        DataType::Date32 => Ok(DateColumn::Days(array.as_primitive::<Date32Type>())),
        DataType::Utf8 => Ok(DateColumn::Text(string_column(array, name)?)),
        other => Err(IoError::Validation {
            count: 1,
            details: format!("column '{name}' must be Date32 or Utf8, got {other:?}"),
        }),
    }
}

fn target_column<'a>(array: &'a dyn Array, name: &str) -> Result<TargetColumn<'a>, IoError> {
    match array.data_type() {
        DataType::Float64 => Ok(TargetColumn::Float(array.as_primitive::<Float64Type>())),
        DataType::Int64 => Ok(TargetColumn::Int(array.as_primitive::<Int64Type>())),
        other => Err(IoError::Validation {
            count: 1,
            details: format!("column '{name}' must be Float64 or Int64, got {other:?}"),
        }),
    }
}

fn string_cell(
    array: &StringArray,
    index: usize,
    row: usize,
    column: &str,
) -> Result<String, IoError> {
    if array.is_null(index) {
        return Err(null_cell(row, column));
    }
    Ok(array.value(index).to_string())
}

fn date_cell(
    column: &DateColumn<'_>,
    index: usize,
    row: usize,
    config: &ReaderConfig,
) -> Result<NaiveDate, IoError> {
    match column {
        DateColumn::Days(array) => {
            if array.is_null(index) {
                return Err(null_cell(row, config.date_column()));
            }
            let days = array.value(index);
            date_from_days(days).ok_or_else(|| IoError::InvalidCell {
                row,
                column: config.date_column().to_string(),
                value: days.to_string(),
            })
        }
        DateColumn::Text(array) => {
            if array.is_null(index) {
                return Err(null_cell(row, config.date_column()));
            }
            let raw = array.value(index);
            NaiveDate::parse_from_str(raw, config.date_format()).map_err(|_| {
                IoError::InvalidCell {
                    row,
                    column: config.date_column().to_string(),
                    value: raw.to_string(),
                }
            })
        }
    }
}

fn target_cell(
    column: &TargetColumn<'_>,
    index: usize,
    row: usize,
    name: &str,
) -> Result<f64, IoError> {
    match column {
        TargetColumn::Float(array) => {
            if array.is_null(index) {
                return Err(null_cell(row, name));
            }
            Ok(array.value(index))
        }
        TargetColumn::Int(array) => {
            if array.is_null(index) {
                return Err(null_cell(row, name));
            }
            Ok(array.value(index) as f64)
        }
    }
}

fn null_cell(row: usize, column: &str) -> IoError {
    IoError::InvalidCell {
        row,
        column: column.to_string(),
        value: "null".to_string(),
    }
}

/// Convert Arrow `Date32` days-since-epoch to a calendar date.
fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(i64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_from_days_epoch() {
        assert_eq!(
            date_from_days(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
    }

    #[test]
    fn date_from_days_positive_and_negative() {
        assert_eq!(
            date_from_days(16801),
            NaiveDate::from_ymd_opt(2016, 1, 1)
        );
        assert_eq!(
            date_from_days(-1),
            NaiveDate::from_ymd_opt(1969, 12, 31)
        );
    }
}
