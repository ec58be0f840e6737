//! Forecast frame persistence as long-format CSV.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;
use ndarray::Array2;

use crate::error::IoError;
use crate::forecast::ForecastFrame;

/// Fixed leading columns of the forecast CSV layout.
const LEAD_COLUMNS: [&str; 3] = ["seed", "unique_id", "ds"];

/// Write forecast frames to `path` as long-format CSV.
///
/// The layout is one row per (seed, series, step): the `seed,unique_id,ds`
/// triple followed by the frames' value columns. All frames must share ids,
/// dates and column names; the seed column distinguishes them. NaN cells
/// are written empty.
///
/// # Errors
///
/// Returns [`IoError::Validation`] when `frames` is empty or the frames
/// disagree on their grid or columns, and [`IoError::Csv`] /
/// [`IoError::Io`] on write failures.
pub fn write_forecast_csv(path: &Path, frames: &[ForecastFrame]) -> Result<(), IoError> {
    let first = frames.first().ok_or_else(|| IoError::Validation {
        count: 1,
        details: "cannot write an empty set of forecast frames".to_string(),
    })?;
    let names: Vec<&str> = first.column_names().collect();

    for frame in &frames[1..] {
        let detail = if frame.ids() != first.ids() {
            Some("series ids differ")
        } else if frame.dates() != first.dates() {
            Some("dates differ")
        } else if frame.column_names().collect::<Vec<_>>() != names {
            Some("column names differ")
        } else {
            None
        };
        if let Some(detail) = detail {
            return Err(IoError::Validation {
                count: 1,
                details: format!("forecast frames disagree: {detail}"),
            });
        }
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = LEAD_COLUMNS.to_vec();
    header.extend(names.iter().copied());
    writer.write_record(&header)?;

    for frame in frames {
        let seed = frame.seed().map(|s| s.to_string()).unwrap_or_default();
        for (i, id) in frame.ids().iter().enumerate() {
            for (j, date) in frame.dates().iter().enumerate() {
                let mut record: Vec<String> = Vec::with_capacity(3 + names.len());
                record.push(seed.clone());
                record.push(id.clone());
                record.push(date.to_string());
                for (_, matrix) in frame.columns() {
                    record.push(format_cell(matrix[[i, j]]));
                }
                writer.write_record(&record)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Read forecast frames back from a CSV written by [`write_forecast_csv`].
///
/// Returns one frame per distinct seed, in first-appearance order. Within a
/// frame, series keep their first-appearance order and dates are sorted
/// ascending; every (series, date) cell must be present exactly once.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] / [`IoError::EmptyTable`] for missing
/// input, [`IoError::InvalidCell`] on unparseable cells, and
/// [`IoError::Validation`] for layout problems (wrong leading columns,
/// incomplete or duplicated grid cells).
pub fn read_forecast_csv(path: &Path) -> Result<Vec<ForecastFrame>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    for (i, expected) in LEAD_COLUMNS.iter().enumerate() {
        if headers.get(i) != Some(*expected) {
            return Err(IoError::Validation {
                count: 1,
                details: format!(
                    "expected leading columns {}, got '{}'",
                    LEAD_COLUMNS.join(","),
                    headers.iter().take(3).collect::<Vec<_>>().join(",")
                ),
            });
        }
    }
    let names: Vec<String> = headers.iter().skip(3).map(str::to_string).collect();

    // Raw rows grouped by seed, preserving first-appearance seed order.
    let mut groups: Vec<(Option<u64>, Vec<RawRow>)> = Vec::new();

    for (r, record) in reader.records().enumerate() {
        let record = record?;
        let row = r + 1;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let seed_raw = cell(0);
        let seed = if seed_raw.is_empty() {
            None
        } else {
            Some(seed_raw.parse::<u64>().map_err(|_| IoError::InvalidCell {
                row,
                column: "seed".to_string(),
                value: seed_raw.to_string(),
            })?)
        };

        let id = cell(1).to_string();

        let ds_raw = cell(2);
        let ds = NaiveDate::parse_from_str(ds_raw, "%Y-%m-%d").map_err(|_| {
            IoError::InvalidCell {
                row,
                column: "ds".to_string(),
                value: ds_raw.to_string(),
            }
        })?;

        let mut values = Vec::with_capacity(names.len());
        for (k, name) in names.iter().enumerate() {
            let raw = cell(3 + k);
            if raw.is_empty() {
                values.push(f64::NAN);
            } else {
                values.push(raw.parse::<f64>().map_err(|_| IoError::InvalidCell {
                    row,
                    column: name.clone(),
                    value: raw.to_string(),
                })?);
            }
        }

        match groups.iter_mut().find(|(s, _)| *s == seed) {
            Some((_, rows)) => rows.push((id, ds, values)),
            None => groups.push((seed, vec![(id, ds, values)])),
        }
    }

    if groups.is_empty() {
        return Err(IoError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    groups
        .into_iter()
        .map(|(seed, rows)| assemble_frame(seed, rows, &names))
        .collect()
}

type RawRow = (String, NaiveDate, Vec<f64>);

/// Rebuild one frame from the raw rows of a single seed group.
fn assemble_frame(
    seed: Option<u64>,
    rows: Vec<RawRow>,
    names: &[String],
) -> Result<ForecastFrame, IoError> {
    let mut ids: Vec<String> = Vec::new();
    let mut id_index: BTreeMap<String, usize> = BTreeMap::new();
    let mut date_set: BTreeSet<NaiveDate> = BTreeSet::new();
    for (id, ds, _) in &rows {
        if !id_index.contains_key(id) {
            id_index.insert(id.clone(), ids.len());
            ids.push(id.clone());
        }
        date_set.insert(*ds);
    }
    let dates: Vec<NaiveDate> = date_set.into_iter().collect();
    let date_index: BTreeMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(j, d)| (*d, j)).collect();

    let expected = ids.len() * dates.len();
    if rows.len() != expected {
        let seed_label = seed.map(|s| s.to_string()).unwrap_or_else(|| "none".into());
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "seed {seed_label}: expected {expected} rows ({} series x {} steps), got {}",
                ids.len(),
                dates.len(),
                rows.len()
            ),
        });
    }

    let mut matrices: Vec<Array2<f64>> = names
        .iter()
        .map(|_| Array2::from_elem((ids.len(), dates.len()), f64::NAN))
        .collect();
    let mut seen = vec![false; expected];
    for (id, ds, values) in rows {
        let i = id_index[&id];
        let j = date_index[&ds];
        let flat = i * dates.len() + j;
        if seen[flat] {
            return Err(IoError::Validation {
                count: 1,
                details: format!("duplicate row for series '{id}' at {ds}"),
            });
        }
        seen[flat] = true;
        for (matrix, v) in matrices.iter_mut().zip(values) {
            matrix[[i, j]] = v;
        }
    }

    let mut frame = ForecastFrame::new(ids, dates)?;
    if let Some(s) = seed {
        frame = frame.with_seed(s);
    }
    for (name, matrix) in names.iter().zip(matrices) {
        frame.push_column(name.clone(), matrix)?;
    }
    Ok(frame)
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v}")
    }
}
