//! Dense panels of aligned time series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, Axis, s};

use crate::error::IoError;

/// A dense panel of aligned time series.
///
/// Rows are series in a fixed order, columns are dates. The date vector is
/// strictly increasing and shared by every series, so row `i` column `j`
/// holds the value of `ids()[i]` at `dates()[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    ids: Vec<String>,
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
}

impl PanelFrame {
    /// Assemble a panel from ids, dates and a `(n_series, n_dates)` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] when the matrix shape does not
    /// agree with `ids`/`dates`, [`IoError::DuplicateSeries`] on repeated
    /// ids, and [`IoError::Validation`] when the dates are not strictly
    /// increasing.
    pub fn new(
        ids: Vec<String>,
        dates: Vec<NaiveDate>,
        values: Array2<f64>,
    ) -> Result<Self, IoError> {
        if values.nrows() != ids.len() {
            return Err(IoError::DimensionMismatch {
                name: "series".to_string(),
                expected: ids.len(),
                got: values.nrows(),
            });
        }
        if values.ncols() != dates.len() {
            return Err(IoError::DimensionMismatch {
                name: "dates".to_string(),
                expected: dates.len(),
                got: values.ncols(),
            });
        }

        let mut seen: BTreeMap<&str, ()> = BTreeMap::new();
        for id in &ids {
            if seen.insert(id.as_str(), ()).is_some() {
                return Err(IoError::DuplicateSeries { id: id.clone() });
            }
        }

        for (i, pair) in dates.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(IoError::Validation {
                    count: 1,
                    details: format!(
                        "dates must be strictly increasing ({} >= {} at index {})",
                        pair[0],
                        pair[1],
                        i + 1
                    ),
                });
            }
        }

        Ok(Self { ids, dates, values })
    }

    /// Series ids in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Shared date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The `(n_series, n_dates)` value matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of series (rows).
    pub fn n_series(&self) -> usize {
        self.ids.len()
    }

    /// Number of dates (columns).
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Row index of a series id, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    /// One series as a view.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_series()`.
    pub fn series(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Decompose into `(ids, dates, values)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<NaiveDate>, Array2<f64>) {
        (self.ids, self.dates, self.values)
    }

    /// Split each series' tail of length `horizon` into a test panel.
    ///
    /// Returns `(train, test)` where `test` holds the final `horizon` dates
    /// and `train` everything before them.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::BadHorizon`] when `horizon` is zero or does not
    /// leave at least one training observation.
    pub fn split_tail(&self, horizon: usize) -> Result<(PanelFrame, PanelFrame), IoError> {
        if horizon == 0 || horizon >= self.n_dates() {
            return Err(IoError::BadHorizon {
                horizon,
                len: self.n_dates(),
            });
        }
        let cut = self.n_dates() - horizon;
        let train = PanelFrame {
            ids: self.ids.clone(),
            dates: self.dates[..cut].to_vec(),
            values: self.values.slice(s![.., ..cut]).to_owned(),
        };
        let test = PanelFrame {
            ids: self.ids.clone(),
            dates: self.dates[cut..].to_vec(),
            values: self.values.slice(s![.., cut..]).to_owned(),
        };
        Ok((train, test))
    }

    /// Reorder rows to `order`, which must be a permutation of the panel's
    /// ids.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] when the lengths differ,
    /// [`IoError::UnknownSeries`] when `order` names an id the panel lacks,
    /// and [`IoError::DuplicateSeries`] when `order` repeats an id.
    pub fn reorder(&self, order: &[String]) -> Result<PanelFrame, IoError> {
        let perm = permutation(&self.ids, order)?;
        Ok(PanelFrame {
            ids: order.to_vec(),
            dates: self.dates.clone(),
            values: self.values.select(Axis(0), &perm),
        })
    }
}

/// Row permutation taking `current` to `order`.
///
/// `order` must name every id of `current` exactly once.
pub(crate) fn permutation(current: &[String], order: &[String]) -> Result<Vec<usize>, IoError> {
    if order.len() != current.len() {
        return Err(IoError::DimensionMismatch {
            name: "order".to_string(),
            expected: current.len(),
            got: order.len(),
        });
    }
    let index: BTreeMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut used = vec![false; current.len()];
    let mut perm = Vec::with_capacity(order.len());
    for id in order {
        let &i = index
            .get(id.as_str())
            .ok_or_else(|| IoError::UnknownSeries { id: id.clone() })?;
        if used[i] {
            return Err(IoError::DuplicateSeries { id: id.clone() });
        }
        used[i] = true;
        perm.push(i);
    }
    Ok(perm)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| date("2016-01-01") + chrono::Duration::days(i as i64))
            .collect()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_accepts_consistent_shape() {
        let frame = PanelFrame::new(
            ids(&["a", "b"]),
            dates(3),
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        )
        .unwrap();
        assert_eq!(frame.n_series(), 2);
        assert_eq!(frame.n_dates(), 3);
        assert_eq!(frame.series(1).to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(frame.position("b"), Some(1));
        assert_eq!(frame.position("zzz"), None);
    }

    #[test]
    fn new_rejects_row_mismatch() {
        let err = PanelFrame::new(ids(&["a"]), dates(2), array![[1.0, 2.0], [3.0, 4.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            IoError::DimensionMismatch { expected: 1, got: 2, .. }
        ));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = PanelFrame::new(ids(&["a", "a"]), dates(1), array![[1.0], [2.0]]).unwrap_err();
        assert!(matches!(err, IoError::DuplicateSeries { .. }));
    }

    #[test]
    fn new_rejects_unsorted_dates() {
        let mut ds = dates(3);
        ds.swap(0, 2);
        let err = PanelFrame::new(ids(&["a"]), ds, array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn split_tail_partitions_dates() {
        let frame = PanelFrame::new(
            ids(&["a", "b"]),
            dates(5),
            array![
                [1.0, 2.0, 3.0, 4.0, 5.0],
                [10.0, 20.0, 30.0, 40.0, 50.0]
            ],
        )
        .unwrap();
        let (train, test) = frame.split_tail(2).unwrap();
        assert_eq!(train.n_dates(), 3);
        assert_eq!(test.n_dates(), 2);
        assert_eq!(train.dates()[2], date("2016-01-03"));
        assert_eq!(test.dates()[0], date("2016-01-04"));
        assert_eq!(train.series(0).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(test.series(1).to_vec(), vec![40.0, 50.0]);
    }

    #[test]
    fn split_tail_rejects_zero_horizon() {
        let frame = PanelFrame::new(ids(&["a"]), dates(3), array![[1.0, 2.0, 3.0]]).unwrap();
        let err = frame.split_tail(0).unwrap_err();
        assert!(matches!(err, IoError::BadHorizon { horizon: 0, len: 3 }));
    }

    #[test]
    fn split_tail_rejects_horizon_consuming_everything() {
        let frame = PanelFrame::new(ids(&["a"]), dates(3), array![[1.0, 2.0, 3.0]]).unwrap();
        assert!(frame.split_tail(3).is_err());
        assert!(frame.split_tail(4).is_err());
        assert!(frame.split_tail(2).is_ok());
    }

    #[test]
    fn reorder_permutes_rows() {
        let frame = PanelFrame::new(
            ids(&["a", "b", "c"]),
            dates(2),
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
        )
        .unwrap();
        let reordered = frame.reorder(&ids(&["c", "a", "b"])).unwrap();
        assert_eq!(reordered.ids(), &["c", "a", "b"]);
        assert_eq!(reordered.series(0).to_vec(), vec![5.0, 6.0]);
        assert_eq!(reordered.series(1).to_vec(), vec![1.0, 2.0]);
        assert_eq!(reordered.dates(), frame.dates());
    }

    #[test]
    fn reorder_rejects_unknown_id() {
        let frame =
            PanelFrame::new(ids(&["a", "b"]), dates(1), array![[1.0], [2.0]]).unwrap();
        let err = frame.reorder(&ids(&["a", "zzz"])).unwrap_err();
        assert!(matches!(err, IoError::UnknownSeries { .. }));
    }

    #[test]
    fn reorder_rejects_duplicate_target() {
        let frame =
            PanelFrame::new(ids(&["a", "b"]), dates(1), array![[1.0], [2.0]]).unwrap();
        let err = frame.reorder(&ids(&["a", "a"])).unwrap_err();
        assert!(matches!(err, IoError::DuplicateSeries { .. }));
    }

    #[test]
    fn reorder_rejects_short_target() {
        let frame =
            PanelFrame::new(ids(&["a", "b"]), dates(1), array![[1.0], [2.0]]).unwrap();
        let err = frame.reorder(&ids(&["a"])).unwrap_err();
        assert!(matches!(err, IoError::DimensionMismatch { .. }));
    }
}
