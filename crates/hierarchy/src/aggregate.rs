//! Aggregation of long-format sales into an aligned hierarchy.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use chrono::NaiveDate;
use ndarray::{Array2, Axis};
use tracing::info;

use hermes_io::{PanelFrame, SalesTable};

use crate::error::HierarchyError;
use crate::nested::is_strictly_nested;
use crate::spec::HierarchySpec;
use crate::summing::SummingMatrix;
use crate::tags::LevelTags;

/// Separator between key values in a series id.
const ID_SEPARATOR: &str = "/";

/// Id and level name of the synthetic grand total.
const ROOT: &str = "total";

/// An aggregated hierarchy: the aligned panel of every series in canonical
/// order (total first, then each level top to bottom, lexicographic within
/// a level), the summing matrix mapping bottom series to all rows, and the
/// level tags naming each row range.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    frame: PanelFrame,
    summing: SummingMatrix,
    tags: LevelTags,
}

impl Hierarchy {
    /// Bundle a panel, summing matrix and tags, checking that the three
    /// agree on the number of series.
    pub fn new(
        frame: PanelFrame,
        summing: SummingMatrix,
        tags: LevelTags,
    ) -> Result<Self, HierarchyError> {
        if summing.n_total() != frame.n_series() {
            return Err(HierarchyError::InvalidSumming {
                details: format!(
                    "summing matrix has {} rows for {} series",
                    summing.n_total(),
                    frame.n_series()
                ),
            });
        }
        if tags.n_rows() != frame.n_series() {
            return Err(HierarchyError::InvalidTags {
                details: format!(
                    "tags cover {} rows for {} series",
                    tags.n_rows(),
                    frame.n_series()
                ),
            });
        }
        if tags.bottom().len() != summing.n_bottom() {
            return Err(HierarchyError::InvalidTags {
                details: format!(
                    "bottom tag covers {} rows, summing matrix has {} bottom series",
                    tags.bottom().len(),
                    summing.n_bottom()
                ),
            });
        }
        Ok(Self {
            frame,
            summing,
            tags,
        })
    }

    /// The aligned panel, one row per series in canonical order.
    pub fn frame(&self) -> &PanelFrame {
        &self.frame
    }

    /// The summing matrix.
    pub fn summing(&self) -> &SummingMatrix {
        &self.summing
    }

    /// The level tags.
    pub fn tags(&self) -> &LevelTags {
        &self.tags
    }

    /// Ids of the bottom series, in canonical order.
    pub fn bottom_ids(&self) -> &[String] {
        &self.frame.ids()[self.summing.bottom_range()]
    }

    /// Ids of one level's series, if the level exists.
    pub fn level_ids(&self, name: &str) -> Option<&[String]> {
        self.tags.get(name).map(|tag| &self.frame.ids()[tag.range()])
    }

    /// Whether every level partitions the bottom series into nested groups.
    pub fn is_strictly_nested(&self) -> bool {
        is_strictly_nested(&self.summing, &self.tags)
    }

    /// Replace the panel, keeping summing matrix and tags.
    ///
    /// Used when splitting a hierarchy's panel into train and test: the
    /// structure is unchanged, only the date axis shrinks.
    pub fn with_frame(&self, frame: PanelFrame) -> Result<Self, HierarchyError> {
        Hierarchy::new(frame, self.summing.clone(), self.tags.clone())
    }
}

// ---------------------------------------------------------------------------

/// Aggregate a long-format sales table into an aligned [`Hierarchy`].
///
/// Bottom series are the distinct combinations of the spec's bottom-level
/// key values, observed on the union of all dates in the table; a date
/// with no row for a combination counts as zero demand, and duplicate rows
/// for the same (combination, date) are summed. Every coarser level is the
/// sum of the bottom series whose key values match on the level's columns,
/// and a synthetic grand total named `total` sits on top.
///
/// Series ids join key values with `/`, so key values must not contain
/// that character.
///
/// # Errors
///
/// Returns an error when the table is empty, a spec column is missing from
/// the table's key columns, or a key value contains the id separator.
pub fn aggregate(
    table: &SalesTable,
    spec: &HierarchySpec,
) -> Result<Hierarchy, HierarchyError> {
    if table.is_empty() {
        return Err(HierarchyError::EmptyTable);
    }
    spec.check_columns(table.key_columns())?;
    let bottom_positions = column_positions(spec.bottom(), table.key_columns())?;

    // Sum rows into (combination, date) cells. BTreeMap ordering gives the
    // canonical lexicographic layout for free.
    let mut cells: BTreeMap<Vec<String>, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    let mut date_set: BTreeSet<NaiveDate> = BTreeSet::new();
    for r in 0..table.len() {
        let key = &table.keys()[r];
        let combo: Vec<String> = bottom_positions.iter().map(|&p| key[p].clone()).collect();
        for (k, value) in combo.iter().enumerate() {
            if value.contains(ID_SEPARATOR) {
                return Err(HierarchyError::SeparatorInKey {
                    column: spec.bottom()[k].clone(),
                    value: value.clone(),
                });
            }
        }
        date_set.insert(table.dates()[r]);
        *cells
            .entry(combo)
            .or_default()
            .entry(table.dates()[r])
            .or_insert(0.0) += table.values()[r];
    }

    let dates: Vec<NaiveDate> = date_set.into_iter().collect();
    let n_dates = dates.len();
    let n_bottom = cells.len();

    let mut bottom_combos: Vec<Vec<String>> = Vec::with_capacity(n_bottom);
    let mut bottom = Array2::<f64>::zeros((n_bottom, n_dates));
    for (b, (combo, series)) in cells.into_iter().enumerate() {
        for (t, date) in dates.iter().enumerate() {
            // A date with no row for this combination is zero demand.
            if let Some(&v) = series.get(date) {
                bottom[[b, t]] = v;
            }
        }
        bottom_combos.push(combo);
    }

    // Group bottom series per level by projecting each combination onto
    // the level's columns. The bottom level projects onto itself, so its
    // groups are singletons and its summing block is the identity.
    let mut level_groups: Vec<(String, BTreeMap<Vec<String>, Vec<usize>>)> =
        Vec::with_capacity(spec.n_levels());
    for level in spec.levels() {
        let positions = column_positions(level, spec.bottom())?;
        let mut groups: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
        for (b, combo) in bottom_combos.iter().enumerate() {
            let key: Vec<String> = positions.iter().map(|&p| combo[p].clone()).collect();
            groups.entry(key).or_default().push(b);
        }
        level_groups.push((HierarchySpec::level_name(level), groups));
    }

    let n_rows = 1 + level_groups.iter().map(|(_, g)| g.len()).sum::<usize>();
    let mut ids: Vec<String> = Vec::with_capacity(n_rows);
    let mut s = Array2::<f64>::zeros((n_rows, n_bottom));
    let mut values = Array2::<f64>::zeros((n_rows, n_dates));
    let mut ranges: Vec<(String, Range<usize>)> = Vec::with_capacity(level_groups.len() + 1);

    ids.push(ROOT.to_string());
    s.row_mut(0).fill(1.0);
    values.row_mut(0).assign(&bottom.sum_axis(Axis(0)));
    ranges.push((ROOT.to_string(), 0..1));

    let mut next = 1;
    for (name, groups) in level_groups {
        let start = next;
        for (key, members) in groups {
            ids.push(key.join(ID_SEPARATOR));
            for b in members {
                s[[next, b]] = 1.0;
                values.row_mut(next).scaled_add(1.0, &bottom.row(b));
            }
            next += 1;
        }
        ranges.push((name, start..next));
    }

    let frame = PanelFrame::new(ids, dates, values)?;
    let summing = SummingMatrix::new(s)?;
    let tags = LevelTags::new(ranges)?;
    let hierarchy = Hierarchy::new(frame, summing, tags)?;

    info!(
        n_series = n_rows,
        n_bottom,
        n_dates,
        levels = hierarchy.tags().len(),
        "aggregated sales into hierarchy"
    );
    Ok(hierarchy)
}

fn column_positions(
    columns: &[String],
    within: &[String],
) -> Result<Vec<usize>, HierarchyError> {
    columns
        .iter()
        .map(|name| {
            within
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| HierarchyError::UnknownColumn {
                    name: name.clone(),
                    available: within.join(", "),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn two_series_frame() -> PanelFrame {
        PanelFrame::new(
            vec!["total".to_string(), "CA".to_string()],
            vec![date("2016-01-01"), date("2016-01-02")],
            array![[3.0, 4.0], [3.0, 4.0]],
        )
        .unwrap()
    }

    #[test]
    fn hierarchy_new_accepts_consistent_parts() {
        let summing = SummingMatrix::new(array![[1.0], [1.0]]).unwrap();
        let tags = LevelTags::new(vec![
            ("total".to_string(), 0..1),
            ("state_id".to_string(), 1..2),
        ])
        .unwrap();
        let hierarchy = Hierarchy::new(two_series_frame(), summing, tags).unwrap();
        assert_eq!(hierarchy.bottom_ids(), &["CA"]);
        assert_eq!(hierarchy.level_ids("state_id"), Some(&["CA".to_string()][..]));
        assert_eq!(hierarchy.level_ids("missing"), None);
    }

    #[test]
    fn hierarchy_new_rejects_summing_row_mismatch() {
        let summing =
            SummingMatrix::new(array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let tags = LevelTags::new(vec![
            ("total".to_string(), 0..1),
            ("state_id".to_string(), 1..3),
        ])
        .unwrap();
        let err = Hierarchy::new(two_series_frame(), summing, tags).unwrap_err();
        assert!(err.to_string().contains("3 rows for 2 series"));
    }

    #[test]
    fn hierarchy_new_rejects_tag_mismatch() {
        let summing = SummingMatrix::new(array![[1.0], [1.0]]).unwrap();
        let tags = LevelTags::new(vec![("total".to_string(), 0..1)]).unwrap();
        let err = Hierarchy::new(two_series_frame(), summing, tags).unwrap_err();
        assert!(err.to_string().contains("tags cover 1 rows for 2 series"));
    }

    #[test]
    fn column_positions_reports_unknown_column() {
        let err = column_positions(
            &["store_id".to_string()],
            &["state_id".to_string(), "region".to_string()],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "hierarchy column 'store_id' not found among key columns [state_id, region]"
        );
    }
}
