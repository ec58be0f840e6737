//! Hierarchy level specifications.

use crate::error::HierarchyError;

/// Ordered hierarchy specification: one entry per level, each naming the
/// key columns that define it, coarsest first. The final entry is the
/// bottom (most disaggregate) level, and every other level must draw its
/// columns from the bottom's columns so that its series are exact sums of
/// bottom series.
///
/// ```
/// use hermes_hierarchy::HierarchySpec;
///
/// let spec = HierarchySpec::new(vec![
///     vec!["state_id".to_string()],
///     vec!["state_id".to_string(), "store_id".to_string()],
/// ])
/// .unwrap();
/// assert_eq!(spec.bottom(), &["state_id", "store_id"]);
/// assert_eq!(HierarchySpec::level_name(spec.bottom()), "state_id/store_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchySpec {
    levels: Vec<Vec<String>>,
}

impl HierarchySpec {
    /// Build a spec from level column paths.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidSpec`] when there is no level, a
    /// level is empty or repeats a column, two levels are identical, or a
    /// non-bottom level uses a column the bottom level lacks.
    pub fn new(levels: Vec<Vec<String>>) -> Result<Self, HierarchyError> {
        let mut problems: Vec<String> = Vec::new();

        if levels.is_empty() {
            return Err(HierarchyError::InvalidSpec {
                details: "at least one level is required".to_string(),
            });
        }

        for (i, level) in levels.iter().enumerate() {
            if level.is_empty() {
                problems.push(format!("level {} is empty", i + 1));
                continue;
            }
            let mut sorted = level.clone();
            sorted.sort_unstable();
            for pair in sorted.windows(2) {
                if pair[0] == pair[1] {
                    problems.push(format!("level {} repeats column '{}'", i + 1, pair[0]));
                }
            }
        }

        for i in 0..levels.len() {
            for j in (i + 1)..levels.len() {
                if levels[i] == levels[j] {
                    problems.push(format!("levels {} and {} are identical", i + 1, j + 1));
                }
            }
        }

        if let Some(bottom) = levels.last() {
            for level in &levels[..levels.len() - 1] {
                for column in level {
                    if !bottom.contains(column) {
                        problems.push(format!(
                            "column '{column}' is not part of the bottom level"
                        ));
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(Self { levels })
        } else {
            problems.dedup();
            Err(HierarchyError::InvalidSpec {
                details: problems.join("; "),
            })
        }
    }

    /// All level column paths, coarsest first.
    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    /// Columns of the bottom (most disaggregate) level.
    pub fn bottom(&self) -> &[String] {
        // new() guarantees at least one level.
        &self.levels[self.levels.len() - 1]
    }

    /// Number of levels (the bottom included, the synthetic total not).
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Display name of a level: its columns joined with `/`.
    pub fn level_name(level: &[String]) -> String {
        level.join("/")
    }

    /// Check that every referenced column appears in `available`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownColumn`] naming the first column
    /// that is missing.
    pub fn check_columns(&self, available: &[String]) -> Result<(), HierarchyError> {
        for level in &self.levels {
            for column in level {
                if !available.contains(column) {
                    return Err(HierarchyError::UnknownColumn {
                        name: column.clone(),
                        available: available.join(", "),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_accepts_nested_levels() {
        let spec = HierarchySpec::new(vec![
            cols(&["state_id"]),
            cols(&["state_id", "store_id"]),
        ])
        .unwrap();
        assert_eq!(spec.n_levels(), 2);
        assert_eq!(spec.bottom(), &["state_id", "store_id"]);
    }

    #[test]
    fn new_accepts_single_bottom_level() {
        let spec = HierarchySpec::new(vec![cols(&["store_id"])]).unwrap();
        assert_eq!(spec.levels(), &[cols(&["store_id"])]);
    }

    #[test]
    fn new_accepts_crossed_grouping() {
        // A non-prefix aggregate level is allowed; nesting is checked later
        // on the summing matrix, not here.
        let spec = HierarchySpec::new(vec![
            cols(&["state_id"]),
            cols(&["store_id"]),
            cols(&["state_id", "store_id"]),
        ]);
        assert!(spec.is_ok());
    }

    #[test]
    fn new_rejects_no_levels() {
        let err = HierarchySpec::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("at least one level"));
    }

    #[test]
    fn new_rejects_empty_level() {
        let err = HierarchySpec::new(vec![cols(&["state_id"]), vec![]]).unwrap_err();
        assert!(err.to_string().contains("level 2 is empty"));
    }

    #[test]
    fn new_rejects_repeated_column_within_level() {
        let err = HierarchySpec::new(vec![cols(&["state_id", "state_id"])]).unwrap_err();
        assert!(err.to_string().contains("repeats column 'state_id'"));
    }

    #[test]
    fn new_rejects_duplicate_levels() {
        let err = HierarchySpec::new(vec![cols(&["state_id"]), cols(&["state_id"])]).unwrap_err();
        assert!(err.to_string().contains("identical"));
    }

    #[test]
    fn new_rejects_column_outside_bottom() {
        let err = HierarchySpec::new(vec![
            cols(&["region"]),
            cols(&["state_id", "store_id"]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("'region' is not part of the bottom level"));
    }

    #[test]
    fn check_columns_accepts_known() {
        let spec = HierarchySpec::new(vec![cols(&["state_id"])]).unwrap();
        assert!(spec.check_columns(&cols(&["state_id", "store_id"])).is_ok());
    }

    #[test]
    fn check_columns_rejects_unknown() {
        let spec = HierarchySpec::new(vec![cols(&["state_id"])]).unwrap();
        let err = spec.check_columns(&cols(&["store_id"])).unwrap_err();
        match err {
            HierarchyError::UnknownColumn { name, available } => {
                assert_eq!(name, "state_id");
                assert_eq!(available, "store_id");
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn level_name_joins_columns() {
        assert_eq!(HierarchySpec::level_name(&cols(&["a", "b"])), "a/b");
        assert_eq!(HierarchySpec::level_name(&cols(&["a"])), "a");
    }
}
