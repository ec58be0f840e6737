//! Level tags: which row range of the canonical ordering each level owns.

use std::ops::Range;

use crate::error::HierarchyError;

/// One level's name and the contiguous row range it occupies in the
/// canonical series ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTag {
    name: String,
    start: usize,
    end: usize,
}

impl LevelTag {
    /// Level display name (`total`, `state_id`, `state_id/store_id`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row range of the level in canonical order.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of series in the level.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the level is empty (never true for validated tags).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// All level tags of a hierarchy, in canonical order: the synthetic
/// `total` level first, the bottom level last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTags {
    levels: Vec<LevelTag>,
}

impl LevelTags {
    /// Build tags from `(name, range)` pairs in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidTags`] when there are no levels,
    /// a range is empty, the ranges are not contiguous from row 0, or two
    /// levels share a name.
    pub fn new(levels: Vec<(String, Range<usize>)>) -> Result<Self, HierarchyError> {
        if levels.is_empty() {
            return Err(HierarchyError::InvalidTags {
                details: "at least one level is required".to_string(),
            });
        }

        let mut expected_start = 0usize;
        for (name, range) in &levels {
            if range.is_empty() {
                return Err(HierarchyError::InvalidTags {
                    details: format!("level '{name}' covers no rows"),
                });
            }
            if range.start != expected_start {
                return Err(HierarchyError::InvalidTags {
                    details: format!(
                        "level '{name}' starts at row {}, expected {expected_start}",
                        range.start
                    ),
                });
            }
            expected_start = range.end;
        }

        for i in 0..levels.len() {
            for j in (i + 1)..levels.len() {
                if levels[i].0 == levels[j].0 {
                    return Err(HierarchyError::InvalidTags {
                        details: format!("level name '{}' used twice", levels[i].0),
                    });
                }
            }
        }

        Ok(Self {
            levels: levels
                .into_iter()
                .map(|(name, range)| LevelTag {
                    name,
                    start: range.start,
                    end: range.end,
                })
                .collect(),
        })
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether there are no levels (never true for validated tags).
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate the levels in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelTag> {
        self.levels.iter()
    }

    /// Look up a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelTag> {
        self.levels.iter().find(|t| t.name == name)
    }

    /// The bottom (last, most disaggregate) level.
    pub fn bottom(&self) -> &LevelTag {
        // new() guarantees at least one level.
        &self.levels[self.levels.len() - 1]
    }

    /// Total number of rows covered by all levels.
    pub fn n_rows(&self) -> usize {
        self.levels.last().map(|t| t.end).unwrap_or(0)
    }
}
