//! Strict-nesting check on a summing matrix.

use std::collections::BTreeSet;

use crate::summing::SummingMatrix;
use crate::tags::LevelTags;

/// Whether the hierarchy is strictly nested: every aggregation level
/// partitions the bottom series, and each partition refines the one
/// above it. Grouped structures that cross two attributes (say store by
/// state and store by category over the same bottom) are not nested.
///
/// The check walks every bottom series upward, recording which row of
/// each coarser level it maps into. The hierarchy is strictly nested
/// exactly when the number of distinct paths equals the number of rows
/// of the finest non-bottom level.
pub fn is_strictly_nested(summing: &SummingMatrix, tags: &LevelTags) -> bool {
    let mut levels: Vec<_> = tags.iter().collect();
    // Fewer than two levels cannot cross anything.
    if levels.len() < 2 {
        return true;
    }
    // Coarse to fine; the stable sort keeps the bottom level last among
    // ties on length.
    levels.sort_by_key(|tag| tag.len());
    let bottom = match levels.pop() {
        Some(tag) => tag,
        None => return true,
    };

    let s = summing.values();
    let mut paths = BTreeSet::new();
    for j in 0..summing.n_bottom() {
        let mut path = Vec::with_capacity(levels.len());
        for tag in &levels {
            // First maximum within the level's rows, like an argmax over
            // the column slice.
            let mut best_row = 0usize;
            let mut best = f64::NEG_INFINITY;
            for (offset, row) in tag.range().enumerate() {
                let v = s[[row, j]];
                if v > best {
                    best = v;
                    best_row = offset;
                }
            }
            path.push(best_row);
        }
        paths.insert(path);
    }

    let nodes = levels
        .last()
        .map(|tag| tag.len())
        .unwrap_or(bottom.len());
    paths.len() == nodes
}
