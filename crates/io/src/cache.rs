//! Filesystem bookkeeping for the per-item forecast cache.
//!
//! The pipeline writes one reconciled CSV per item and caches base
//! forecasts (point + interval bands) and in-sample fitted values so a
//! rerun can skip the expensive stages. All artefacts live under
//! caller-chosen directories; this module only derives names and probes
//! existence.

use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Make an item id safe to use as a file-name stem.
///
/// Alphanumerics, `-`, `_` and `.` pass through; every other character is
/// replaced with `_`. An empty id becomes `"item"`.
pub fn sanitize_item_id(item: &str) -> String {
    if item.is_empty() {
        return "item".to_string();
    }
    item.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Path of the reconciled-forecast CSV for one item.
pub fn forecast_path(dir: &Path, item: &str) -> PathBuf {
    dir.join(format!("{}.csv", sanitize_item_id(item)))
}

/// Path of the cached base-forecast CSV for one item.
pub fn base_forecast_path(dir: &Path, item: &str) -> PathBuf {
    dir.join(format!("{}_base.csv", sanitize_item_id(item)))
}

/// Path of the cached in-sample fitted-values CSV for one item.
pub fn fitted_path(dir: &Path, item: &str) -> PathBuf {
    dir.join(format!("{}_fitted.csv", sanitize_item_id(item)))
}

/// Create `dir` (and any missing parents).
///
/// # Errors
///
/// Returns [`IoError::Io`] naming the directory on failure.
pub fn ensure_dir(dir: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::Io {
        reason: format!("cannot create {}: {e}", dir.display()),
    })
}

/// Whether a cached artefact already exists at `path`.
pub fn is_cached(path: &Path) -> bool {
    path.is_file()
}
