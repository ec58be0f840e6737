//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{bail, Context, Result};

use hermes_evaluate::EvaluateConfig;
use hermes_hierarchy::HierarchySpec;
use hermes_io::ReaderConfig;
use hermes_reconcile::{IntervalMethod, Method, ReconcileConfig};

use crate::config::{DataToml, EvaluateToml, ReconcileToml};

/// Builds a [`ReaderConfig`] from the TOML data configuration.
pub fn build_reader_config(data: &DataToml) -> ReaderConfig {
    ReaderConfig::default()
        .with_key_columns(data.key_columns.clone())
        .with_item_column(&data.item_column)
        .with_date_column(&data.date_column)
        .with_target_column(&data.target_column)
        .with_date_format(&data.date_format)
}

/// Builds a [`HierarchySpec`] from the TOML data configuration, checking
/// that every level column is a configured key column.
pub fn build_hierarchy_spec(data: &DataToml) -> Result<HierarchySpec> {
    let spec = HierarchySpec::new(data.levels.clone())
        .context("invalid [data].levels hierarchy specification")?;
    spec.check_columns(&data.key_columns)
        .context("[data].levels names a column missing from [data].key_columns")?;
    Ok(spec)
}

/// Parses an interval method name into the corresponding enum variant.
pub fn parse_intervals(s: &str, num_samples: usize) -> Result<IntervalMethod> {
    match s.to_lowercase().as_str() {
        "bootstrap" => Ok(IntervalMethod::Bootstrap { num_samples }),
        "normality" => Ok(IntervalMethod::Normality),
        other => bail!("unknown interval method: {other:?}"),
    }
}

/// Builds a [`ReconcileConfig`] from the TOML reconcile configuration.
///
/// A CLI seed override replaces the whole seed list.
pub fn build_reconcile_config(
    reconcile: &ReconcileToml,
    seed_override: Option<u64>,
) -> Result<ReconcileConfig> {
    let methods = reconcile
        .methods
        .iter()
        .map(|name| {
            name.parse::<Method>()
                .with_context(|| format!("in [reconcile].methods: {name:?}"))
        })
        .collect::<Result<Vec<Method>>>()?;
    let intervals = parse_intervals(&reconcile.intervals, reconcile.num_samples)?;
    let seeds = match seed_override {
        Some(seed) => vec![seed],
        None => reconcile.seeds.clone(),
    };

    let config = ReconcileConfig::default()
        .with_methods(methods)
        .with_levels(reconcile.levels.clone())
        .with_intervals(intervals)
        .with_seeds(seeds);
    config.validate().context("invalid [reconcile] settings")?;
    Ok(config)
}

/// Builds an [`EvaluateConfig`] from the TOML evaluate configuration,
/// falling back to the reconcile interval levels when none are set.
pub fn build_evaluate_config(
    evaluate: &EvaluateToml,
    reconcile: &ReconcileToml,
) -> EvaluateConfig {
    let levels = evaluate
        .levels
        .clone()
        .unwrap_or_else(|| reconcile.levels.clone());
    EvaluateConfig::default()
        .with_levels(levels)
        .with_seasonality(evaluate.seasonality)
        .with_per_level(evaluate.per_level)
}
