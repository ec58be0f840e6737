//! Evaluate command: score reconciled forecasts against the held-out window.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, info_span};

use hermes_evaluate::{evaluate, evaluate_item, ItemScores, LevelScores, MethodScores};
use hermes_hierarchy::aggregate;
use hermes_io::{forecast_path, is_cached, read_forecast_csv, read_sales};

use crate::cli::EvaluateArgs;
use crate::config::HermesConfig;
use crate::convert;

/// Score every item's reconciled forecasts and write a diagnostics report.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: HermesConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let input = config
        .data
        .input
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no input path: set [data].input in the config file"))?;
    let reader_cfg = convert::build_reader_config(&config.data);
    let spec = convert::build_hierarchy_spec(&config.data)?;
    let eval_cfg = convert::build_evaluate_config(&config.evaluate, &config.reconcile);
    let horizon = config.model.horizon;
    let results_dir = args.results.unwrap_or_else(|| config.io.output_dir.clone());

    // 2. Read the sales table and rebuild the train/test split per item
    info!(path = %input.display(), "reading sales data");
    let table = read_sales(input, &reader_cfg)
        .with_context(|| format!("failed to read sales table: {}", input.display()))?;

    let mut item_scores = Vec::new();
    for item in table.item_ids() {
        let path = forecast_path(&results_dir, &item);
        if !is_cached(&path) {
            bail!(
                "no reconciled forecasts for item '{item}' at {}; run `hermes forecast` first",
                path.display()
            );
        }

        let hierarchy = aggregate(&table.filter_item(&item), &spec)?;
        let (train, test) = hierarchy.frame().split_tail(horizon)?;

        let frames = read_forecast_csv(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let per_seed = frames
            .iter()
            .map(|frame| {
                evaluate_item(&item, &train, &test, hierarchy.tags(), frame, &eval_cfg)
                    .with_context(|| format!("scoring item '{item}' failed"))
            })
            .collect::<Result<Vec<ItemScores>>>()?;
        debug!(item = %item, seeds = per_seed.len(), "scored item");
        item_scores.push(merge_seed_scores(per_seed));
    }

    // 3. Aggregate across items and persist
    let report = evaluate(item_scores, horizon, &eval_cfg);
    let json = report.to_json()?;

    let diag_path = args
        .output
        .unwrap_or_else(|| results_dir.join("diagnostics.json"));
    std::fs::write(&diag_path, &json)
        .with_context(|| format!("failed to write diagnostics: {}", diag_path.display()))?;
    info!(path = %diag_path.display(), "diagnostics written");
    Ok(())
}

/// Averages the per-seed scores of one item into a single score set.
///
/// Point scores repeat across bootstrap seeds while interval scores vary
/// with the draws. Undefined metrics are skipped in the mean and the
/// series counts are identical per seed, so the first set's count is kept.
fn merge_seed_scores(mut per_seed: Vec<ItemScores>) -> ItemScores {
    if per_seed.len() == 1 {
        return per_seed.remove(0);
    }

    let item = per_seed[0].item.clone();
    let mut merged = LevelScores::new();
    for (level, methods) in &per_seed[0].levels {
        let mut table = BTreeMap::new();
        for (method, first) in methods {
            let msse: Vec<Option<f64>> = per_seed
                .iter()
                .map(|scores| seed_metric(scores, level, method, |v| v.msse))
                .collect();
            let crps: Vec<Option<f64>> = per_seed
                .iter()
                .map(|scores| seed_metric(scores, level, method, |v| v.scaled_crps))
                .collect();
            table.insert(
                method.clone(),
                MethodScores {
                    msse: mean_defined(&msse),
                    scaled_crps: mean_defined(&crps),
                    n_series: first.n_series,
                },
            );
        }
        merged.insert(level.clone(), table);
    }
    ItemScores {
        item,
        levels: merged,
    }
}

fn seed_metric(
    scores: &ItemScores,
    level: &str,
    method: &str,
    metric: impl Fn(&MethodScores) -> Option<f64>,
) -> Option<f64> {
    scores
        .levels
        .get(level)
        .and_then(|methods| methods.get(method))
        .and_then(metric)
}

fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let flat: Vec<f64> = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    hermes_stats::finite_mean(&flat)
}
