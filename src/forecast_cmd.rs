//! Forecast command: fit, reconcile and persist per-item forecasts.

use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{aview1, Array2};
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use hermes_ar::fit_with_fallback;
use hermes_hierarchy::{aggregate, HierarchySpec};
use hermes_io::{
    base_forecast_path, ensure_dir, fitted_path, forecast_path, is_cached, read_forecast_csv,
    read_sales, write_forecast_csv, ForecastFrame, PanelFrame, SalesTable, BASE_COLUMN,
};
use hermes_reconcile::{reconcile, BaseForecasts, ReconcileConfig};

use crate::cli::ForecastArgs;
use crate::config::HermesConfig;
use crate::convert;

/// Cache column holding per-step forecast standard deviations.
const SIGMA_COLUMN: &str = "sigma";

/// Cache column holding in-sample one-step fitted values.
const FITTED_COLUMN: &str = "fitted";

/// Run the forecasting pipeline over every (or the requested) items.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: HermesConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let input = config
        .data
        .input
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no input path: set [data].input in the config file"))?;

    // 2. Build configs from TOML
    let reader_cfg = convert::build_reader_config(&config.data);
    let spec = convert::build_hierarchy_spec(&config.data)?;
    let reconcile_cfg = convert::build_reconcile_config(&config.reconcile, args.seed)?;

    let out_dir = args.output.unwrap_or_else(|| config.io.output_dir.clone());
    ensure_dir(&out_dir)?;
    ensure_dir(&config.io.cache_dir)?;

    // 3. Read the sales table
    info!(path = %input.display(), "reading sales data");
    let table = read_sales(input, &reader_cfg)
        .with_context(|| format!("failed to read sales table: {}", input.display()))?;

    let items = select_items(&table, args.items.as_deref())?;
    info!(n_items = items.len(), "forecasting items");

    // 4. Forecast items in parallel
    let job = ItemJob {
        table: &table,
        spec: &spec,
        reconcile: &reconcile_cfg,
        horizon: config.model.horizon,
        max_order: config.model.max_order,
        out_dir: &out_dir,
        cache_dir: &config.io.cache_dir,
        overwrite: args.overwrite,
    };
    let outcomes: Vec<ItemOutcome> = items
        .par_iter()
        .map(|item| forecast_item(item, &job).with_context(|| format!("item '{item}'")))
        .collect::<Result<_>>()?;

    let written = outcomes
        .iter()
        .filter(|o| matches!(o, ItemOutcome::Written))
        .count();
    let skipped = outcomes.len() - written;
    info!(written, skipped, dir = %out_dir.display(), "forecast run complete");
    Ok(())
}

/// The requested item ids, or every item of the table.
fn select_items(table: &SalesTable, requested: Option<&[String]>) -> Result<Vec<String>> {
    let known = table.item_ids();
    match requested {
        None => Ok(known),
        Some(requested) => {
            let missing: Vec<String> = requested
                .iter()
                .filter(|item| !known.contains(*item))
                .cloned()
                .collect();
            if !missing.is_empty() {
                bail!(
                    "unknown items {missing:?}; the table has {} items",
                    known.len()
                );
            }
            Ok(requested.to_vec())
        }
    }
}

enum ItemOutcome {
    Written,
    Skipped,
}

/// Everything one item forecast needs, shared across the rayon workers.
struct ItemJob<'a> {
    table: &'a SalesTable,
    spec: &'a HierarchySpec,
    reconcile: &'a ReconcileConfig,
    horizon: usize,
    max_order: usize,
    out_dir: &'a Path,
    cache_dir: &'a Path,
    overwrite: bool,
}

#[tracing::instrument(skip_all, fields(item = item))]
fn forecast_item(item: &str, job: &ItemJob<'_>) -> Result<ItemOutcome> {
    let out_path = forecast_path(job.out_dir, item);
    if is_cached(&out_path) && !job.overwrite {
        debug!(path = %out_path.display(), "reconciled output exists, skipping");
        return Ok(ItemOutcome::Skipped);
    }

    let hierarchy = aggregate(&job.table.filter_item(item), job.spec)?;
    let (train, test) = hierarchy.frame().split_tail(job.horizon)?;
    let train_hierarchy = hierarchy.with_frame(train.clone())?;

    let base = load_or_fit_base(item, &train, &test, job)?;
    let reconciled = reconcile(&train_hierarchy, &base, job.reconcile)?;

    let mut frames = Vec::with_capacity(reconciled.sets().len());
    for set in reconciled.into_sets() {
        let mut frame = ForecastFrame::new(train.ids().to_vec(), test.dates().to_vec())?;
        if let Some(seed) = set.seed() {
            frame = frame.with_seed(seed);
        }
        for (name, values) in set.into_columns() {
            frame.push_column(name, values)?;
        }
        frames.push(frame);
    }
    write_forecast_csv(&out_path, &frames)?;
    info!(path = %out_path.display(), sets = frames.len(), "wrote reconciled forecasts");
    Ok(ItemOutcome::Written)
}

/// Base forecasts for every series of the training panel, reusing the
/// per-item cache when it is present and consistent.
fn load_or_fit_base(
    item: &str,
    train: &PanelFrame,
    test: &PanelFrame,
    job: &ItemJob<'_>,
) -> Result<BaseForecasts> {
    let base_path = base_forecast_path(job.cache_dir, item);
    let fit_path = fitted_path(job.cache_dir, item);

    if !job.overwrite && is_cached(&base_path) && is_cached(&fit_path) {
        match read_cached_base(train, job.horizon, &base_path, &fit_path) {
            Ok(base) => {
                debug!(path = %base_path.display(), "reusing cached base forecasts");
                return Ok(base);
            }
            Err(err) => warn!(%err, "base forecast cache unusable, refitting"),
        }
    }

    let (base, fitted, fallbacks) = fit_base(train, job.horizon, job.max_order)?;
    if fallbacks > 0 {
        info!(
            fallbacks,
            n_series = train.n_series(),
            "series used the naive fallback"
        );
    }
    write_base_cache(train, test, &base, &fitted, &base_path, &fit_path)?;
    debug!(path = %base_path.display(), "cached base forecasts");
    Ok(base)
}

fn read_cached_base(
    train: &PanelFrame,
    horizon: usize,
    base_path: &Path,
    fit_path: &Path,
) -> Result<BaseForecasts> {
    let base_frame =
        single_frame(read_forecast_csv(base_path)?, base_path)?.reorder(train.ids())?;
    if base_frame.horizon() != horizon {
        bail!(
            "cached horizon {} does not match the configured {horizon}",
            base_frame.horizon()
        );
    }
    let mean = cache_column(&base_frame, BASE_COLUMN, base_path)?.clone();
    let sigma = cache_column(&base_frame, SIGMA_COLUMN, base_path)?.clone();

    let fitted_frame =
        single_frame(read_forecast_csv(fit_path)?, fit_path)?.reorder(train.ids())?;
    if fitted_frame.horizon() != train.n_dates() {
        bail!(
            "cached fitted values cover {} steps, the training window has {}",
            fitted_frame.horizon(),
            train.n_dates()
        );
    }
    let fitted = cache_column(&fitted_frame, FITTED_COLUMN, fit_path)?;
    let residuals = train.values() - fitted;

    Ok(BaseForecasts::new(mean, sigma, residuals)?)
}

fn single_frame(mut frames: Vec<ForecastFrame>, path: &Path) -> Result<ForecastFrame> {
    if frames.len() != 1 {
        bail!(
            "expected one seed group in {}, found {}",
            path.display(),
            frames.len()
        );
    }
    Ok(frames.remove(0))
}

fn cache_column<'a>(
    frame: &'a ForecastFrame,
    name: &str,
    path: &Path,
) -> Result<&'a Array2<f64>> {
    frame
        .column(name)
        .ok_or_else(|| anyhow::anyhow!("{} is missing the '{name}' column", path.display()))
}

/// Fits every series of the training panel and assembles the base mean,
/// sigma and residual matrices.
fn fit_base(
    train: &PanelFrame,
    horizon: usize,
    max_order: usize,
) -> Result<(BaseForecasts, Array2<f64>, usize)> {
    let n = train.n_series();
    let mut mean = Array2::zeros((n, horizon));
    let mut sigma = Array2::zeros((n, horizon));
    let mut fitted = Array2::from_elem((n, train.n_dates()), f64::NAN);
    let mut fallbacks = 0usize;

    for i in 0..n {
        let series = train.series(i).to_vec();
        let (model, fell_back) = fit_with_fallback(&series, max_order)
            .with_context(|| format!("series '{}'", train.ids()[i]))?;
        if fell_back {
            fallbacks += 1;
            debug!(series = %train.ids()[i], "fell back to the naive forecaster");
        }
        let forecast = model.forecast(horizon);
        mean.row_mut(i).assign(&aview1(forecast.mean()));
        sigma.row_mut(i).assign(&aview1(&forecast.sigma()));
        fitted.row_mut(i).assign(&aview1(model.fitted()));
    }

    let residuals = train.values() - &fitted;
    let base = BaseForecasts::new(mean, sigma, residuals)?;
    Ok((base, fitted, fallbacks))
}

fn write_base_cache(
    train: &PanelFrame,
    test: &PanelFrame,
    base: &BaseForecasts,
    fitted: &Array2<f64>,
    base_path: &Path,
    fit_path: &Path,
) -> Result<()> {
    let mut base_frame = ForecastFrame::new(train.ids().to_vec(), test.dates().to_vec())?;
    base_frame.push_column(BASE_COLUMN, base.mean().to_owned())?;
    base_frame.push_column(SIGMA_COLUMN, base.sigma().to_owned())?;
    write_forecast_csv(base_path, &[base_frame])?;

    let mut fitted_frame = ForecastFrame::new(train.ids().to_vec(), train.dates().to_vec())?;
    fitted_frame.push_column(FITTED_COLUMN, fitted.clone())?;
    write_forecast_csv(fit_path, &[fitted_frame])?;
    Ok(())
}
