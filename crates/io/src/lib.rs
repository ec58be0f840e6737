//! # hermes-io
//!
//! Load hierarchical sales datasets from CSV or Parquet, persist forecast
//! frames as CSV, and manage the per-item forecast cache. Bridges external
//! file formats into hermes's internal panel types.

mod cache;
mod csv_read;
mod error;
mod forecast;
mod forecast_csv;
mod panel;
mod parquet_read;
mod reader;
mod sales;

pub use cache::{
    base_forecast_path, ensure_dir, fitted_path, forecast_path, is_cached, sanitize_item_id,
};
pub use error::IoError;
pub use forecast::{format_level, hi_column, lo_column, ForecastFrame, BASE_COLUMN};
pub use forecast_csv::{read_forecast_csv, write_forecast_csv};
pub use panel::PanelFrame;
pub use reader::{ReaderConfig, read_sales};
pub use sales::SalesTable;
