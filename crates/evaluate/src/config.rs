//! Evaluation configuration.

/// Configuration for forecast scoring.
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    levels: Vec<f64>,
    seasonality: usize,
    per_level: bool,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            levels: vec![80.0, 95.0],
            seasonality: 7,
            per_level: true,
        }
    }
}

impl EvaluateConfig {
    /// Set the interval levels whose bands feed the CRPS quantile grid.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = levels;
        self
    }

    /// Set the seasonal-naive lag for the MSSE denominator (1 = plain naive).
    pub fn with_seasonality(mut self, seasonality: usize) -> Self {
        self.seasonality = seasonality;
        self
    }

    /// Toggle per-level score breakdowns next to the all-series scores.
    pub fn with_per_level(mut self, per_level: bool) -> Self {
        self.per_level = per_level;
        self
    }

    /// Returns the interval levels.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Returns the seasonal-naive lag.
    pub fn seasonality(&self) -> usize {
        self.seasonality
    }

    /// Returns whether per-level breakdowns are produced.
    pub fn per_level(&self) -> bool {
        self.per_level
    }
}
