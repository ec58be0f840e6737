//! Forecast accuracy metrics.
//!
//! Point accuracy is measured by MSSE (mean squared error scaled by the
//! in-sample seasonal-naive error), probabilistic accuracy by a scaled
//! CRPS approximated from the interval-implied quantile grid. Both are
//! scale free, so scores are comparable across series and levels.

/// Mean squared scaled error.
///
/// The forecast MSE over the test window divided by the in-sample MSE of
/// the seasonal-naive forecast at lag `seasonality` (1 = plain naive).
/// `None` when the scale is undefined: mismatched or empty inputs, a
/// training window no longer than the lag, or a zero naive error.
pub fn msse(
    actual: &[f64],
    forecast: &[f64],
    train: &[f64],
    seasonality: usize,
) -> Option<f64> {
    if actual.is_empty() || actual.len() != forecast.len() || seasonality == 0 {
        return None;
    }
    if train.len() <= seasonality {
        return None;
    }
    let mse = actual
        .iter()
        .zip(forecast)
        .map(|(y, f)| (y - f) * (y - f))
        .sum::<f64>()
        / actual.len() as f64;
    let naive = train
        .windows(seasonality + 1)
        .map(|w| {
            let d = w[seasonality] - w[0];
            d * d
        })
        .sum::<f64>()
        / (train.len() - seasonality) as f64;
    if naive == 0.0 {
        return None;
    }
    let ratio = mse / naive;
    ratio.is_finite().then_some(ratio)
}

/// Mean pinball loss of a quantile forecast at probability `prob`.
pub fn pinball(actual: &[f64], predicted: &[f64], prob: f64) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0;
    for (y, q) in actual.iter().zip(predicted) {
        let diff = y - q;
        acc += if diff >= 0.0 {
            prob * diff
        } else {
            (prob - 1.0) * diff
        };
    }
    acc / actual.len() as f64
}

/// Scaled continuous ranked probability score.
///
/// CRPS is approximated by the mean doubled pinball loss over the
/// quantile grid `(prob, predicted)` and scaled by the absolute mass of
/// the actuals, `sum |y|`. `None` when the grid is empty or the actuals
/// are all zero, which leaves the scale undefined.
pub fn scaled_crps(actual: &[f64], quantiles: &[(f64, Vec<f64>)]) -> Option<f64> {
    if actual.is_empty() || quantiles.is_empty() {
        return None;
    }
    let abs_mass: f64 = actual.iter().map(|y| y.abs()).sum();
    if abs_mass == 0.0 {
        return None;
    }
    let mean_loss = quantiles
        .iter()
        .map(|(prob, predicted)| pinball(actual, predicted, *prob))
        .sum::<f64>()
        / quantiles.len() as f64;
    let score = 2.0 * mean_loss * actual.len() as f64 / abs_mass;
    score.is_finite().then_some(score)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn msse_is_zero_for_a_perfect_forecast() {
        let score = msse(&[5.0, 6.0], &[5.0, 6.0], &[1.0, 2.0, 3.0, 4.0], 1).unwrap();
        assert_relative_eq!(score, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn msse_matches_hand_computation() {
        // Naive in-sample MSE of [1, 2, 3, 4] at lag 1 is 1; test MSE is
        // ((5-4)^2 + (6-4)^2) / 2 = 2.5.
        let score = msse(&[5.0, 6.0], &[4.0, 4.0], &[1.0, 2.0, 3.0, 4.0], 1).unwrap();
        assert_relative_eq!(score, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn msse_uses_the_seasonal_lag() {
        // At lag 2 the train pattern repeats exactly, so the scale is 0.
        let score = msse(&[1.0, 2.0], &[1.5, 1.5], &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0], 2);
        assert!(score.is_none());
    }

    #[test]
    fn msse_needs_more_train_than_lag() {
        assert!(msse(&[1.0], &[1.0], &[1.0, 2.0, 3.0], 3).is_none());
        assert!(msse(&[1.0], &[1.0], &[], 1).is_none());
    }

    #[test]
    fn msse_rejects_degenerate_inputs() {
        assert!(msse(&[], &[], &[1.0, 2.0], 1).is_none());
        assert!(msse(&[1.0], &[1.0, 2.0], &[1.0, 2.0], 1).is_none());
        assert!(msse(&[1.0], &[1.0], &[1.0, 2.0], 0).is_none());
    }

    #[test]
    fn pinball_at_the_median_is_half_the_absolute_error() {
        assert_relative_eq!(pinball(&[2.0], &[1.0], 0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(pinball(&[1.0], &[2.0], 0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn pinball_penalises_underprediction_at_high_probs() {
        let under = pinball(&[10.0], &[0.0], 0.9);
        let over = pinball(&[0.0], &[10.0], 0.9);
        assert_relative_eq!(under, 9.0, epsilon = 1e-12);
        assert_relative_eq!(over, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn scaled_crps_with_a_median_grid_is_a_mae_ratio() {
        // 2 * mean pinball at 0.5 = MAE; scaled by |2| + |4| = 6 with the
        // horizon factored back in gives (1 + 1) / 6.
        let score = scaled_crps(&[2.0, 4.0], &[(0.5, vec![1.0, 5.0])]).unwrap();
        assert_relative_eq!(score, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn scaled_crps_is_zero_for_perfect_quantiles() {
        let actual = [3.0, 1.0, 4.0];
        let grid = vec![
            (0.1, actual.to_vec()),
            (0.5, actual.to_vec()),
            (0.9, actual.to_vec()),
        ];
        let score = scaled_crps(&actual, &grid).unwrap();
        assert_relative_eq!(score, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn scaled_crps_is_undefined_for_all_zero_actuals() {
        let grid = vec![(0.5, vec![0.1, 0.2])];
        assert!(scaled_crps(&[0.0, 0.0], &grid).is_none());
    }

    #[test]
    fn scaled_crps_needs_a_grid() {
        assert!(scaled_crps(&[1.0], &[]).is_none());
        assert!(scaled_crps(&[], &[(0.5, vec![])]).is_none());
    }

    #[test]
    fn tighter_quantiles_score_lower() {
        let actual = [5.0, 5.0, 5.0, 5.0];
        let tight = vec![
            (0.1, vec![4.5; 4]),
            (0.9, vec![5.5; 4]),
        ];
        let loose = vec![
            (0.1, vec![1.0; 4]),
            (0.9, vec![9.0; 4]),
        ];
        let tight_score = scaled_crps(&actual, &tight).unwrap();
        let loose_score = scaled_crps(&actual, &loose).unwrap();
        assert!(tight_score < loose_score);
    }
}
