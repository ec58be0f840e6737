//! End-to-end fitting and forecasting on simulated series.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hermes_ar::{auto_fit, fit_with_fallback, ArSpec};

/// Centred uniform noise; white noise is all Yule-Walker needs.
fn noise(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() - 0.5
}

fn simulate_ar(phi: &[f64], n: usize, seed: u64) -> Vec<f64> {
    const BURN_IN: usize = 200;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut y = vec![0.0; BURN_IN + n];
    for t in 0..y.len() {
        let mut value = noise(&mut rng);
        for (i, &coefficient) in phi.iter().enumerate() {
            if t > i {
                value += coefficient * y[t - 1 - i];
            }
        }
        y[t] = value;
    }
    y.split_off(BURN_IN)
}

#[test]
fn ar1_coefficient_recovery() {
    let data = simulate_ar(&[0.7], 2000, 42);
    let fit = ArSpec::new(1).fit(&data).expect("fit succeeds");
    assert!(
        (fit.phi()[0] - 0.7).abs() < 0.1,
        "phi = {}, expected near 0.7",
        fit.phi()[0]
    );
    assert!(fit.mean().abs() < 0.15, "mean = {}", fit.mean());
    assert!(fit.sigma2() > 0.0);
}

#[test]
fn ar2_coefficient_recovery() {
    let data = simulate_ar(&[0.5, -0.3], 3000, 7);
    let fit = ArSpec::new(2).fit(&data).expect("fit succeeds");
    assert!(
        (fit.phi()[0] - 0.5).abs() < 0.1,
        "phi_1 = {}",
        fit.phi()[0]
    );
    assert!(
        (fit.phi()[1] + 0.3).abs() < 0.1,
        "phi_2 = {}",
        fit.phi()[1]
    );
}

#[test]
fn auto_fit_is_at_least_as_good_as_the_true_order() {
    let data = simulate_ar(&[0.5, -0.3], 1500, 11);
    let best = auto_fit(&data, 5).expect("selection succeeds");
    let true_order = ArSpec::new(2).fit(&data).expect("fit succeeds");
    assert!(best.aic() <= true_order.aic() + 1e-9);
}

#[test]
fn forecast_pipeline_end_to_end() {
    let data = simulate_ar(&[0.6], 400, 3);
    let (model, fell_back) = fit_with_fallback(&data, 5).expect("fit succeeds");
    assert!(!fell_back);

    let forecast = model.forecast(28);
    assert_eq!(forecast.horizon(), 28);
    assert!(forecast.mean().iter().all(|m| m.is_finite()));
    for pair in forecast.variance().windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12);
    }

    let (lower, upper) = forecast.interval(90.0).expect("valid level");
    for h in 0..28 {
        assert!(lower[h] <= forecast.mean()[h]);
        assert!(upper[h] >= forecast.mean()[h]);
    }
}

#[test]
fn intermittent_demand_falls_back_to_naive() {
    // An all-zero demand history rejects every AR candidate (constant
    // data), but the pipeline must still produce a forecast.
    let data = vec![0.0; 40];
    let (model, fell_back) = fit_with_fallback(&data, 5).expect("fit succeeds");
    assert!(fell_back);
    assert!(model.is_naive());
    let forecast = model.forecast(7);
    assert_eq!(forecast.mean(), &[0.0; 7]);
    assert_eq!(forecast.variance(), &[0.0; 7]);
}
