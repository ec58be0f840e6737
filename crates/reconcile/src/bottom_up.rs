//! Bottom-up projection.

use hermes_hierarchy::SummingMatrix;
use ndarray::Array2;

/// Projection that keeps the bottom rows and discards every aggregate.
///
/// `P = [0 | I]`, so `S * P` reproduces each aggregate as the sum of its
/// bottom-level forecasts.
pub(crate) fn projection(summing: &SummingMatrix) -> Array2<f64> {
    let n_total = summing.n_total();
    let n_bottom = summing.n_bottom();
    let offset = n_total - n_bottom;
    let mut p = Array2::zeros((n_bottom, n_total));
    for j in 0..n_bottom {
        p[[j, offset + j]] = 1.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    fn two_store_summing() -> SummingMatrix {
        SummingMatrix::new(array![
            [1.0, 1.0],
            [1.0, 0.0],
            [0.0, 1.0]
        ])
        .unwrap()
    }

    #[test]
    fn projection_selects_bottom_rows() {
        let summing = two_store_summing();
        let p = projection(&summing);
        assert_eq!(p, array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn aggregates_become_bottom_sums() {
        let summing = two_store_summing();
        let p = projection(&summing);
        let base = array![[100.0], [3.0], [5.0]];
        let reconciled = summing.values().dot(&p).dot(&base);
        assert_abs_diff_eq!(reconciled[[0, 0]], 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reconciled[[1, 0]], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reconciled[[2, 0]], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_is_left_inverse_of_summing() {
        let summing = two_store_summing();
        let p = projection(&summing);
        let ps = p.dot(summing.values());
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(ps[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }
}
