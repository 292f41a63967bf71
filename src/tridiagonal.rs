use nalgebra::DVector;

/// Solves a tridiagonal system with the Thomas algorithm.
/// - `sub` - sub-diagonal, `sub[0]` is ignored,
/// - `diag` - main diagonal,
/// - `sup` - super-diagonal, `sup[n-1]` is ignored,
/// - `rhs` - right hand side vector.
///
/// All vectors must have the same length n >= 1. Runs in O(n).
///
/// Divisions are guarded by [safe_div], so a singular system returns a
/// finite (possibly poor quality) solution instead of panicking. The
/// systems assembled during spline construction are diagonally dominant
/// for any strictly increasing knot set, so the guard never fires there.
pub fn solve(sub: &DVector<f64>, diag: &DVector<f64>, sup: &DVector<f64>, rhs: &DVector<f64>) -> DVector<f64> {
    let n = rhs.len();
    debug_assert!(n >= 1);
    debug_assert!(sub.len() == n && diag.len() == n && sup.len() == n);

    let mut sup_prime = DVector::<f64>::zeros(n);
    let mut rhs_prime = DVector::<f64>::zeros(n);

    sup_prime[0] = safe_div(sup[0], diag[0]);
    rhs_prime[0] = safe_div(rhs[0], diag[0]);

    for i in 1..n {
        let multiplier = safe_div(1.0, diag[i] - sub[i] * sup_prime[i - 1]);
        sup_prime[i] = sup[i] * multiplier;
        rhs_prime[i] = (rhs[i] - sub[i] * rhs_prime[i - 1]) * multiplier;
    }

    let mut solution = DVector::<f64>::zeros(n);
    solution[n - 1] = rhs_prime[n - 1];
    for i in (0..n - 1).rev() {
        solution[i] = rhs_prime[i] - sup_prime[i] * solution[i + 1];
    }
    solution
}

/// Division that never traps. A denominator within machine epsilon of zero
/// yields 0.0 when the numerator is also near zero, otherwise a
/// correctly-signed finite sentinel.
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() >= f64::EPSILON {
        return numerator / denominator;
    }
    if numerator.abs() < f64::EPSILON {
        return 0.0;
    }
    if numerator.is_sign_positive() == denominator.is_sign_positive() {
        f64::MAX
    } else {
        -f64::MAX
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn identity_system() {
        let n = 5;
        let sub = DVector::zeros(n);
        let diag = DVector::from_element(n, 1.0);
        let sup = DVector::zeros(n);
        let rhs = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let solution = solve(&sub, &diag, &sup, &rhs);

        for i in 0..n {
            assert_approx_eq!(solution[i], rhs[i], 1e-12);
        }
    }

    #[test]
    fn laplacian_system() {
        // [ 2 -1  0  0]   [x0]   [1]
        // [-1  2 -1  0] * [x1] = [0]
        // [ 0 -1  2 -1]   [x2]   [0]
        // [ 0  0 -1  2]   [x3]   [1]
        let sub = DVector::from_vec(vec![0.0, -1.0, -1.0, -1.0]);
        let diag = DVector::from_element(4, 2.0);
        let sup = DVector::from_vec(vec![-1.0, -1.0, -1.0, 0.0]);
        let rhs = DVector::from_vec(vec![1.0, 0.0, 0.0, 1.0]);

        let solution = solve(&sub, &diag, &sup, &rhs);

        let residual = [
            diag[0] * solution[0] + sup[0] * solution[1],
            sub[1] * solution[0] + diag[1] * solution[1] + sup[1] * solution[2],
            sub[2] * solution[1] + diag[2] * solution[2] + sup[2] * solution[3],
            sub[3] * solution[2] + diag[3] * solution[3],
        ];
        for i in 0..4 {
            assert_approx_eq!(residual[i], rhs[i], 1e-10);
        }
    }

    #[test]
    fn diagonally_dominant_system() {
        let n = 10;
        let alpha = 0.4;
        let sub = DVector::from_fn(n, |i, _| if i > 0 { -alpha } else { 0.0 });
        let diag = DVector::from_element(n, 1.0 + 2.0 * alpha);
        let sup = DVector::from_fn(n, |i, _| if i < n - 1 { -alpha } else { 0.0 });
        let rhs = DVector::from_element(n, 1.0);

        let solution = solve(&sub, &diag, &sup, &rhs);

        for i in 0..n {
            assert!(solution[i] > 0.0 && solution[i].is_finite());
        }
    }

    #[test]
    fn singular_system_stays_finite() {
        let sub = DVector::from_vec(vec![0.0, 1.0, 1.0]);
        let diag = DVector::zeros(3);
        let sup = DVector::from_vec(vec![1.0, 1.0, 0.0]);
        let rhs = DVector::from_vec(vec![1.0, 0.0, -1.0]);

        let solution = solve(&sub, &diag, &sup, &rhs);

        for i in 0..3 {
            assert!(!solution[i].is_nan());
        }
    }

    #[test]
    fn safe_div_regular() {
        assert_approx_eq!(safe_div(6.0, 3.0), 2.0, 1e-12);
        assert_approx_eq!(safe_div(-6.0, 3.0), -2.0, 1e-12);
    }

    #[test]
    fn safe_div_zero_over_zero() {
        assert_eq!(0.0, safe_div(0.0, 0.0));
        assert_eq!(0.0, safe_div(1e-18, 0.0));
    }

    #[test]
    fn safe_div_finite_over_zero() {
        assert_eq!(f64::MAX, safe_div(2.0, 0.0));
        assert_eq!(-f64::MAX, safe_div(-2.0, 0.0));
        assert_eq!(-f64::MAX, safe_div(2.0, -0.0));
    }
}
