use std::{error::Error, fmt::Display};

use nalgebra::DVector;

use crate::tridiagonal;

/// Endpoint policy used when building a [CubicSpline].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Second derivative is forced to 0 at both endpoints.
    Natural,
    /// First derivative is forced to the given values at the first and last knot.
    Clamped { start_slope: f64, end_slope: f64 },
}

/// Cubic spline through a set of knots. Immutable once built; the knot
/// snapshot, the solved second derivatives and the boundary policy fully
/// determine the curve, so two splines built from identical inputs are
/// numerically identical.
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second_derivative: Vec<f64>,
    boundary: BoundaryCondition,
}

impl CubicSpline {
    /// Builds a cubic spline through the knots `(x[i], y[i])`.
    ///
    /// The continuity equations for the unknown second derivatives form a
    /// tridiagonal system; the two boundary rows encode `boundary`. The
    /// system is diagonally dominant for any valid knot set, so the solve
    /// cannot fail once the inputs pass validation. Inputs are copied,
    /// never mutated.
    ///
    /// # Example
    /// ```
    /// use spline_axis::{BoundaryCondition, CubicSpline};
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let x = [0.0, 1.0, 2.0, 3.0];
    /// let y = [0.0, 1.0, 0.0, 1.0];
    /// let spline = CubicSpline::new(&x, &y, BoundaryCondition::Natural).unwrap();
    ///
    /// assert_approx_eq!(1.0, spline.evaluate(1.0), 1e-9);
    /// assert_approx_eq!(0.75, spline.evaluate(0.5), 1e-9);
    /// ```
    ///
    /// # Errors
    /// [SplineError::InvalidArgument] when there are fewer than 2 knots,
    /// the arrays have different lengths, or `x` is not strictly increasing
    /// (the message names the offending index).
    pub fn new(x: &[f64], y: &[f64], boundary: BoundaryCondition) -> Result<Self, SplineError> {
        if x.len() < 2 {
            return Err(SplineError::InvalidArgument(
                "spline must have at least 2 knots".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(SplineError::InvalidArgument(format!(
                "knot arrays have mismatched lengths: {} x values, {} y values",
                x.len(),
                y.len()
            )));
        }
        for i in 1..x.len() {
            if x[i] <= x[i - 1] {
                return Err(SplineError::InvalidArgument(format!(
                    "knot x values must be strictly increasing, violated at index {}",
                    i
                )));
            }
        }

        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let mut sub = DVector::<f64>::zeros(n);
        let mut diag = DVector::<f64>::zeros(n);
        let mut sup = DVector::<f64>::zeros(n);
        let mut rhs = DVector::<f64>::zeros(n);

        for i in 1..n - 1 {
            sub[i] = h[i - 1];
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            sup[i] = h[i];
            rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        match boundary {
            BoundaryCondition::Natural => {
                diag[0] = 1.0;
                diag[n - 1] = 1.0;
            }
            BoundaryCondition::Clamped { start_slope, end_slope } => {
                diag[0] = 2.0 * h[0];
                sup[0] = h[0];
                rhs[0] = 6.0 * ((y[1] - y[0]) / h[0] - start_slope);
                sub[n - 1] = h[n - 2];
                diag[n - 1] = 2.0 * h[n - 2];
                rhs[n - 1] = 6.0 * (end_slope - (y[n - 1] - y[n - 2]) / h[n - 2]);
            }
        }

        let solution = tridiagonal::solve(&sub, &diag, &sup, &rhs);

        Ok(CubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            second_derivative: solution.as_slice().to_vec(),
            boundary,
        })
    }

    /// Evaluates the spline at `query_x`. Queries outside the knot range
    /// are silently extrapolated with the cubic of the nearest boundary
    /// interval. Pure function.
    pub fn evaluate(&self, query_x: f64) -> f64 {
        let i = self.find_interval_index(query_x);
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - query_x) / h;
        let b = (query_x - self.x[i]) / h;

        a * self.y[i]
            + b * self.y[i + 1]
            + ((a.powi(3) - a) * self.second_derivative[i]
                + (b.powi(3) - b) * self.second_derivative[i + 1])
                * h
                * h
                / 6.0
    }

    /// Number of knots.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        // A built spline always holds at least 2 knots.
        false
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn second_derivatives(&self) -> &[f64] {
        &self.second_derivative
    }

    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    /// Index of the interval covering `x`. Out-of-range queries resolve to
    /// interval 0 or n-2, which is what the extrapolation in
    /// [CubicSpline::evaluate] relies on.
    fn find_interval_index(&self, x: f64) -> usize {
        let size = self.x.len();
        let mut min = 0;
        let mut max = size - 1;

        while max - min > 1 {
            let mid = (min + max) / 2;
            if x < self.x[mid] {
                max = mid;
            } else {
                min = mid;
            }
        }
        min
    }
}

/// Failures of the spline engine.
#[derive(Debug, PartialEq)]
pub enum SplineError {
    /// Rejected knot set: too few knots, mismatched lengths or
    /// non-increasing x values. Raised before any solve is attempted.
    InvalidArgument(String),
    /// An operation ran against a spline state that the public contract
    /// should make unreachable.
    CorruptState(String),
}

impl Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplineError::InvalidArgument(message) => write!(f, "Invalid spline input: {}", message),
            SplineError::CorruptState(message) => write!(f, "Corrupt spline state: {}", message),
        }
    }
}

impl Error for SplineError {}
