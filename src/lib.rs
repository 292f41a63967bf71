//! Cubic-spline function generator that drives one real-world actuator
//! from the position of a virtual axis, rebuilding the spline on demand
//! when the underlying calibration knots change.
//!
//! # Example
//! ```
//! use spline_axis::{BoundaryCondition, CubicSpline};
//! use assert_approx_eq::assert_approx_eq;
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [0.0, 1.0, 0.0, 1.0];
//! let spline = CubicSpline::new(&x, &y, BoundaryCondition::Natural).unwrap();
//!
//! assert_approx_eq!(1.0, spline.evaluate(1.0), 1e-9);
//! assert_approx_eq!(0.75, spline.evaluate(0.5), 1e-9);
//! ```

mod actuator;
mod spline;
mod tridiagonal;

pub use actuator::{
    CachedSplineActuator, DependentActuator, KnotSource, ParameterKind, StatusBits,
    DEFAULT_REBUILD_TOLERANCE,
};
pub use spline::{BoundaryCondition, CubicSpline, SplineError};
