use std::error::Error;

use crate::spline::{BoundaryCondition, CubicSpline, SplineError};

/// Default minimum per-value change in the knot source required to
/// invalidate the cached spline, in source units.
pub const DEFAULT_REBUILD_TOLERANCE: f64 = 0.001;

/// Live source of calibration knots. Both arrays always have equal length;
/// the storage may change between calls, so callers copy a snapshot
/// immediately and never hold the returned borrows across calls.
pub trait KnotSource {
    fn len(&self) -> usize;

    /// Current independent-axis and dependent-axis arrays, in that order.
    fn values(&self) -> (&[f64], &[f64]);
}

/// Status flags reported by a [DependentActuator].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusBits {
    pub moving: bool,
    pub limit_positive: bool,
    pub limit_negative: bool,
    pub fault: bool,
}

impl StatusBits {
    /// Same status with the two limit direction flags exchanged.
    pub fn with_swapped_limits(self) -> Self {
        StatusBits {
            limit_positive: self.limit_negative,
            limit_negative: self.limit_positive,
            ..self
        }
    }
}

/// Parameters forwarded unchanged between the virtual axis and the
/// dependent actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Velocity,
    Acceleration,
    Deadband,
}

/// The physical actuator executing the motion. One implementation per
/// actuator kind; the spline engine never interprets the target value it
/// forwards.
pub trait DependentActuator {
    fn move_absolute(&mut self, target: f64) -> Result<(), Box<dyn Error>>;

    fn abort(&mut self) -> Result<(), Box<dyn Error>>;

    fn get_status(&self) -> Result<StatusBits, Box<dyn Error>>;

    fn get_parameter(&self, kind: ParameterKind) -> Result<f64, Box<dyn Error>>;

    fn set_parameter(&mut self, kind: ParameterKind, value: f64) -> Result<(), Box<dyn Error>>;
}

/// Drives a dependent actuator through a cubic spline over a live
/// calibration table, rebuilding the spline only when the table has
/// drifted by at least the configured tolerance.
///
/// Starts with no model; the first [CachedSplineActuator::move_to] builds
/// one. A rebuild that fails leaves the previous model in place, so a
/// transient bad read of the source degrades to "use the last known good
/// spline" instead of losing the axis.
pub struct CachedSplineActuator<S: KnotSource, A: DependentActuator> {
    source: S,
    actuator: A,
    boundary: BoundaryCondition,
    tolerance: f64,
    scale: f64,
    model: Option<CubicSpline>,
}

impl<S: KnotSource, A: DependentActuator> CachedSplineActuator<S, A> {
    /// Creates an actuator with no cached model,
    /// [DEFAULT_REBUILD_TOLERANCE] and a scale factor of 1.
    pub fn new(source: S, actuator: A, boundary: BoundaryCondition) -> Self {
        CachedSplineActuator {
            source,
            actuator,
            boundary,
            tolerance: DEFAULT_REBUILD_TOLERANCE,
            scale: 1.0,
            model: None,
        }
    }

    /// Sets the rebuild tolerance, applied uniformly to both axes.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the scale factor of the virtual axis. A negative scale inverts
    /// the axis sense, which swaps the limit direction flags reported by
    /// [CachedSplineActuator::get_status].
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Converts the virtual axis position into a target for the dependent
    /// actuator and forwards the move.
    ///
    /// Rebuilds the spline first when there is no cached model, when the
    /// knot count changed, or when any knot value drifted by at least the
    /// tolerance. Build failures abort the move without touching the
    /// cached model; errors from the dependent actuator are returned
    /// verbatim.
    pub fn move_to(&mut self, independent_value: f64) -> Result<(), Box<dyn Error>> {
        if self.needs_rebuild() {
            let (x, y) = self.source.values();
            let rebuilt = CubicSpline::new(x, y, self.boundary)?;
            self.model = Some(rebuilt);
        }

        let model = self.model.as_ref().ok_or_else(|| {
            SplineError::CorruptState("no spline model present after build".to_string())
        })?;

        let target = model.evaluate(independent_value);
        self.actuator.move_absolute(target)
    }

    pub fn abort(&mut self) -> Result<(), Box<dyn Error>> {
        self.actuator.abort()
    }

    /// Dependent actuator status, with the limit direction flags swapped
    /// when the axis scale is negative so that "positive limit" matches
    /// the virtual axis coordinate convention.
    pub fn get_status(&self) -> Result<StatusBits, Box<dyn Error>> {
        let status = self.actuator.get_status()?;
        if self.scale < 0.0 {
            Ok(status.with_swapped_limits())
        } else {
            Ok(status)
        }
    }

    pub fn get_parameter(&self, kind: ParameterKind) -> Result<f64, Box<dyn Error>> {
        self.actuator.get_parameter(kind)
    }

    pub fn set_parameter(&mut self, kind: ParameterKind, value: f64) -> Result<(), Box<dyn Error>> {
        self.actuator.set_parameter(kind, value)
    }

    /// The cached model, if any build has succeeded yet.
    pub fn model(&self) -> Option<&CubicSpline> {
        self.model.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the knot source, for hosts that recalibrate the
    /// table in place. The next [CachedSplineActuator::move_to] picks the
    /// change up through the usual tolerance comparison.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn dependent(&self) -> &A {
        &self.actuator
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Compares the current source values elementwise against the cached
    /// knot snapshot: all x values first, then all y values, stopping at
    /// the first delta that reaches the tolerance. A knot count change
    /// always invalidates.
    fn needs_rebuild(&self) -> bool {
        let model = match &self.model {
            Some(model) => model,
            None => return true,
        };

        if self.source.len() != model.len() {
            return true;
        }

        let (x, y) = self.source.values();
        if x.len() != model.len() || y.len() != model.len() {
            return true;
        }

        for (current, cached) in x.iter().zip(model.x()) {
            if (current - cached).abs() >= self.tolerance {
                return true;
            }
        }
        for (current, cached) in y.iter().zip(model.y()) {
            if (current - cached).abs() >= self.tolerance {
                return true;
            }
        }
        false
    }
}
