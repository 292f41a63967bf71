extern crate spline_axis;

use std::error::Error;

use spline_axis::{
    BoundaryCondition, CachedSplineActuator, DependentActuator, KnotSource, ParameterKind,
    StatusBits,
};

struct CalibrationTable {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl KnotSource for CalibrationTable {
    fn len(&self) -> usize {
        self.x.len()
    }

    fn values(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }
}

struct ConsoleActuator;

impl DependentActuator for ConsoleActuator {
    fn move_absolute(&mut self, target: f64) -> Result<(), Box<dyn Error>> {
        println!("move_absolute({:.4})", target);
        Ok(())
    }

    fn abort(&mut self) -> Result<(), Box<dyn Error>> {
        println!("abort");
        Ok(())
    }

    fn get_status(&self) -> Result<StatusBits, Box<dyn Error>> {
        Ok(StatusBits::default())
    }

    fn get_parameter(&self, _kind: ParameterKind) -> Result<f64, Box<dyn Error>> {
        Ok(0.0)
    }

    fn set_parameter(&mut self, _kind: ParameterKind, _value: f64) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

fn main() {
    let table = CalibrationTable {
        x: vec![0.0, 1.0, 2.0, 3.0],
        y: vec![0.0, 1.0, 0.0, 1.0],
    };

    let mut axis =
        CachedSplineActuator::new(table, ConsoleActuator, BoundaryCondition::Natural);

    println!("initial table");
    for position in [0.0, 0.5, 1.5, 2.5, 3.0] {
        axis.move_to(position).unwrap();
    }

    // Recalibrate one knot past the rebuild tolerance; the next move
    // rebuilds the spline before dispatching.
    axis.source_mut().y[2] = 0.5;
    println!("after recalibration");
    for position in [0.5, 1.5, 2.5] {
        axis.move_to(position).unwrap();
    }
}
