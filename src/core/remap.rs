//! Linear remapping between two intervals.
//!
//! `output = d0 + (value - s0) * (d1 - d0) / (s1 - s0)`
//!
//! Intervals are taken in stored order, so a descending [`AxisBounds`]
//! remaps with its endpoints swapped.

use super::bounds::AxisBounds;
use super::error::{Result, TransformError};

#[inline]
fn check_source(source: (f64, f64)) -> Result<f64> {
    let width = source.1 - source.0;
    if width == 0.0 {
        return Err(TransformError::DivisionByZero {
            start: source.0,
            end: source.1,
        });
    }
    Ok(width)
}

/// Map a single value from `source` to `target`.
///
/// # Errors
///
/// Returns `DivisionByZero` if the source interval has zero width.
pub fn remap(source: (f64, f64), target: (f64, f64), value: f64) -> Result<f64> {
    let width = check_source(source)?;
    Ok(target.0 + (value - source.0) * (target.1 - target.0) / width)
}

/// Map every value of a slice from `source` to `target`.
///
/// The source interval is checked once, before any value is mapped.
pub fn remap_slice(source: (f64, f64), target: (f64, f64), values: &[f64]) -> Result<Vec<f64>> {
    let width = check_source(source)?;
    let ratio = (target.1 - target.0) / width;
    Ok(values
        .iter()
        .map(|&v| target.0 + (v - source.0) * ratio)
        .collect())
}

/// Map values from one set of bounds to another, using each in stored order.
pub fn remap_bounds(source: &AxisBounds, target: &AxisBounds, values: &[f64]) -> Result<Vec<f64>> {
    remap_slice(source.pair(), target.pair(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bounds::Orientation;

    #[test]
    fn test_remap_unit_to_range() {
        assert!((remap((0.0, 1.0), (10.0, 20.0), 0.25).unwrap() - 12.5).abs() < 1e-12);
        assert!((remap((0.0, 1.0), (10.0, 20.0), 1.0).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_remap_reversed_target() {
        // Reversed destination flips the direction of the mapping
        let v = remap((0.0, 1.0), (0.5, -0.5), 0.0).unwrap();
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_remap_zero_width_source() {
        let err = remap((3.0, 3.0), (0.0, 1.0), 3.0).unwrap_err();
        assert_eq!(err, TransformError::DivisionByZero { start: 3.0, end: 3.0 });
    }

    #[test]
    fn test_remap_slice() {
        let out = remap_slice((0.0, 1.0), (10.0, 20.0), &[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out[0] - 10.0).abs() < 1e-12);
        assert!((out[1] - 15.0).abs() < 1e-12);
        assert!((out[2] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_remap_slice_zero_width_fails_on_empty_input() {
        assert!(remap_slice((1.0, 1.0), (0.0, 1.0), &[]).is_err());
    }

    #[test]
    fn test_remap_bounds_descending_source() {
        let source = AxisBounds::new(-0.5, 0.5).with_orientation(Orientation::Descending);
        let target = AxisBounds::new(0.0, 1.0);

        let out = remap_bounds(&source, &target, &[0.5, -0.5]).unwrap();

        assert!((out[0] - 0.0).abs() < 1e-12);
        assert!((out[1] - 1.0).abs() < 1e-12);
    }
}
