//! Coordinate transformations over 4D point clouds.
//!
//! This module provides the column-level steps the transformer is built from:
//! per-axis bounds, bounding-box centering with unit-cube scaling, density
//! min-max scaling, and the x-orientation inverse. Every function returns a
//! new cloud and leaves its input untouched.

use serde::{Deserialize, Serialize};

use super::bounds::{AxisBounds, CloudBounds, Side};
use super::cloud::PointCloud;
use super::error::{Result, TransformError};

/// Half-width of the cube normalized coordinates are scaled into.
pub const UNIT_HALF_EXTENT: f64 = 0.5;

/// Translation and scale applied to the spatial columns of a cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialFrame {
    /// Center of the original axis-aligned bounding box.
    pub center: [f64; 3],
    /// Largest absolute coordinate after centering.
    pub max_extent: f64,
    /// Factor applied to centered coordinates, `0.5 / max_extent`.
    pub scale_factor: f64,
}

/// Compute natural-order bounds of all four columns.
///
/// Returns `None` for an empty cloud.
pub fn cloud_bounds(cloud: &PointCloud) -> Option<CloudBounds> {
    Some(CloudBounds {
        x: AxisBounds::from_values(&cloud.x)?,
        y: AxisBounds::from_values(&cloud.y)?,
        z: AxisBounds::from_values(&cloud.z)?,
        density: AxisBounds::from_values(&cloud.density)?,
    })
}

/// Center the spatial columns on their bounding box and scale them into the unit cube.
///
/// The cloud is translated so the bounding-box center sits at the origin,
/// then scaled uniformly so the largest absolute coordinate becomes 0.5.
/// For `Side::Left` the x column is negated afterwards. Density is copied
/// through unchanged.
///
/// # Arguments
///
/// * `cloud` - Input point cloud
/// * `side` - Laterality deciding whether x is mirrored
///
/// # Returns
///
/// Tuple of (normalized_cloud, frame) where frame records the center and scale used
///
/// # Errors
///
/// `InvalidInput` for an empty cloud, `DegenerateCloud` if all points coincide
/// or the spatial extent overflows `f64`.
pub fn normalize_spatial(cloud: &PointCloud, side: Side) -> Result<(PointCloud, SpatialFrame)> {
    let bounds = cloud_bounds(cloud)
        .ok_or_else(|| TransformError::InvalidInput("point cloud has no points".to_string()))?;
    let center = [bounds.x.center(), bounds.y.center(), bounds.z.center()];

    let [x, y, z] = cloud.spatial_columns();
    let centered: [Vec<f64>; 3] = [
        x.iter().map(|&v| v - center[0]).collect(),
        y.iter().map(|&v| v - center[1]).collect(),
        z.iter().map(|&v| v - center[2]).collect(),
    ];

    let max_extent = centered
        .iter()
        .flat_map(|col| col.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v.abs()));

    if max_extent == 0.0 {
        return Err(TransformError::DegenerateCloud(format!(
            "all {} points coincide, spatial extent is zero",
            cloud.len()
        )));
    }

    let scale_factor = UNIT_HALF_EXTENT / max_extent;
    if !max_extent.is_finite() || scale_factor == 0.0 {
        return Err(TransformError::DegenerateCloud(format!(
            "spatial extent {} cannot be scaled into the unit cube",
            max_extent
        )));
    }

    let x_sign = match side {
        Side::Left => -1.0,
        Side::Right => 1.0,
    };

    let [cx, cy, cz] = centered;
    let normalized = PointCloud {
        x: cx.into_iter().map(|v| v * scale_factor * x_sign).collect(),
        y: cy.into_iter().map(|v| v * scale_factor).collect(),
        z: cz.into_iter().map(|v| v * scale_factor).collect(),
        density: cloud.density.clone(),
    };

    Ok((
        normalized,
        SpatialFrame {
            center,
            max_extent,
            scale_factor,
        },
    ))
}

/// Min-max scale the density column into `[0, 1]`.
///
/// Uses the density range of `cloud` itself. Spatial columns are copied
/// through unchanged.
///
/// # Errors
///
/// `InvalidInput` for an empty cloud, `DegenerateCloud` if density is constant
/// or its range overflows `f64`.
pub fn normalize_density(cloud: &PointCloud) -> Result<PointCloud> {
    let bounds = AxisBounds::from_values(&cloud.density)
        .ok_or_else(|| TransformError::InvalidInput("point cloud has no points".to_string()))?;

    if bounds.is_degenerate() {
        return Err(TransformError::DegenerateCloud(format!(
            "density is constant ({}) across all points",
            bounds.min
        )));
    }

    let range = bounds.span();
    if !range.is_finite() {
        return Err(TransformError::DegenerateCloud(format!(
            "density range {} is too wide to scale",
            bounds
        )));
    }

    Ok(PointCloud {
        x: cloud.x.clone(),
        y: cloud.y.clone(),
        z: cloud.z.clone(),
        density: cloud.density.iter().map(|&d| (d - bounds.min) / range).collect(),
    })
}

/// Reverse the x-orientation convention of a normalized cloud.
///
/// `Side::Left` adds 0.5 to x, `Side::Right` replaces x with `0.5 - x`.
/// The centering translation and the cube scale are not undone; y, z and
/// density pass through unchanged.
pub fn restore_x_orientation(cloud: &PointCloud, side: Side) -> PointCloud {
    let x = match side {
        Side::Left => cloud.x.iter().map(|&v| v + UNIT_HALF_EXTENT).collect(),
        Side::Right => cloud.x.iter().map(|&v| UNIT_HALF_EXTENT - v).collect(),
    };

    PointCloud {
        x,
        y: cloud.y.clone(),
        z: cloud.z.clone(),
        density: cloud.density.clone(),
    }
}

/// Translate the spatial columns so their mean sits at the origin.
///
/// Density is left unchanged. An empty cloud is returned as-is.
pub fn center_on_mean(cloud: &PointCloud) -> PointCloud {
    if cloud.is_empty() {
        return cloud.clone();
    }

    let n = cloud.len() as f64;
    let shift = |col: &[f64]| {
        let mean = col.iter().sum::<f64>() / n;
        col.iter().map(|&v| v - mean).collect::<Vec<f64>>()
    };

    PointCloud {
        x: shift(&cloud.x),
        y: shift(&cloud.y),
        z: shift(&cloud.z),
        density: cloud.density.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cloud() -> PointCloud {
        PointCloud::from_points(&[
            [0.0, 0.0, 0.0, 10.0],
            [4.0, 2.0, 1.0, 20.0],
            [2.0, -2.0, 3.0, 15.0],
        ])
    }

    #[test]
    fn test_cloud_bounds() {
        let bounds = cloud_bounds(&create_test_cloud()).unwrap();

        assert_eq!(bounds.x.pair(), (0.0, 4.0));
        assert_eq!(bounds.y.pair(), (-2.0, 2.0));
        assert_eq!(bounds.z.pair(), (0.0, 3.0));
        assert_eq!(bounds.density.pair(), (10.0, 20.0));
    }

    #[test]
    fn test_cloud_bounds_empty() {
        assert!(cloud_bounds(&PointCloud::new()).is_none());
    }

    #[test]
    fn test_normalize_spatial_right() {
        let (cloud, frame) = normalize_spatial(&create_test_cloud(), Side::Right).unwrap();

        // Bounding box center (2, 0, 1.5), largest centered coordinate is 2
        assert_eq!(frame.center, [2.0, 0.0, 1.5]);
        assert!((frame.max_extent - 2.0).abs() < 1e-12);
        assert!((frame.scale_factor - 0.25).abs() < 1e-12);

        assert!((cloud.x[0] + 0.5).abs() < 1e-12);
        assert!((cloud.x[1] - 0.5).abs() < 1e-12);
        assert!((cloud.y[2] + 0.5).abs() < 1e-12);
        assert!((cloud.z[2] - 0.375).abs() < 1e-12);

        // Density untouched
        assert_eq!(cloud.density, vec![10.0, 20.0, 15.0]);
    }

    #[test]
    fn test_normalize_spatial_left_mirrors_x() {
        let raw = create_test_cloud();
        let (left, _) = normalize_spatial(&raw, Side::Left).unwrap();
        let (right, _) = normalize_spatial(&raw, Side::Right).unwrap();

        for i in 0..raw.len() {
            assert!((left.x[i] + right.x[i]).abs() < 1e-12);
            assert_eq!(left.y[i], right.y[i]);
            assert_eq!(left.z[i], right.z[i]);
        }
    }

    #[test]
    fn test_normalize_spatial_coincident_points() {
        let raw = PointCloud::from_points(&[[1.0, 1.0, 1.0, 0.0], [1.0, 1.0, 1.0, 5.0]]);

        let err = normalize_spatial(&raw, Side::Left).unwrap_err();

        assert!(matches!(err, TransformError::DegenerateCloud(_)));
    }

    #[test]
    fn test_normalize_spatial_does_not_mutate_input() {
        let raw = create_test_cloud();
        let before = raw.clone();

        let _ = normalize_spatial(&raw, Side::Left).unwrap();

        assert_eq!(raw, before);
    }

    #[test]
    fn test_normalize_density() {
        let cloud = normalize_density(&create_test_cloud()).unwrap();

        assert_eq!(cloud.density, vec![0.0, 1.0, 0.5]);
        assert_eq!(cloud.x, vec![0.0, 4.0, 2.0]);
    }

    #[test]
    fn test_normalize_density_constant() {
        let raw = PointCloud::from_points(&[[0.0, 0.0, 0.0, 5.0], [1.0, 2.0, 3.0, 5.0]]);

        let err = normalize_density(&raw).unwrap_err();

        assert!(matches!(err, TransformError::DegenerateCloud(_)));
    }

    #[test]
    fn test_normalize_spatial_extreme_magnitudes() {
        let raw = PointCloud::from_points(&[[1e308, 0.0, 0.0, 1.0], [1.7e308, 1.0, 0.0, 2.0]]);

        let (cloud, frame) = normalize_spatial(&raw, Side::Right).unwrap();

        assert!(frame.center.iter().all(|c| c.is_finite()));
        assert!(frame.max_extent.is_finite());
        assert!(cloud.is_finite());
        assert!((cloud.x[0] + 0.5).abs() < 1e-12);
        assert!((cloud.x[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_spatial_full_f64_range() {
        let raw = PointCloud::from_points(&[[-f64::MAX, 0.0, 0.0, 1.0], [f64::MAX, 0.0, 0.0, 2.0]]);

        let (cloud, frame) = normalize_spatial(&raw, Side::Left).unwrap();

        assert_eq!(frame.center[0], 0.0);
        assert!(frame.scale_factor > 0.0);
        assert!((cloud.x[0] - 0.5).abs() < 1e-9);
        assert!((cloud.x[1] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_density_range_overflow() {
        let raw = PointCloud::from_points(&[[0.0, 0.0, 0.0, -1e308], [1.0, 0.0, 0.0, 1e308]]);

        let err = normalize_density(&raw).unwrap_err();

        assert!(matches!(err, TransformError::DegenerateCloud(_)));
    }

    #[test]
    fn test_restore_x_orientation() {
        let cloud = PointCloud::from_points(&[[-0.5, 0.1, 0.2, 0.3], [0.25, 0.0, 0.0, 1.0]]);

        let left = restore_x_orientation(&cloud, Side::Left);
        let right = restore_x_orientation(&cloud, Side::Right);

        assert_eq!(left.x, vec![0.0, 0.75]);
        assert_eq!(right.x, vec![1.0, 0.25]);
        assert_eq!(left.y, cloud.y);
        assert_eq!(right.density, cloud.density);
    }

    #[test]
    fn test_center_on_mean() {
        let cloud = PointCloud::from_points(&[[0.0, 1.0, 2.0, 7.0], [2.0, 3.0, 4.0, 9.0]]);

        let centered = center_on_mean(&cloud);

        assert_eq!(centered.x, vec![-1.0, 1.0]);
        assert_eq!(centered.y, vec![-1.0, 1.0]);
        assert_eq!(centered.z, vec![-1.0, 1.0]);
        assert_eq!(centered.density, vec![7.0, 9.0]);
    }

    #[test]
    fn test_center_on_mean_empty() {
        assert!(center_on_mean(&PointCloud::new()).is_empty());
    }
}
