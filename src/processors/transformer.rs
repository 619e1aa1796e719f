//! Bidirectional point cloud transform with bounds bookkeeping.
//!
//! [`PointCloudTransformer`] normalizes a raw cloud once at construction and
//! keeps the bounds needed to map results from normalized space back to
//! original units. It is immutable after construction and can be shared
//! across threads for read-only queries.

use log::debug;

use crate::core::bounds::{BoundsReport, CloudBounds, Side};
use crate::core::cloud::PointCloud;
use crate::core::error::{Result, TransformError};
use crate::core::remap::remap_bounds;
use crate::core::transforms::{
    cloud_bounds, normalize_density, normalize_spatial, restore_x_orientation, SpatialFrame,
};

/// Normalizer for one 4D point cloud and one laterality.
#[derive(Debug, Clone)]
pub struct PointCloudTransformer {
    side: Side,
    original_bounds: CloudBounds,
    normalized_bounds: CloudBounds,
    normalized_cloud: PointCloud,
    frame: SpatialFrame,
}

impl PointCloudTransformer {
    /// Normalize `raw_cloud` for the given side.
    ///
    /// Spatial columns are centered on their bounding box, scaled into
    /// `[-0.5, 0.5]^3` and mirrored in x for the left side. Density is
    /// min-max scaled into `[0, 1]`. The input is never modified.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the cloud is empty, ragged or holds non-finite values
    /// * `DegenerateCloud` - all points coincide, density is constant, or a
    ///   range is too wide to represent
    pub fn new(raw_cloud: &PointCloud, side: Side) -> Result<Self> {
        raw_cloud.check_columns()?;
        if raw_cloud.is_empty() {
            return Err(TransformError::InvalidInput(
                "point cloud must contain at least one point".to_string(),
            ));
        }
        if !raw_cloud.is_finite() {
            return Err(TransformError::InvalidInput(
                "point cloud contains non-finite values".to_string(),
            ));
        }

        let original_bounds = cloud_bounds(raw_cloud)
            .ok_or_else(|| TransformError::InvalidInput("point cloud has no points".to_string()))?;

        let (spatial, frame) = normalize_spatial(raw_cloud, side)?;
        debug!(
            "{} side: center {:?}, max extent {}, scale factor {}",
            side, frame.center, frame.max_extent, frame.scale_factor
        );

        let normalized_cloud = normalize_density(&spatial)?;

        let mut normalized_bounds = cloud_bounds(&normalized_cloud)
            .ok_or_else(|| TransformError::InvalidInput("point cloud has no points".to_string()))?;
        normalized_bounds.x = normalized_bounds.x.with_orientation(side.x_orientation());

        debug!(
            "normalized {} points, x bounds {} -> {}",
            raw_cloud.len(),
            original_bounds.x,
            normalized_bounds.x
        );

        Ok(Self {
            side,
            original_bounds,
            normalized_bounds,
            normalized_cloud,
            frame,
        })
    }

    /// Build from dynamically shaped rows and a textual side, validating both.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a row is not 4 wide or `side` is not `left`/`right`,
    /// plus everything [`PointCloudTransformer::new`] can return.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], side: &str) -> Result<Self> {
        let side: Side = side.parse()?;
        let cloud = PointCloud::from_rows(rows)?;
        Self::new(&cloud, side)
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Natural-order bounds of the raw input.
    #[inline]
    pub fn original_bounds(&self) -> &CloudBounds {
        &self.original_bounds
    }

    /// Bounds of the normalized cloud. The x axis is descending for the right side.
    #[inline]
    pub fn normalized_bounds(&self) -> &CloudBounds {
        &self.normalized_bounds
    }

    #[inline]
    pub fn normalized_cloud(&self) -> &PointCloud {
        &self.normalized_cloud
    }

    /// Bounding-box center and scale used by the forward spatial transform.
    #[inline]
    pub fn frame(&self) -> &SpatialFrame {
        &self.frame
    }

    /// Original spatial bounds as three `[start, end]` rows.
    pub fn original_space_bounds(&self) -> [[f64; 2]; 3] {
        self.original_bounds.space_bounds()
    }

    /// Normalized spatial bounds as three `[start, end]` rows in stored order.
    pub fn normalized_space_bounds(&self) -> [[f64; 2]; 3] {
        self.normalized_bounds.space_bounds()
    }

    /// Map the density column of a normalized cloud back to original units.
    ///
    /// x, y and z are copied through unchanged. Returns a new cloud.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the columns of `point_cloud` differ in length
    /// * `DivisionByZero` - the normalized density bounds are degenerate
    pub fn un_normalize(&self, point_cloud: &PointCloud) -> Result<PointCloud> {
        point_cloud.check_columns()?;
        let density = remap_bounds(
            &self.normalized_bounds.density,
            &self.original_bounds.density,
            &point_cloud.density,
        )?;

        Ok(PointCloud {
            x: point_cloud.x.clone(),
            y: point_cloud.y.clone(),
            z: point_cloud.z.clone(),
            density,
        })
    }

    /// Undo the x-orientation offset for this transformer's side.
    ///
    /// Only the orientation convention is reversed; centering and scale are not.
    /// Not applied by [`PointCloudTransformer::un_normalize`].
    pub fn restore_x_orientation(&self, point_cloud: &PointCloud) -> PointCloud {
        restore_x_orientation(point_cloud, self.side)
    }

    /// Largest absolute density error after un-normalizing the normalized cloud.
    ///
    /// `raw_cloud` must be the cloud this transformer was built from.
    pub fn density_residual(&self, raw_cloud: &PointCloud) -> Result<f64> {
        if raw_cloud.len() != self.normalized_cloud.len() {
            return Err(TransformError::InvalidInput(format!(
                "expected {} points, got {}",
                self.normalized_cloud.len(),
                raw_cloud.len()
            )));
        }

        let restored = self.un_normalize(&self.normalized_cloud)?;
        Ok(restored
            .density
            .iter()
            .zip(&raw_cloud.density)
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs())))
    }

    pub fn report(&self) -> BoundsReport {
        BoundsReport {
            side: self.side,
            point_count: self.normalized_cloud.len(),
            original: self.original_bounds,
            normalized: self.normalized_bounds,
            center: self.frame.center,
            scale_factor: self.frame.scale_factor,
        }
    }
}
