//! Column-oriented 4D point cloud container.

use super::error::{Result, TransformError};

/// Number of columns in a point record: x, y, z, density.
pub const POINT_DIM: usize = 4;

/// Container for 4D point cloud data.
///
/// Point order is significant and preserved by every transform in this crate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// X coordinates of all points.
    pub x: Vec<f64>,
    /// Y coordinates of all points.
    pub y: Vec<f64>,
    /// Z coordinates of all points.
    pub z: Vec<f64>,
    /// Density/intensity value of each point.
    pub density: Vec<f64>,
}

impl PointCloud {
    /// Creates a new empty point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            density: Vec::with_capacity(capacity),
        }
    }

    /// Creates a point cloud from its four columns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the columns differ in length.
    pub fn from_columns(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, density: Vec<f64>) -> Result<Self> {
        let cloud = Self { x, y, z, density };
        cloud.check_columns()?;
        Ok(cloud)
    }

    /// Check that all four columns hold the same number of values.
    ///
    /// The columns are public, so a cloud built field by field can be ragged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` listing the column lengths if they differ.
    pub fn check_columns(&self) -> Result<()> {
        let n = self.x.len();
        if self.y.len() != n || self.z.len() != n || self.density.len() != n {
            return Err(TransformError::InvalidInput(format!(
                "column lengths differ: x={}, y={}, z={}, density={}",
                n,
                self.y.len(),
                self.z.len(),
                self.density.len()
            )));
        }
        Ok(())
    }

    /// Creates a point cloud from fixed-size `[x, y, z, density]` rows.
    pub fn from_points(points: &[[f64; POINT_DIM]]) -> Self {
        let mut cloud = Self::with_capacity(points.len());
        for &[x, y, z, d] in points {
            cloud.push(x, y, z, d);
        }
        cloud
    }

    /// Creates a point cloud from dynamically sized rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first row that does not have exactly
    /// four values.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let mut cloud = Self::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match row.as_ref() {
                &[x, y, z, d] => cloud.push(x, y, z, d),
                other => {
                    return Err(TransformError::InvalidInput(format!(
                        "row {} has {} columns, expected {}",
                        i,
                        other.len(),
                        POINT_DIM
                    )))
                }
            }
        }
        Ok(cloud)
    }

    /// Returns the number of points in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Adds a point to the cloud.
    #[inline]
    pub fn push(&mut self, x: f64, y: f64, z: f64, density: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.density.push(density);
    }

    /// Returns point `i` as `[x, y, z, density]`.
    pub fn point(&self, i: usize) -> Option<[f64; POINT_DIM]> {
        Some([
            *self.x.get(i)?,
            *self.y.get(i)?,
            *self.z.get(i)?,
            *self.density.get(i)?,
        ])
    }

    /// Iterates over points in order, stopping at the shortest column.
    pub fn iter(&self) -> impl Iterator<Item = [f64; POINT_DIM]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .zip(&self.density)
            .map(|(((&x, &y), &z), &d)| [x, y, z, d])
    }

    /// Converts the cloud to a vector of `[x, y, z, density]` rows.
    pub fn to_rows(&self) -> Vec<[f64; POINT_DIM]> {
        self.iter().collect()
    }

    /// Spatial columns as `[x, y, z]` coordinate arrays.
    pub fn to_coords(&self) -> Vec<[f64; 3]> {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| [x, y, z])
            .collect()
    }

    /// Spatial columns, borrowed in x, y, z order.
    #[inline]
    pub fn spatial_columns(&self) -> [&[f64]; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// True if every value in every column is finite.
    pub fn is_finite(&self) -> bool {
        [&self.x, &self.y, &self.z, &self.density]
            .iter()
            .all(|col| col.iter().all(|v| v.is_finite()))
    }
}
