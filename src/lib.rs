//! Normalization of 4D point clouds (x, y, z, density) into a canonical frame.
//!
//! This crate provides tools for:
//! - Centering and scaling spatial coordinates into the unit cube `[-0.5, 0.5]^3`,
//!   mirroring x for left-side anatomy
//! - Min-max scaling density into `[0, 1]`
//! - Keeping original and normalized bounds so density can be mapped back
//! - Loading and writing point cloud CSVs and bounds metadata
//!
//! # Example
//!
//! ```
//! use medscan_normalize::{PointCloud, PointCloudTransformer, Side};
//!
//! let raw = PointCloud::from_points(&[[0.0, 0.0, 0.0, 10.0], [2.0, 0.0, 0.0, 20.0]]);
//! let transformer = PointCloudTransformer::new(&raw, Side::Right).unwrap();
//!
//! assert_eq!(transformer.normalized_cloud().x, vec![-0.5, 0.5]);
//! assert_eq!(transformer.normalized_bounds().x.pair(), (0.5, -0.5));
//!
//! let restored = transformer.un_normalize(transformer.normalized_cloud()).unwrap();
//! assert_eq!(restored.density, vec![10.0, 20.0]);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{IoConfig, PipelineConfig, TransformConfig};
pub use crate::core::bounds::{AxisBounds, CloudBounds, Orientation, Side};
pub use crate::core::cloud::PointCloud;
pub use crate::core::error::TransformError;
pub use processors::transformer::PointCloudTransformer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
