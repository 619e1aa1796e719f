//! Core data types, numeric primitives and I/O operations.

pub mod bounds;
pub mod cloud;
pub mod error;
pub mod loaders;
pub mod remap;
pub mod transforms;
pub mod writers;

pub use bounds::{AxisBounds, BoundsReport, CloudBounds, Orientation, Side};
pub use cloud::PointCloud;
pub use error::TransformError;
pub use loaders::{load_bounds_yaml, load_cloud_csv, LoaderError};
pub use writers::{write_bounds_yaml, write_cloud_csv, WriteError};
