//! Point cloud transform and file processing.

pub mod batch;
pub mod transformer;

// Re-export key types for convenience
pub use batch::{
    denormalize_file, find_cloud_csvs, normalize_directory, normalize_file, BatchError,
    BatchOutcome,
};
pub use transformer::PointCloudTransformer;
