//! Data writers for point cloud CSV and bounds metadata.
//!
//! - CSV with `x,y,z,density` columns
//! - YAML bounds report for mapping results back to original units

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::cloud::PointCloud;
use super::bounds::BoundsReport;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// YAML serialization error.
    #[error("YAML write error for '{path}': {source}")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write a 4D point cloud to CSV.
///
/// Values are written with full `f64` precision so a written cloud loads
/// back bit-for-bit.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `cloud` - Point cloud to write
///
/// # Errors
///
/// Returns an error if:
/// - Parent directories cannot be created
/// - File cannot be created or written to
///
/// # Example
///
/// ```no_run
/// use medscan_normalize::core::cloud::PointCloud;
/// use medscan_normalize::core::writers::write_cloud_csv;
/// use std::path::Path;
///
/// let cloud = PointCloud::from_points(&[[0.0, 0.0, 0.0, 1.0]]);
/// write_cloud_csv(Path::new("normalized.csv"), &cloud).unwrap();
/// ```
pub fn write_cloud_csv(path: &Path, cloud: &PointCloud) -> Result<()> {
    ensure_parent_dirs(path)?;

    let path_str = path.display().to_string();
    let mut csv_writer = csv::Writer::from_writer(create_buffered_writer(path)?);

    csv_writer
        .write_record(["x", "y", "z", "density"])
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for point in cloud.iter() {
        csv_writer
            .write_record(point.iter().map(|v| v.to_string()))
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Write a bounds report as YAML.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or the file cannot
/// be created or written to.
pub fn write_bounds_yaml(path: &Path, report: &BoundsReport) -> Result<()> {
    ensure_parent_dirs(path)?;

    let path_str = path.display().to_string();
    let content = serde_yaml::to_string(report).map_err(|e| WriteError::YamlError {
        path: path_str.clone(),
        source: e,
    })?;

    let mut writer = create_buffered_writer(path)?;
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| WriteError::WriteFile {
            path: path_str,
            source: e,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IoConfig;
    use crate::core::bounds::Side;
    use crate::core::loaders::{load_bounds_yaml, load_cloud_csv};
    use crate::processors::transformer::PointCloudTransformer;
    use tempfile::tempdir;

    fn create_test_cloud() -> PointCloud {
        PointCloud::from_points(&[
            [1.0, 4.0, 7.0, 0.1],
            [2.0, 5.0, 8.0, 0.2],
            [3.0, 6.0, 9.0, 0.3],
        ])
    }

    #[test]
    fn test_write_cloud_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.csv");

        write_cloud_csv(&path, &create_test_cloud()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "x,y,z,density");
        assert_eq!(lines.len(), 4); // header + 3 data rows
        assert_eq!(lines[1], "1,4,7,0.1");
    }

    #[test]
    fn test_write_cloud_csv_reloads_exactly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.csv");
        let cloud = PointCloud::from_points(&[[0.1 + 0.2, -1.0 / 3.0, 1e-17, 12345.678]]);

        write_cloud_csv(&path, &cloud).unwrap();
        let loaded = load_cloud_csv(&path, &IoConfig::default()).unwrap();

        assert_eq!(loaded, cloud);
    }

    #[test]
    fn test_write_cloud_csv_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("nested").join("test.csv");

        write_cloud_csv(&path, &create_test_cloud()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_bounds_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bounds.yaml");
        let raw = PointCloud::from_points(&[[0.0, 0.0, 0.0, 10.0], [2.0, 0.0, 0.0, 20.0]]);
        let report = PointCloudTransformer::new(&raw, Side::Right).unwrap().report();

        write_bounds_yaml(&path, &report).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("side: right"));
        assert!(content.contains("orientation: descending"));

        let loaded = load_bounds_yaml(&path).unwrap();
        assert_eq!(loaded, report);
    }
}
