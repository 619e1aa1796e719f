//! Data loaders for 4D point cloud CSV files and bounds metadata.
//!
//! Point cloud CSVs hold one point per record with four numeric fields.
//! When a header row is present, columns named `x`, `y`, `z` and `density`
//! (or `intensity`) are matched case-insensitively; otherwise the fields are
//! taken positionally.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

use super::bounds::BoundsReport;
use super::cloud::{PointCloud, POINT_DIM};
use crate::config::IoConfig;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("Missing required columns: {0}")]
    MissingColumns(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Resolve the record index of each of x, y, z, density from a header row.
fn column_indices(headers: &csv::StringRecord) -> [usize; POINT_DIM] {
    let col_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect();

    let named = [
        col_map.get("x").copied(),
        col_map.get("y").copied(),
        col_map.get("z").copied(),
        col_map
            .get("density")
            .or_else(|| col_map.get("intensity"))
            .copied(),
    ];

    match named {
        [Some(x), Some(y), Some(z), Some(d)] => [x, y, z, d],
        _ => [0, 1, 2, 3],
    }
}

/// Load a 4D point cloud from a CSV file.
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `config` - Header and delimiter settings
///
/// # Returns
///
/// A `PointCloud` with points in file order.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a record does not have
/// exactly four fields, a field is not a number, or there are no records.
pub fn load_cloud_csv<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(config.has_headers)
        .delimiter(config.delimiter_byte())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let indices = if config.has_headers {
        column_indices(reader.headers()?)
    } else {
        [0, 1, 2, 3]
    };

    let mut cloud = PointCloud::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;

        if record.len() != POINT_DIM {
            return Err(LoaderError::MissingColumns(format!(
                "{}: record {} has {} fields, expected {}",
                path.display(),
                row,
                record.len(),
                POINT_DIM
            )));
        }

        let mut point = [0.0_f64; POINT_DIM];
        for (value, &idx) in point.iter_mut().zip(&indices) {
            let field = record.get(idx).unwrap_or_default();
            *value = field.parse().map_err(|_| {
                LoaderError::ParseError(format!(
                    "{}: record {} field {} is not a number: '{}'",
                    path.display(),
                    row,
                    idx,
                    field
                ))
            })?;
        }

        let [x, y, z, d] = point;
        cloud.push(x, y, z, d);
    }

    if cloud.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(cloud)
}

/// Load a bounds report previously written with `write_bounds_yaml`.
pub fn load_bounds_yaml<P: AsRef<Path>>(path: P) -> Result<BoundsReport> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_cloud_csv() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,z,density").unwrap();
        writeln!(file, "1.0,2.0,3.0,10").unwrap();
        writeln!(file, "4.0,5.0,6.0,20").unwrap();
        file.flush().unwrap();

        let cloud = load_cloud_csv(file.path(), &IoConfig::default())?;
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.x[0], 1.0);
        assert_eq!(cloud.z[1], 6.0);
        assert_eq!(cloud.density, vec![10.0, 20.0]);

        Ok(())
    }

    #[test]
    fn test_load_cloud_csv_named_columns_reordered() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Intensity, Z, Y, X").unwrap();
        writeln!(file, "7.5, 3.0, 2.0, 1.0").unwrap();
        file.flush().unwrap();

        let cloud = load_cloud_csv(file.path(), &IoConfig::default())?;
        assert_eq!(cloud.point(0), Some([1.0, 2.0, 3.0, 7.5]));

        Ok(())
    }

    #[test]
    fn test_load_cloud_csv_no_header_semicolon() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1;2;3;4").unwrap();
        writeln!(file, "5;6;7;8").unwrap();
        file.flush().unwrap();

        let config = IoConfig {
            has_headers: false,
            delimiter: ';',
            ..IoConfig::default()
        };
        let cloud = load_cloud_csv(file.path(), &config)?;
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.density, vec![4.0, 8.0]);

        Ok(())
    }

    #[test]
    fn test_load_cloud_csv_wrong_width() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,z,density").unwrap();
        writeln!(file, "1.0,2.0,3.0").unwrap();
        file.flush().unwrap();

        let result = load_cloud_csv(file.path(), &IoConfig::default());
        assert!(matches!(result, Err(LoaderError::MissingColumns(_))));
    }

    #[test]
    fn test_load_cloud_csv_bad_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,z,density").unwrap();
        writeln!(file, "1.0,abc,3.0,4.0").unwrap();
        file.flush().unwrap();

        let result = load_cloud_csv(file.path(), &IoConfig::default());
        assert!(matches!(result, Err(LoaderError::ParseError(_))));
    }

    #[test]
    fn test_load_cloud_csv_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,z,density").unwrap();
        file.flush().unwrap();

        let result = load_cloud_csv(file.path(), &IoConfig::default());
        assert!(matches!(result, Err(LoaderError::EmptyFile(_))));
    }
}
