//! File-level normalization and denormalization, single and batched.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::core::bounds::{BoundsReport, Side};
use crate::core::cloud::PointCloud;
use crate::core::loaders::{load_bounds_yaml, load_cloud_csv};
use crate::core::remap::remap_bounds;
use crate::core::writers::{write_bounds_yaml, write_cloud_csv};
use crate::processors::transformer::PointCloudTransformer;

/// Errors that can occur while discovering batch inputs.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No CSV files found in {folder}")]
    NoFilesFound { folder: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of normalizing one file in a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bounds: PathBuf,
    /// Point count on success, error message on failure.
    pub result: std::result::Result<usize, String>,
}

impl BatchOutcome {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Path of the bounds file written alongside `output`: `<stem>_<suffix>`.
pub fn bounds_path_for(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "cloud".to_string());
    output.with_file_name(format!("{}_{}", stem, suffix))
}

/// List `*.csv` files directly inside `directory`, sorted by path.
pub fn find_cloud_csvs(directory: &Path) -> std::result::Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(directory).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BatchError::DirectoryNotFound(directory.to_path_buf())
        } else {
            BatchError::Io {
                path: directory.to_path_buf(),
                source,
            }
        }
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| BatchError::Io {
                path: directory.to_path_buf(),
                source,
            })?
            .path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            folder: directory.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

/// Normalize one point cloud CSV and write the result with its bounds.
///
/// # Arguments
///
/// * `input` - Raw point cloud CSV
/// * `output` - Normalized point cloud CSV to write
/// * `bounds` - Bounds YAML to write
/// * `side` - Laterality of the cloud
/// * `config` - Pipeline configuration
///
/// # Returns
///
/// The bounds report that was written.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    bounds: &Path,
    side: Side,
    config: &PipelineConfig,
) -> Result<BoundsReport> {
    let raw = load_cloud_csv(input, &config.io)
        .with_context(|| format!("Failed to load point cloud: {}", input.display()))?;

    let transformer = PointCloudTransformer::new(&raw, side)
        .with_context(|| format!("Failed to normalize {}", input.display()))?;

    if config.transform.verify_round_trip {
        let residual = transformer.density_residual(&raw)?;
        if residual > config.transform.round_trip_tolerance {
            warn!(
                "{}: density round-trip error {:e} exceeds tolerance {:e}",
                input.display(),
                residual,
                config.transform.round_trip_tolerance
            );
        }
    }

    // A normalized CSV is never left on disk without its bounds
    let report = transformer.report();
    write_bounds_yaml(bounds, &report)?;
    if let Err(e) = write_cloud_csv(output, transformer.normalized_cloud()) {
        if let Err(cleanup) = fs::remove_file(bounds) {
            warn!("Failed to remove {}: {}", bounds.display(), cleanup);
        }
        return Err(e.into());
    }

    info!(
        "{} -> {} ({} points, {} side)",
        input.display(),
        output.display(),
        report.point_count,
        side
    );

    Ok(report)
}

/// Map a cloud in normalized space back to original density units.
///
/// The transformer is rebuilt from the raw cloud the normalized data came
/// from, then [`PointCloudTransformer::un_normalize`] is applied.
///
/// # Returns
///
/// The number of points written.
pub fn denormalize_file(
    raw_input: &Path,
    normalized_input: &Path,
    output: &Path,
    side: Side,
    config: &PipelineConfig,
) -> Result<usize> {
    let raw = load_cloud_csv(raw_input, &config.io)
        .with_context(|| format!("Failed to load raw point cloud: {}", raw_input.display()))?;
    let transformer = PointCloudTransformer::new(&raw, side)
        .with_context(|| format!("Failed to normalize {}", raw_input.display()))?;

    let normalized = load_cloud_csv(normalized_input, &config.io).with_context(|| {
        format!(
            "Failed to load normalized point cloud: {}",
            normalized_input.display()
        )
    })?;

    let restored = transformer.un_normalize(&normalized)?;
    write_cloud_csv(output, &restored)?;

    info!(
        "{} -> {} ({} points)",
        normalized_input.display(),
        output.display(),
        restored.len()
    );

    Ok(restored.len())
}

/// Map a cloud in normalized space back to original density units using a
/// bounds report written by [`normalize_file`].
///
/// Density is remapped from the report's normalized density range to its
/// original range. x, y and z are copied through unchanged, as in
/// [`PointCloudTransformer::un_normalize`].
///
/// # Returns
///
/// The number of points written.
pub fn denormalize_with_bounds(
    bounds: &Path,
    normalized_input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<usize> {
    let report = load_bounds_yaml(bounds)
        .with_context(|| format!("Failed to load bounds: {}", bounds.display()))?;

    let normalized = load_cloud_csv(normalized_input, &config.io).with_context(|| {
        format!(
            "Failed to load normalized point cloud: {}",
            normalized_input.display()
        )
    })?;

    let density = remap_bounds(
        &report.normalized.density,
        &report.original.density,
        &normalized.density,
    )
    .with_context(|| format!("Invalid density bounds in {}", bounds.display()))?;

    let restored = PointCloud {
        density,
        ..normalized
    };
    write_cloud_csv(output, &restored)?;

    info!(
        "{} -> {} ({} points, {} side bounds)",
        normalized_input.display(),
        output.display(),
        restored.len(),
        report.side
    );

    Ok(restored.len())
}

/// Normalize every CSV in a directory in parallel.
///
/// Each file gets its own transformer. A failing file is recorded in its
/// outcome and does not stop the rest of the batch.
///
/// # Arguments
///
/// * `input_dir` - Directory containing raw point cloud CSVs
/// * `output_dir` - Directory for `<stem>_normalized.csv` and bounds files
/// * `side` - Laterality applied to every file
/// * `config` - Pipeline configuration
///
/// # Returns
///
/// One outcome per input file, in sorted input order.
pub fn normalize_directory(
    input_dir: &Path,
    output_dir: &Path,
    side: Side,
    config: &PipelineConfig,
) -> Result<Vec<BatchOutcome>> {
    let inputs = find_cloud_csvs(input_dir)?;
    info!("Found {} point cloud CSVs in {}", inputs.len(), input_dir.display());

    let outcomes: Vec<BatchOutcome> = inputs
        .par_iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let output = output_dir.join(format!("{}_normalized.csv", stem));
            let bounds = output_dir.join(format!("{}_{}", stem, config.io.bounds_suffix));

            let result = normalize_file(input, &output, &bounds, side, config)
                .map(|report| report.point_count)
                .map_err(|e| {
                    warn!("{}: {:#}", input.display(), e);
                    format!("{:#}", e)
                });

            BatchOutcome {
                input: input.clone(),
                output,
                bounds,
                result,
            }
        })
        .collect();

    Ok(outcomes)
}
