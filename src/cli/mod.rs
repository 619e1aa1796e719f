//! Command-line interface for point cloud normalization.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::bounds::{CloudBounds, Side};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "medscan-normalize")]
#[command(about = "Normalize 4D point clouds into a canonical unit frame and back", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a point cloud CSV (x, y, z, density)
    Normalize {
        /// Input CSV file, or directory with --batch
        input_path: PathBuf,
        /// Output CSV file, or directory with --batch
        output_path: PathBuf,
        /// Anatomical side: left or right (defaults to the config value)
        #[arg(short, long)]
        side: Option<String>,
        /// Bounds YAML path (defaults to <output stem>_<bounds suffix>)
        #[arg(short, long)]
        bounds: Option<PathBuf>,
        /// Process an entire directory
        #[arg(long)]
        batch: bool,
    },

    /// Map a normalized point cloud back to original density units
    Denormalize {
        /// Point cloud CSV in normalized space
        normalized_path: PathBuf,
        /// Output CSV file
        output_path: PathBuf,
        /// Raw point cloud CSV the normalization was derived from
        #[arg(short, long, required_unless_present = "bounds", conflicts_with = "bounds")]
        raw: Option<PathBuf>,
        /// Bounds YAML written by `normalize`, used instead of the raw cloud
        #[arg(short, long)]
        bounds: Option<PathBuf>,
        /// Anatomical side: left or right (defaults to the config value)
        #[arg(short, long)]
        side: Option<String>,
    },

    /// Print original and normalized bounds of a point cloud
    Bounds {
        /// Input CSV file
        input_path: PathBuf,
        /// Anatomical side: left or right (defaults to the config value)
        #[arg(short, long)]
        side: Option<String>,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 37 {
            format!("{}...", value.chars().take(34).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<37} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Resolve the side from the command line, falling back to the config.
fn resolve_side(arg: Option<&str>, config: &PipelineConfig) -> Side {
    match arg {
        Some(s) => match s.parse() {
            Ok(side) => side,
            Err(e) => {
                error!("{}", e);
                std::process::exit(2);
            }
        },
        None => config.transform.side,
    }
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Normalize { input_path, output_path, side, bounds, batch } => {
            let side = resolve_side(side.as_deref(), &config);
            if batch {
                cmd_normalize_batch(&input_path, &output_path, side, &config);
            } else {
                cmd_normalize(&input_path, &output_path, bounds, side, &config);
            }
        }
        Commands::Denormalize { normalized_path, output_path, raw, bounds, side } => {
            let source = match (raw, bounds) {
                (_, Some(bounds)) => DenormalizeSource::Bounds(bounds),
                (Some(raw), None) => {
                    DenormalizeSource::Raw(raw, resolve_side(side.as_deref(), &config))
                }
                (None, None) => {
                    error!("denormalize needs --raw or --bounds");
                    std::process::exit(2);
                }
            };
            cmd_denormalize(&source, &normalized_path, &output_path, &config);
        }
        Commands::Bounds { input_path, side } => {
            let side = resolve_side(side.as_deref(), &config);
            cmd_bounds(&input_path, side, &config);
        }
    }
}

fn cmd_normalize(
    input: &Path,
    output: &Path,
    bounds: Option<PathBuf>,
    side: Side,
    config: &PipelineConfig,
) {
    use crate::processors::batch;

    let start = Instant::now();
    let bounds_path =
        bounds.unwrap_or_else(|| batch::bounds_path_for(output, &config.io.bounds_suffix));

    let spinner = create_spinner("Normalizing point cloud...");

    match batch::normalize_file(input, output, &bounds_path, side, config) {
        Ok(report) => {
            spinner.finish_and_clear();
            print_summary(
                "Normalization Complete",
                &[
                    ("Input file", input.display().to_string()),
                    ("Output CSV", output.display().to_string()),
                    ("Bounds YAML", bounds_path.display().to_string()),
                    ("Side", side.to_string()),
                    ("Points", report.point_count.to_string()),
                    ("Scale factor", format!("{:.6}", report.scale_factor)),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Normalization failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_normalize_batch(input_dir: &Path, output_dir: &Path, side: Side, config: &PipelineConfig) {
    use crate::processors::batch;

    let start = Instant::now();
    let spinner = create_spinner("Normalizing point clouds...");

    match batch::normalize_directory(input_dir, output_dir, side, config) {
        Ok(outcomes) => {
            spinner.finish_and_clear();

            let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
            let failed = outcomes.len() - succeeded;
            for outcome in outcomes.iter() {
                if let Err(msg) = &outcome.result {
                    error!("{}: {}", outcome.input.display(), msg);
                }
            }

            print_summary(
                "Batch Normalization Complete",
                &[
                    ("Input directory", input_dir.display().to_string()),
                    ("Output directory", output_dir.display().to_string()),
                    ("Side", side.to_string()),
                    ("Files normalized", succeeded.to_string()),
                    ("Files failed", failed.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );

            if failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Batch normalization failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Where denormalization takes the original density range from.
enum DenormalizeSource {
    /// Rebuild the transform from the raw cloud.
    Raw(PathBuf, Side),
    /// Read a stored bounds report.
    Bounds(PathBuf),
}

fn cmd_denormalize(
    source: &DenormalizeSource,
    normalized: &Path,
    output: &Path,
    config: &PipelineConfig,
) {
    use crate::processors::batch;

    let start = Instant::now();
    let spinner = create_spinner("Restoring original density units...");

    let (result, source_row) = match source {
        DenormalizeSource::Raw(raw, side) => (
            batch::denormalize_file(raw, normalized, output, *side, config),
            ("Raw file", raw.display().to_string()),
        ),
        DenormalizeSource::Bounds(bounds) => (
            batch::denormalize_with_bounds(bounds, normalized, output, config),
            ("Bounds YAML", bounds.display().to_string()),
        ),
    };

    match result {
        Ok(n_points) => {
            spinner.finish_and_clear();
            print_summary(
                "Denormalization Complete",
                &[
                    source_row,
                    ("Normalized file", normalized.display().to_string()),
                    ("Output CSV", output.display().to_string()),
                    ("Points", n_points.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Denormalization failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn bounds_rows(bounds: &CloudBounds) -> Vec<(&'static str, String)> {
    vec![
        ("x", bounds.x.to_string()),
        ("y", bounds.y.to_string()),
        ("z", bounds.z.to_string()),
        ("density", bounds.density.to_string()),
    ]
}

fn cmd_bounds(input: &Path, side: Side, config: &PipelineConfig) {
    use crate::core::loaders;
    use crate::processors::transformer::PointCloudTransformer;

    let cloud = match loaders::load_cloud_csv(input, &config.io) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load point cloud: {}", e);
            std::process::exit(1);
        }
    };

    let transformer = match PointCloudTransformer::new(&cloud, side) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to normalize {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };

    print_summary(
        &format!("Original bounds ({} points)", cloud.len()),
        &bounds_rows(transformer.original_bounds()),
    );
    print_summary(
        &format!("Normalized bounds ({} side)", side),
        &bounds_rows(transformer.normalized_bounds()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize_with_bounds_args() {
        let cli = Cli::try_parse_from([
            "medscan-normalize",
            "denormalize",
            "pred.csv",
            "restored.csv",
            "--bounds",
            "scan_bounds.yaml",
        ])
        .unwrap();

        match cli.command {
            Commands::Denormalize { raw, bounds, .. } => {
                assert!(raw.is_none());
                assert_eq!(bounds, Some(PathBuf::from("scan_bounds.yaml")));
            }
            _ => panic!("Expected denormalize command"),
        }
    }

    #[test]
    fn test_denormalize_requires_raw_or_bounds() {
        let result = Cli::try_parse_from(["medscan-normalize", "denormalize", "pred.csv", "out.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_denormalize_raw_and_bounds_conflict() {
        let result = Cli::try_parse_from([
            "medscan-normalize",
            "denormalize",
            "pred.csv",
            "out.csv",
            "--raw",
            "raw.csv",
            "--bounds",
            "b.yaml",
        ]);
        assert!(result.is_err());
    }
}
