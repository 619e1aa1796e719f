//! Configuration types for the normalization pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::bounds::Side;

/// Configuration for the forward/inverse transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Laterality used when the command line does not give one
    #[serde(default)]
    pub side: Side,

    /// Check the density round trip after normalizing
    #[serde(default = "default_verify_round_trip")]
    pub verify_round_trip: bool,

    /// Largest accepted density error for the round-trip check
    #[serde(default = "default_round_trip_tolerance")]
    pub round_trip_tolerance: f64,
}

fn default_verify_round_trip() -> bool {
    true
}

fn default_round_trip_tolerance() -> f64 {
    1e-9
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            side: Side::default(),
            verify_round_trip: default_verify_round_trip(),
            round_trip_tolerance: default_round_trip_tolerance(),
        }
    }
}

/// Configuration for point cloud CSV input and output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Input CSV files start with a header row
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,

    /// Field delimiter for input CSV files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Suffix of the bounds metadata file written next to each output
    #[serde(default = "default_bounds_suffix")]
    pub bounds_suffix: String,
}

fn default_has_headers() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

fn default_bounds_suffix() -> String {
    "bounds.yaml".to_string()
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            has_headers: default_has_headers(),
            delimiter: default_delimiter(),
            bounds_suffix: default_bounds_suffix(),
        }
    }
}

impl IoConfig {
    /// Delimiter as a single byte, falling back to `,` for non-ASCII characters.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub transform: TransformConfig,

    #[serde(default)]
    pub io: IoConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
