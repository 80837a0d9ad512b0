//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Window sizes pooled by default.
pub const DEFAULT_POOL_SIZES: [usize; 6] = [3, 5, 7, 11, 15, 21];

/// Exponent applied to each window element by default.
pub const DEFAULT_POWER: f64 = 2.0;

/// Convolution and pooling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Exponent each window element is raised to before summing
    pub power: f64,

    /// Window sizes averaged by the pooling pass
    pub pool_sizes: Vec<usize>,

    /// Compute convolution cells on the rayon thread pool.
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            pool_sizes: DEFAULT_POOL_SIZES.to_vec(),
            parallel: true,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the generated PNGs. Defaults to the input's directory.
    pub dir: Option<PathBuf>,

    /// Render the difference map through the pink colormap
    pub diff_colormap: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
