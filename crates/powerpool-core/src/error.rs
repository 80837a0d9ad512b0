//! Error types for the powerpool filter pipeline.
//!
//! Errors are grouped by concern: the numeric filters, image file I/O, and
//! configuration. Each carries enough context (sizes, shapes, paths) to be
//! reported to a user without further lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for powerpool operations.
#[derive(Error, Debug)]
pub enum PowerPoolError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Convolution, pooling or difference errors
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Image decode/encode errors
    #[error("Image I/O error: {0}")]
    Image(#[from] ImageIoError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by the numeric filters.
///
/// All of these are detected before any array scan starts, so a failing
/// operation never produces a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Window size of zero
    #[error("Invalid window size {size}: must be >= 1")]
    InvalidWindowSize { size: usize },

    /// Window leaves no fully covered pixel
    #[error("Window size {size} too large for {rows}x{cols} image")]
    WindowTooLarge { size: usize, rows: usize, cols: usize },

    /// Trim margin consumes the whole image
    #[error("Cannot trim {margin} pixels from each side of a {rows}x{cols} image")]
    MarginTooLarge {
        margin: usize,
        rows: usize,
        cols: usize,
    },

    /// Pooling requested with no window sizes
    #[error("Pool sizes must not be empty")]
    EmptyPoolSizes,

    /// Difference inputs cannot be aligned
    #[error("Shape mismatch: single image {single:?} cannot be aligned to average {avg:?}")]
    ShapeMismatch {
        single: (usize, usize, usize),
        avg: (usize, usize, usize),
    },

    /// Raw input array has an unusable shape
    #[error("Malformed input array {shape:?}: {message}")]
    MalformedInput { shape: Vec<usize>, message: String },
}

/// Image file errors.
#[derive(Error, Debug)]
pub enum ImageIoError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image encoding or writing failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience type alias for powerpool results.
pub type Result<T> = std::result::Result<T, PowerPoolError>;

/// Convenience type alias for filter results.
pub type FilterResult<T> = std::result::Result<T, FilterError>;
