//! powerpool core - power-sum convolution, multi-scale pooling and
//! difference maps for images.
//!
//! # Architecture
//!
//! ```text
//! raw pixels → normalize ─┬→ convolve(size) ──────────┬→ difference
//!                         └→ pool(3, 5, 7, 11, 15, 21) ┘
//! ```
//!
//! Every stage takes borrowed arrays and returns a fresh one; the exponent
//! and pool sizes travel in an immutable [`FilterConfig`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use powerpool_core::{Config, ImageDecoder, Pipeline};
//!
//! fn main() -> powerpool_core::Result<()> {
//!     let config = Config::load()?;
//!     let decoded = ImageDecoder::new(config.limits.clone()).decode("cat.png".as_ref())?;
//!     let output = Pipeline::new(config.filter.clone()).run(decoded.pixels.view(), 5)?;
//!     println!("difference extent: {:?}", output.difference.dim());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, FilterConfig};
pub use error::{ConfigError, FilterError, FilterResult, ImageIoError, PowerPoolError, Result};
pub use filter::{convolve, difference, normalize, pool, scale_color, trim, Image, PowerSum};
pub use io::{DecodedImage, ImageDecoder, OutputPaths, RenderMode, Renderer};
pub use pipeline::{Pipeline, PipelineOutput, Stage};
pub use types::{ImageStats, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_conversions() {
        let err: PowerPoolError = FilterError::EmptyPoolSizes.into();
        assert!(err.to_string().starts_with("Filter error"));

        let err: PowerPoolError = ImageIoError::FileNotFound("x.png".into()).into();
        assert!(err.to_string().contains("x.png"));
    }
}
