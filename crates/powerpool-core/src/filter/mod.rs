//! Numeric filters operating on normalized `(row, col, channel)` arrays.
//!
//! - **normalize**: raw 0–255 pixels to unit-interval RGB, plus border `trim`
//! - **convolve**: sliding-window power-sum average
//! - **pool**: equal-weight average of several window sizes
//! - **difference**: absolute difference between two aligned results
//! - **color**: clamped brightness scaling

pub mod color;
pub mod convolve;
pub mod difference;
pub mod normalize;
pub mod pool;

use ndarray::Array3;

/// A normalized image: axes (row, column, channel).
pub type Image = Array3<f64>;

/// Channel count of every normalized image.
pub const CHANNELS: usize = 3;

// Re-exports for convenient access
pub use color::scale_color;
pub use convolve::{convolve, output_extent, PowerSum};
pub use difference::difference;
pub use normalize::{normalize, trim};
pub use pool::{pool, pool_with_progress};
