//! Sliding-window power-sum convolution.
//!
//! Every output cell is the average of the window's elements raised to a
//! fixed exponent: `sum(x^p) / size²`. This is the mean of the powered
//! values, not the power of the mean.
//!
//! Windows are anchored with `half = size / 2` pixels on the low side and
//! `half + size % 2` (exclusive) on the high side, so even windows sit one
//! pixel off-centre. Only centres whose window fits inside the image are
//! computed; the result is `2 * half` pixels smaller on each axis.

use ndarray::{s, Array3, ArrayView3, Zip};

use super::Image;
use crate::config::FilterConfig;
use crate::error::{FilterError, FilterResult};

/// Immutable convolution parameters shared by every pass of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSum {
    /// Exponent applied to each window element
    pub power: f64,
    /// Spread output cells over the rayon pool (with the `parallel` feature)
    pub parallel: bool,
}

impl PowerSum {
    /// Parallel power-sum with the given exponent.
    pub fn new(power: f64) -> Self {
        Self {
            power,
            parallel: true,
        }
    }

    /// Same exponent, computed on the calling thread only.
    pub fn sequential(self) -> Self {
        Self {
            parallel: false,
            ..self
        }
    }
}

impl Default for PowerSum {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_POWER)
    }
}

impl From<&FilterConfig> for PowerSum {
    fn from(config: &FilterConfig) -> Self {
        Self {
            power: config.power,
            parallel: config.parallel,
        }
    }
}

/// Spatial extent `(rows, cols)` of a convolution with window `size`.
///
/// Fails for `size == 0` or when no window fits inside the image.
pub fn output_extent(rows: usize, cols: usize, size: usize) -> FilterResult<(usize, usize)> {
    if size == 0 {
        return Err(FilterError::InvalidWindowSize { size });
    }
    let half = size / 2;
    if rows <= 2 * half || cols <= 2 * half {
        return Err(FilterError::WindowTooLarge { size, rows, cols });
    }
    Ok((rows - 2 * half, cols - 2 * half))
}

/// Convolve every channel of `image` with a `size × size` power-sum window.
///
/// Output values are not clamped: exponents below one can lift dark pixels
/// and inputs outside [0, 1] stay outside.
pub fn convolve(image: ArrayView3<'_, f64>, size: usize, kernel: &PowerSum) -> FilterResult<Image> {
    let (rows, cols, channels) = image.dim();
    let (out_rows, out_cols) = output_extent(rows, cols, size)?;
    tracing::debug!(
        size,
        power = kernel.power,
        "Convolving {}x{} -> {}x{}",
        rows,
        cols,
        out_rows,
        out_cols
    );

    let power = kernel.power;
    let powered = image.mapv(|v| v.powf(power));
    let area = (size * size) as f64;

    // Output (r, c) is centred on (r + half, c + half), whose window starts at (r, c).
    let mut out = Array3::<f64>::zeros((out_rows, out_cols, channels));
    for_each_cell(&mut out, kernel.parallel, |(r, c, ch), cell| {
        let window = powered.slice(s![r..r + size, c..c + size, ch]);
        *cell = window.iter().fold(0.0, |sum, &v| sum + v) / area;
    });
    Ok(out)
}

fn for_each_cell<F>(out: &mut Image, parallel: bool, f: F)
where
    F: Fn((usize, usize, usize), &mut f64) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            Zip::indexed(out).par_for_each(f);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    Zip::indexed(out).for_each(f);
}
