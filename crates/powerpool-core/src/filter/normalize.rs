//! Normalization of raw pixel arrays and border trimming.

use ndarray::{s, ArrayView3, ArrayViewD, Axis, Ix3};

use super::{Image, CHANNELS};
use crate::error::{FilterError, FilterResult};

/// Largest raw intensity; raw values are divided by this.
const RAW_MAX: f64 = 255.0;

/// Scale a raw `(rows, cols)` or `(rows, cols, channels)` array into a
/// `(rows, cols, 3)` image with values divided by 255.
///
/// Single-channel input (2D, or 3D with one channel) is replicated into all
/// three output channels. Gray+alpha replicates the gray channel and RGBA
/// drops alpha. The input is never modified.
pub fn normalize<T>(raw: ArrayViewD<'_, T>) -> FilterResult<Image>
where
    T: Copy + Into<f64>,
{
    let shape = raw.shape().to_vec();
    if shape.contains(&0) {
        return Err(malformed(&shape, "zero-length axis"));
    }

    let raw = match shape.len() {
        2 => raw.insert_axis(Axis(2)),
        3 => raw,
        _ => {
            return Err(malformed(
                &shape,
                "expected (rows, cols) or (rows, cols, channels)",
            ))
        }
    };
    let raw = raw
        .into_dimensionality::<Ix3>()
        .map_err(|e| malformed(&shape, &e.to_string()))?;

    // Source channel feeding each output channel
    let sources: [usize; CHANNELS] = match raw.len_of(Axis(2)) {
        1 | 2 => [0, 0, 0],
        3 | 4 => [0, 1, 2],
        n => return Err(malformed(&shape, &format!("unsupported channel count {n}"))),
    };

    let (rows, cols, _) = raw.dim();
    Ok(Image::from_shape_fn((rows, cols, CHANNELS), |(r, c, ch)| {
        Into::<f64>::into(raw[[r, c, sources[ch]]]) / RAW_MAX
    }))
}

/// Remove `margin` pixels from every side of both spatial axes.
///
/// Returns an owned copy; fails if nothing would remain.
pub fn trim(image: ArrayView3<'_, f64>, margin: usize) -> FilterResult<Image> {
    trim_view(image, margin).map(|view| view.to_owned())
}

/// Borrowing variant of [`trim`].
pub(crate) fn trim_view(image: ArrayView3<'_, f64>, margin: usize) -> FilterResult<ArrayView3<'_, f64>> {
    let (rows, cols, _) = image.dim();
    if 2 * margin >= rows || 2 * margin >= cols {
        return Err(FilterError::MarginTooLarge { margin, rows, cols });
    }
    Ok(image.slice_move(s![margin..rows - margin, margin..cols - margin, ..]))
}

fn malformed(shape: &[usize], message: &str) -> FilterError {
    FilterError::MalformedInput {
        shape: shape.to_vec(),
        message: message.to_string(),
    }
}
