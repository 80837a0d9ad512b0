//! Absolute difference between a single-scale result and the pooled mean.

use ndarray::{s, ArrayView3, Zip};

use super::Image;
use crate::error::{FilterError, FilterResult};

/// Elementwise `|single - avg|`, after centring `avg`'s extent inside `single`.
///
/// `single` must be at least as large as `avg` on both spatial axes and have
/// the same channel count. The result has `avg`'s shape; neither input is
/// modified.
pub fn difference(single: ArrayView3<'_, f64>, avg: ArrayView3<'_, f64>) -> FilterResult<Image> {
    let (s_rows, s_cols, s_channels) = single.dim();
    let (a_rows, a_cols, a_channels) = avg.dim();
    if s_rows < a_rows || s_cols < a_cols || s_channels != a_channels {
        return Err(FilterError::ShapeMismatch {
            single: single.dim(),
            avg: avg.dim(),
        });
    }

    let row_off = (s_rows - a_rows) / 2;
    let col_off = (s_cols - a_cols) / 2;
    let aligned = single.slice(s![row_off..row_off + a_rows, col_off..col_off + a_cols, ..]);
    tracing::debug!(
        "Differencing {}x{} against {}x{} (offset {}, {})",
        s_rows,
        s_cols,
        a_rows,
        a_cols,
        row_off,
        col_off
    );

    Ok(Zip::from(&aligned)
        .and(&avg)
        .map_collect(|&s, &a| (s - a).abs()))
}
