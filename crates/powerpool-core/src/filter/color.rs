//! Brightness scaling.

use ndarray::ArrayView3;

use super::Image;

/// Multiply every value by `factor` and clamp to [0, 1].
///
/// `factor > 1` brightens, `factor < 1` darkens; negative factors map
/// everything to zero.
pub fn scale_color(image: ArrayView3<'_, f64>, factor: f64) -> Image {
    image.mapv(|v| (v * factor).clamp(0.0, 1.0))
}
