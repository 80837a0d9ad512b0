//! PNG rendering of filter outputs.
//!
//! Two modes:
//! - **Rgb**: values clipped to [0, 1] and written as 8-bit RGB.
//! - **Colormap**: channel mean, autoscaled to the image's own range and
//!   mapped through the "pink" colormap. Suited to difference maps whose
//!   magnitudes are far below 1. No legend is drawn; the output has the
//!   input's dimensions.

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::ArrayView3;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{FilterError, FilterResult, ImageIoError};

/// Knee of the red ramp in the "hot" colormap.
const HOT_RED_END: f64 = 0.365079;

/// Knee of the green ramp in the "hot" colormap.
const HOT_GREEN_END: f64 = 0.746032;

/// How float pixels become 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Direct RGB with clipping
    Rgb,
    /// Autoscaled luminance through the pink colormap
    Colormap,
}

/// Destination files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `{stem}_conv.png`
    pub convolved: PathBuf,
    /// `{stem}_avg.png`
    pub pooled: PathBuf,
    /// `{stem}_diff_{size}.png`
    pub difference: PathBuf,
}

impl OutputPaths {
    /// Name outputs after `input`'s file stem, in `dir` or next to the input.
    pub fn for_input(input: &Path, dir: Option<&Path>, size: usize) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        Self {
            convolved: dir.join(format!("{stem}_conv.png")),
            pooled: dir.join(format!("{stem}_avg.png")),
            difference: dir.join(format!("{stem}_diff_{size}.png")),
        }
    }

    /// All three paths in conv/avg/diff order.
    pub fn all(&self) -> [&Path; 3] {
        [&self.convolved, &self.pooled, &self.difference]
    }
}

/// Writes filter outputs as PNG files.
pub struct Renderer {
    config: OutputConfig,
}

impl Renderer {
    /// Create a new renderer with the given output settings.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Mode used for the difference map.
    pub fn difference_mode(&self) -> RenderMode {
        if self.config.diff_colormap {
            RenderMode::Colormap
        } else {
            RenderMode::Rgb
        }
    }

    /// Convert a `(rows, cols, channels)` float image to 8-bit RGB.
    ///
    /// Fails on an image with no pixels or no channels.
    pub fn render(&self, image: ArrayView3<'_, f64>, mode: RenderMode) -> FilterResult<RgbImage> {
        if image.is_empty() {
            return Err(FilterError::MalformedInput {
                shape: image.shape().to_vec(),
                message: "nothing to render".to_string(),
            });
        }
        Ok(match mode {
            RenderMode::Rgb => render_rgb(image),
            RenderMode::Colormap => render_colormap(image),
        })
    }

    /// Render and write `image` to `path` as PNG.
    pub fn save(
        &self,
        image: ArrayView3<'_, f64>,
        path: &Path,
        mode: RenderMode,
    ) -> Result<(), ImageIoError> {
        let rgb = self.render(image, mode).map_err(|e| ImageIoError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rgb.save_with_format(path, ImageFormat::Png)
            .map_err(|e| ImageIoError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::info!("Image saved to {}", path.display());
        Ok(())
    }
}

fn render_rgb(image: ArrayView3<'_, f64>) -> RgbImage {
    let (rows, cols, channels) = image.dim();
    let last = channels.saturating_sub(1);
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let (r, c) = (y as usize, x as usize);
        Rgb(std::array::from_fn(|ch| to_u8(image[[r, c, ch.min(last)]])))
    })
}

fn render_colormap(image: ArrayView3<'_, f64>) -> RgbImage {
    let (rows, cols, channels) = image.dim();
    let luminance = |r: usize, c: usize| {
        (0..channels).map(|ch| image[[r, c, ch]]).sum::<f64>() / channels as f64
    };

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for r in 0..rows {
        for c in 0..cols {
            let v = luminance(r, c);
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    let span = hi - lo;

    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = luminance(y as usize, x as usize);
        let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
        Rgb(pink(t).map(to_u8))
    })
}

/// The pink colormap: `sqrt((2 * gray + hot) / 3)` per channel.
pub fn pink(t: f64) -> [f64; 3] {
    let t = t.clamp(0.0, 1.0);
    let hot = [
        (t / HOT_RED_END).clamp(0.0, 1.0),
        ((t - HOT_RED_END) / (HOT_GREEN_END - HOT_RED_END)).clamp(0.0, 1.0),
        ((t - HOT_GREEN_END) / (1.0 - HOT_GREEN_END)).clamp(0.0, 1.0),
    ];
    hot.map(|h| ((2.0 * t + h) / 3.0).sqrt())
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
