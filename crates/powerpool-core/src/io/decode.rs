//! Image decoding into raw 0–255 pixel arrays.

use image::{DynamicImage, GenericImageView, ImageFormat};
use ndarray::{Array2, Array3, ArrayD};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::ImageIoError;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// Raw pixels: `(rows, cols)` for grayscale sources, `(rows, cols, 3)` otherwise
    pub pixels: ArrayD<u8>,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Original file size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode the file at `path`.
    ///
    /// Checks existence and file size before reading, and pixel dimensions
    /// after decoding.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, ImageIoError> {
        if !path.exists() {
            return Err(ImageIoError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;
        let max_bytes = self
            .limits
            .max_file_size_mb
            .saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(ImageIoError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        self.decode_bytes(bytes, path)
    }

    /// Decode an in-memory buffer; `path` is used for format fallback and errors.
    pub fn decode_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, ImageIoError> {
        let file_size = bytes.len() as u64;
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageIoError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => {
                let f = ImageFormat::from_path(path).map_err(|_| ImageIoError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                        .to_string(),
                })?;
                reader.set_format(f);
                f
            }
        };
        let image = reader.decode().map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(ImageIoError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        let pixels = to_array(&image).map_err(|e| ImageIoError::Decode {
            path: path.to_path_buf(),
            message: format!("Unexpected pixel buffer: {}", e),
        })?;
        tracing::debug!(
            "Decoded {:?} ({}x{}, {:?}, {} bytes)",
            path,
            width,
            height,
            format,
            file_size
        );

        Ok(DecodedImage {
            pixels,
            format,
            width,
            height,
            file_size,
        })
    }
}

/// Grayscale sources keep a single plane; everything else becomes 8-bit RGB.
fn to_array(image: &DynamicImage) -> Result<ArrayD<u8>, ndarray::ShapeError> {
    let rows = image.height() as usize;
    let cols = image.width() as usize;
    if image.color().has_color() {
        let rgb = image.to_rgb8();
        Ok(Array3::from_shape_vec((rows, cols, 3), rgb.into_raw())?.into_dyn())
    } else {
        let luma = image.to_luma8();
        Ok(Array2::from_shape_vec((rows, cols), luma.into_raw())?.into_dyn())
    }
}
