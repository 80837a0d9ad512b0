//! Image file collaborators around the filters.
//!
//! - **decode**: load an image file as a raw 0–255 pixel array
//! - **render**: write float images as PNG, direct or colormapped

pub mod decode;
pub mod render;

pub use decode::{DecodedImage, ImageDecoder};
pub use render::{OutputPaths, RenderMode, Renderer};
