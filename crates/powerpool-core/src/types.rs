//! Serializable summaries of a filter run.

use ndarray::ArrayView3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shape and value range of one output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStats {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ImageStats {
    /// Compute stats over every element. Empty images report zeros.
    pub fn of(image: ArrayView3<'_, f64>) -> Self {
        let (rows, cols, channels) = image.dim();
        if image.is_empty() {
            return Self {
                rows,
                cols,
                channels,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }
        let (min, max, sum) = image.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Self {
            rows,
            cols,
            channels,
            min,
            max,
            mean: sum / image.len() as f64,
        }
    }
}

/// Everything the CLI reports about a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source image path
    pub input: PathBuf,

    /// Window size of the single-scale pass
    pub size: usize,

    /// Exponent applied inside every window
    pub power: f64,

    /// Window sizes averaged by the pooling pass
    pub pool_sizes: Vec<usize>,

    /// Brightness factor applied to the saved convolution image
    pub multiply: f64,

    /// Single-scale convolution result
    pub convolved: ImageStats,

    /// Pooled average
    pub pooled: ImageStats,

    /// Difference map
    pub difference: ImageStats,

    /// Files written, in conv/avg/diff order
    pub outputs: Vec<PathBuf>,

    /// Wall time of the filter pipeline in milliseconds
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_stats_of_ramp() {
        let image = Array3::from_shape_fn((2, 2, 3), |(r, c, _)| (r * 2 + c) as f64);
        let stats = ImageStats::of(image.view());
        assert_eq!((stats.rows, stats.cols, stats.channels), (2, 2, 3));
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.mean - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_stats_of_empty_image() {
        let image = Array3::<f64>::zeros((0, 4, 3));
        let stats = ImageStats::of(image.view());
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.cols, 4);
    }

    #[test]
    fn test_summary_serializes() {
        let stats = ImageStats::of(Array3::<f64>::zeros((1, 1, 3)).view());
        let summary = RunSummary {
            input: PathBuf::from("cat.png"),
            size: 5,
            power: 2.0,
            pool_sizes: vec![3, 5],
            multiply: 1.0,
            convolved: stats.clone(),
            pooled: stats.clone(),
            difference: stats,
            outputs: vec![PathBuf::from("cat_conv.png")],
            elapsed_ms: 12,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"size\":5"));
        assert!(json.contains("cat_conv.png"));
    }
}
