//! Pipeline orchestration: normalize, convolve, pool, difference.

use ndarray::ArrayViewD;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::FilterConfig;
use crate::error::{FilterError, FilterResult};
use crate::filter::{self, Image, PowerSum};
use crate::types::ImageStats;

/// A unit of work reported to progress callbacks before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Convolve { size: usize },
    Pool { index: usize, total: usize, size: usize },
    Difference,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Normalize => write!(f, "normalizing"),
            Stage::Convolve { size } => write!(f, "convolving (size {size})"),
            Stage::Pool { index, total, size } => {
                write!(f, "pooling {}/{} (size {size})", index + 1, total)
            }
            Stage::Difference => write!(f, "differencing"),
        }
    }
}

/// The three images produced by one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Single-scale convolution
    pub convolved: Image,
    /// Multi-scale pooled average
    pub pooled: Image,
    /// `|convolved - pooled|` over the pooled extent
    pub difference: Image,
    /// Time spent in the filters
    pub elapsed: Duration,
}

impl PipelineOutput {
    /// Stats for (convolved, pooled, difference).
    pub fn stats(&self) -> (ImageStats, ImageStats, ImageStats) {
        (
            ImageStats::of(self.convolved.view()),
            ImageStats::of(self.pooled.view()),
            ImageStats::of(self.difference.view()),
        )
    }
}

/// Runs the filter chain with a fixed [`FilterConfig`].
pub struct Pipeline {
    config: FilterConfig,
    kernel: PowerSum,
}

impl Pipeline {
    /// Create a pipeline; the exponent and pool sizes are fixed for its lifetime.
    pub fn new(config: FilterConfig) -> Self {
        let kernel = PowerSum::from(&config);
        Self { config, kernel }
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Number of [`Stage`] events a successful run reports.
    pub fn total_stages(&self) -> usize {
        3 + self.config.pool_sizes.len()
    }

    /// Run every stage on a raw 0–255 image with single-scale window `size`.
    pub fn run<T>(&self, raw: ArrayViewD<'_, T>, size: usize) -> FilterResult<PipelineOutput>
    where
        T: Copy + Into<f64>,
    {
        self.run_with_progress(raw, size, |_| {})
    }

    /// [`Pipeline::run`], calling `on_stage` before each stage begins.
    pub fn run_with_progress<T, F>(
        &self,
        raw: ArrayViewD<'_, T>,
        size: usize,
        mut on_stage: F,
    ) -> FilterResult<PipelineOutput>
    where
        T: Copy + Into<f64>,
        F: FnMut(Stage),
    {
        if size == 0 {
            return Err(FilterError::InvalidWindowSize { size });
        }
        if self.config.pool_sizes.contains(&0) {
            return Err(FilterError::InvalidWindowSize { size: 0 });
        }
        let start = Instant::now();

        on_stage(Stage::Normalize);
        let image = filter::normalize(raw)?;
        let (rows, cols, channels) = image.dim();
        tracing::trace!("  Normalize: {:?}", start.elapsed());

        // Reject impossible windows and unalignable outputs before the first scan
        let single = filter::output_extent(rows, cols, size)?;
        let max_pool = self
            .config
            .pool_sizes
            .iter()
            .copied()
            .max()
            .ok_or(FilterError::EmptyPoolSizes)?;
        let avg = filter::output_extent(rows, cols, max_pool)?;
        if single.0 < avg.0 || single.1 < avg.1 {
            return Err(FilterError::ShapeMismatch {
                single: (single.0, single.1, channels),
                avg: (avg.0, avg.1, channels),
            });
        }

        let conv_start = Instant::now();
        on_stage(Stage::Convolve { size });
        let convolved = filter::convolve(image.view(), size, &self.kernel)?;
        tracing::trace!("  Convolve: {:?}", conv_start.elapsed());

        let pool_start = Instant::now();
        let total = self.config.pool_sizes.len();
        let pooled = filter::pool_with_progress(
            image.view(),
            &self.config.pool_sizes,
            &self.kernel,
            |index, size| on_stage(Stage::Pool { index, total, size }),
        )?;
        tracing::trace!("  Pool: {:?}", pool_start.elapsed());

        let diff_start = Instant::now();
        on_stage(Stage::Difference);
        let difference = filter::difference(convolved.view(), pooled.view())?;
        tracing::trace!("  Difference: {:?}", diff_start.elapsed());

        let elapsed = start.elapsed();
        tracing::debug!(
            "Filtered {}x{} image in {:?} (size {}, power {})",
            rows,
            cols,
            elapsed,
            size,
            self.kernel.power
        );

        Ok(PipelineOutput {
            convolved,
            pooled,
            difference,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn small_config() -> FilterConfig {
        FilterConfig {
            power: 2.0,
            pool_sizes: vec![3, 5],
            parallel: true,
        }
    }

    #[test]
    fn test_run_shapes() {
        let raw = Array3::<u8>::from_shape_fn((20, 16, 3), |(r, c, ch)| (r * 8 + c * 3 + ch) as u8);
        let output = Pipeline::new(small_config())
            .run(raw.view().into_dyn(), 3)
            .unwrap();
        assert_eq!(output.convolved.dim(), (18, 14, 3));
        assert_eq!(output.pooled.dim(), (16, 12, 3));
        assert_eq!(output.difference.dim(), (16, 12, 3));
    }

    #[test]
    fn test_white_image_has_zero_difference() {
        let raw = Array2::<u8>::from_elem((12, 12), 255);
        let output = Pipeline::new(small_config())
            .run(raw.view().into_dyn(), 5)
            .unwrap();
        assert!(output.convolved.iter().all(|&v| (v - 1.0).abs() < 1e-12));
        assert!(output.pooled.iter().all(|&v| (v - 1.0).abs() < 1e-12));
        assert!(output.difference.iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_single_smaller_than_pooled_is_shape_mismatch() {
        // size 7 convolution is smaller than the size-5 pooled extent
        let raw = Array3::<u8>::zeros((12, 12, 3));
        let mut stages = Vec::new();
        let err = Pipeline::new(small_config())
            .run_with_progress(raw.view().into_dyn(), 7, |stage| stages.push(stage))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::ShapeMismatch {
                single: (6, 6, 3),
                avg: (8, 8, 3),
            }
        );
        assert_eq!(stages, vec![Stage::Normalize]);
    }

    #[test]
    fn test_zero_pool_size_rejected_before_any_stage() {
        let raw = Array3::<u8>::zeros((12, 12, 3));
        let config = FilterConfig {
            pool_sizes: vec![0, 5],
            ..small_config()
        };
        let mut stages = Vec::new();
        let err = Pipeline::new(config)
            .run_with_progress(raw.view().into_dyn(), 3, |stage| stages.push(stage))
            .unwrap_err();
        assert_eq!(err, FilterError::InvalidWindowSize { size: 0 });
        assert!(stages.is_empty());
    }

    #[test]
    fn test_stage_events_in_order() {
        let raw = Array3::<u8>::zeros((12, 12, 3));
        let pipeline = Pipeline::new(small_config());
        let mut stages = Vec::new();
        pipeline
            .run_with_progress(raw.view().into_dyn(), 3, |stage| stages.push(stage))
            .unwrap();
        assert_eq!(stages.len(), pipeline.total_stages());
        assert_eq!(
            stages,
            vec![
                Stage::Normalize,
                Stage::Convolve { size: 3 },
                Stage::Pool {
                    index: 0,
                    total: 2,
                    size: 3
                },
                Stage::Pool {
                    index: 1,
                    total: 2,
                    size: 5
                },
                Stage::Difference,
            ]
        );
    }

    #[test]
    fn test_zero_size_rejected_before_any_stage() {
        let raw = Array3::<u8>::zeros((12, 12, 3));
        let mut stages = 0;
        let err = Pipeline::new(small_config())
            .run_with_progress(raw.view().into_dyn(), 0, |_| stages += 1)
            .unwrap_err();
        assert_eq!(err, FilterError::InvalidWindowSize { size: 0 });
        assert_eq!(stages, 0);
    }

    #[test]
    fn test_oversized_pool_rejected_before_convolving() {
        let raw = Array3::<u8>::zeros((10, 10, 3));
        let mut stages = Vec::new();
        let err = Pipeline::new(FilterConfig::default())
            .run_with_progress(raw.view().into_dyn(), 3, |stage| stages.push(stage))
            .unwrap_err();
        assert!(matches!(err, FilterError::WindowTooLarge { size: 21, .. }));
        assert_eq!(stages, vec![Stage::Normalize]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Convolve { size: 5 }.to_string(), "convolving (size 5)");
        assert_eq!(
            Stage::Pool {
                index: 0,
                total: 6,
                size: 3
            }
            .to_string(),
            "pooling 1/6 (size 3)"
        );
    }
}
