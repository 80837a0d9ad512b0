//! Multi-scale pooling: the equal-weight mean of several convolutions.

use ndarray::{ArrayView3, Zip};

use super::convolve::{convolve, output_extent, PowerSum};
use super::normalize::trim_view;
use super::Image;
use crate::error::{FilterError, FilterResult};

/// Average the convolutions of `image` at every window size in `sizes`.
///
/// Each per-size result is trimmed to the extent of the largest window's
/// result before averaging, so the output is exactly as large as
/// `convolve(image, max(sizes), kernel)`.
pub fn pool(image: ArrayView3<'_, f64>, sizes: &[usize], kernel: &PowerSum) -> FilterResult<Image> {
    pool_with_progress(image, sizes, kernel, |_, _| {})
}

/// [`pool`] with a callback invoked as `(index, size)` before each pass.
pub fn pool_with_progress<F>(
    image: ArrayView3<'_, f64>,
    sizes: &[usize],
    kernel: &PowerSum,
    mut on_pass: F,
) -> FilterResult<Image>
where
    F: FnMut(usize, usize),
{
    let max_size = *sizes.iter().max().ok_or(FilterError::EmptyPoolSizes)?;
    if sizes.contains(&0) {
        return Err(FilterError::InvalidWindowSize { size: 0 });
    }
    let (rows, cols, channels) = image.dim();
    let (out_rows, out_cols) = output_extent(rows, cols, max_size)?;

    let weight = 1.0 / sizes.len() as f64;
    let mut pooled = Image::zeros((out_rows, out_cols, channels));
    for (index, &size) in sizes.iter().enumerate() {
        on_pass(index, size);
        let convolved = convolve(image, size, kernel)?;
        // Equals (max_size - size) / 2 when both sizes are odd
        let aligned = trim_view(convolved.view(), max_size / 2 - size / 2)?;
        Zip::from(&mut pooled)
            .and(&aligned)
            .for_each(|acc, &v| *acc += v * weight);
    }

    tracing::debug!(
        sizes = ?sizes,
        "Pooled {} passes into {}x{}",
        sizes.len(),
        out_rows,
        out_cols
    );
    Ok(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::trim;

    #[test]
    fn test_constant_image_pools_to_constant() {
        let image = Image::from_elem((10, 10, 3), 1.0);
        let pooled = pool(image.view(), &[3, 5], &PowerSum::new(2.0)).unwrap();
        assert_eq!(pooled.dim(), (6, 6, 3));
        assert!(pooled.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_extent_matches_largest_window() {
        let image = Image::from_shape_fn((30, 26, 3), |(r, c, ch)| {
            ((r * 7 + c * 3 + ch) % 11) as f64 / 10.0
        });
        let kernel = PowerSum::new(2.0);
        let sizes = [3, 5, 7, 11, 15, 21];
        let pooled = pool(image.view(), &sizes, &kernel).unwrap();
        let largest = convolve(image.view(), 21, &kernel).unwrap();
        assert_eq!(pooled.dim(), largest.dim());
    }

    #[test]
    fn test_order_of_sizes_does_not_change_extent() {
        let image = Image::from_elem((12, 12, 3), 0.3);
        let kernel = PowerSum::new(1.0);
        let a = pool(image.view(), &[7, 3, 5], &kernel).unwrap();
        let b = pool(image.view(), &[3, 5, 7], &kernel).unwrap();
        assert_eq!(a.dim(), (6, 6, 3));
        assert_eq!(a.dim(), b.dim());
    }

    #[test]
    fn test_single_size_equals_convolution() {
        let image = Image::from_shape_fn((9, 9, 3), |(r, c, _)| (r + c) as f64 / 16.0);
        let kernel = PowerSum::new(2.0);
        let pooled = pool(image.view(), &[5], &kernel).unwrap();
        assert_eq!(pooled, convolve(image.view(), 5, &kernel).unwrap());
    }

    #[test]
    fn test_mean_of_aligned_passes() {
        let image = Image::from_shape_fn((11, 11, 3), |(r, c, ch)| {
            ((r * 5 + c * 2 + ch) % 9) as f64 / 8.0
        });
        let kernel = PowerSum::new(1.0);
        let pooled = pool(image.view(), &[3, 7], &kernel).unwrap();

        let small = trim(convolve(image.view(), 3, &kernel).unwrap().view(), 2).unwrap();
        let large = convolve(image.view(), 7, &kernel).unwrap();
        for ((idx, &p), (&s, &l)) in pooled.indexed_iter().zip(small.iter().zip(large.iter())) {
            assert!((p - (s + l) / 2.0).abs() < 1e-12, "mismatch at {idx:?}");
        }
    }

    #[test]
    fn test_mixed_parity_sizes_align() {
        let image = Image::from_elem((16, 16, 3), 0.5);
        let kernel = PowerSum::new(1.0);
        let pooled = pool(image.view(), &[3, 6], &kernel).unwrap();
        assert_eq!(pooled.dim(), convolve(image.view(), 6, &kernel).unwrap().dim());
        assert!(pooled.iter().all(|&v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_progress_reports_every_pass() {
        let image = Image::zeros((12, 12, 3));
        let mut seen = Vec::new();
        pool_with_progress(image.view(), &[3, 5, 7], &PowerSum::default(), |i, s| {
            seen.push((i, s))
        })
        .unwrap();
        assert_eq!(seen, vec![(0, 3), (1, 5), (2, 7)]);
    }

    #[test]
    fn test_rejects_empty_sizes() {
        let image = Image::zeros((5, 5, 3));
        let err = pool(image.view(), &[], &PowerSum::default()).unwrap_err();
        assert_eq!(err, FilterError::EmptyPoolSizes);
    }

    #[test]
    fn test_rejects_zero_size_before_scanning() {
        let image = Image::zeros((8, 8, 3));
        let mut passes = 0;
        let err = pool_with_progress(image.view(), &[3, 0], &PowerSum::default(), |_, _| {
            passes += 1
        })
        .unwrap_err();
        assert_eq!(err, FilterError::InvalidWindowSize { size: 0 });
        assert_eq!(passes, 0);
    }

    #[test]
    fn test_rejects_window_larger_than_image() {
        let image = Image::zeros((10, 10, 3));
        let err = pool(image.view(), &[3, 21], &PowerSum::default()).unwrap_err();
        assert!(matches!(err, FilterError::WindowTooLarge { size: 21, .. }));
    }
}
