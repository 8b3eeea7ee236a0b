use granula_image::{Accumulator, ImageError, Pixel, RasterBuffer};
use num_traits::{ToPrimitive, Zero};

use super::kernels::Kernel;
use super::window::reduce_windows;
use crate::border::{BorderPolicy, BorderedRaster};

/// Convolve a bordered image with a [`Kernel`].
///
/// Each output pixel is the weighted sum of the window centred on it divided by the kernel
/// divisor. Integer pixels accumulate in `i64` with truncated weights and divisor and use
/// truncating division; floating pixels accumulate in `f64`. Results saturate to the pixel range.
///
/// The output is `2 * x_radius` columns and `2 * y_radius` rows smaller than the buffer.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel` - The convolution kernel.
///
/// # Errors
///
/// Returns [`ImageError::InsufficientBorder`] if the margin is smaller than the kernel radius and
/// [`ImageError::InvalidParameter`] if the divisor truncates to zero for integer pixels.
///
/// # Example
///
/// ```rust
/// use granula_image::{ImageSize, RasterBuffer};
/// use granula_imgproc::border::{BorderPolicy, BorderedRaster};
/// use granula_imgproc::filter::{convolve, kernels::Kernel};
///
/// let src = RasterBuffer::new(ImageSize { width: 3, height: 1 }, vec![0u8, 9, 0]).unwrap();
/// let bordered = BorderedRaster::new(&src, 1, 0, BorderPolicy::Constant(0.0)).unwrap();
/// let kernel = Kernel::row(vec![1.0, 1.0, 1.0], 3.0).unwrap();
///
/// let dst = convolve(&bordered, &kernel).unwrap();
/// assert_eq!(dst.as_slice(), &[3, 3, 3]);
/// ```
pub fn convolve<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    let divisor = T::weight_to_accumulator(kernel.divisor());
    if divisor == <T::Accumulator as Zero>::zero() {
        return Err(ImageError::InvalidParameter(format!(
            "kernel divisor {} truncates to zero for {:?}",
            kernel.divisor(),
            T::PIXEL_TYPE
        )));
    }

    let weights = kernel
        .weights()
        .iter()
        .map(|&w| T::weight_to_accumulator(w))
        .collect::<Vec<_>>();

    reduce_windows(src, kernel.x_radius(), kernel.y_radius(), |window| {
        let sum = weighted_sum::<T>(window.zip_weights(weights.as_slice()));
        T::from_accumulator(sum.div_saturating(divisor))
    })
}

#[inline]
fn weighted_sum<T: Pixel>(pairs: impl Iterator<Item = (T, T::Accumulator)>) -> T::Accumulator {
    pairs.fold(<T::Accumulator as Zero>::zero(), |acc, (v, w)| {
        acc.mul_add_saturating(v.to_accumulator(), w)
    })
}

/// Convolve with a row kernel and then a column kernel.
///
/// The row pass consumes only the horizontal margin, so the column pass reads the vertical
/// margin left untouched by the first pass. No re-padding takes place.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `row_kernel` - A kernel with `y_radius == 0`.
/// * `column_kernel` - A kernel with `x_radius == 0`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if a kernel has the wrong shape, plus the errors of
/// [`convolve`].
pub fn separable_convolve<T: Pixel>(
    src: &BorderedRaster<T>,
    row_kernel: &Kernel,
    column_kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    if row_kernel.y_radius() != 0 || column_kernel.x_radius() != 0 {
        return Err(ImageError::InvalidParameter(format!(
            "separable kernels must be 1D, got radii ({}, {}) and ({}, {})",
            row_kernel.x_radius(),
            row_kernel.y_radius(),
            column_kernel.x_radius(),
            column_kernel.y_radius()
        )));
    }

    let (x_margin, y_margin) = src.margins();
    src.require_margin(row_kernel.x_radius(), column_kernel.y_radius())?;

    let horizontal = convolve(src, row_kernel)?;
    let horizontal =
        BorderedRaster::from_padded(horizontal, x_margin - row_kernel.x_radius(), y_margin)?;

    convolve(&horizontal, column_kernel)
}

/// Pad `src` by the kernel radius with `policy` and convolve, returning an image of the same size.
///
/// # Errors
///
/// See [`BorderedRaster::new`] and [`convolve`].
pub fn filter2d<T: Pixel>(
    src: &RasterBuffer<T>,
    kernel: &Kernel,
    policy: BorderPolicy,
) -> Result<RasterBuffer<T>, ImageError> {
    let bordered = BorderedRaster::new(src, kernel.x_radius(), kernel.y_radius(), policy)?;
    convolve(&bordered, kernel)
}

/// Convolve into `f64` regardless of the source pixel type, without truncating the weights.
pub(crate) fn convolve_f64<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<f64>, ImageError> {
    let divisor = kernel.divisor();
    reduce_windows(src, kernel.x_radius(), kernel.y_radius(), |window| {
        window
            .zip_weights(kernel.weights())
            .fold(0.0, |acc, (v, w)| acc + v.to_f64().unwrap_or_default() * w)
            / divisor
    })
}
