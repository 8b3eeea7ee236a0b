use granula_image::{ImageError, Pixel, RasterBuffer};

use super::convolution::{convolve, convolve_f64, separable_convolve};
use super::kernels::{self, Kernel};
use super::window::reduce_windows;
use crate::border::BorderedRaster;

/// Scale used to turn fractional 1D kernels into integer weights for integer pixels.
const INTEGER_KERNEL_SCALE: f64 = 256.0;

/// Blur an image using a box blur filter
///
/// Integer pixels are averaged in one 2D pass so the mean is truncated once; a separable
/// pass would truncate the row means before the column mean. Float pixels use the
/// separable row-then-column pass.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel_radius` - The radius of the kernel (x_radius, y_radius).
///
/// PRECONDITION: the margin of `src` is at least `kernel_radius` on each axis.
pub fn box_blur<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel_radius: (usize, usize),
) -> Result<RasterBuffer<T>, ImageError> {
    let (rx, ry) = kernel_radius;
    if T::PIXEL_TYPE.is_integer() {
        return convolve(src, &Kernel::box_kernel(rx, ry));
    }

    let row = Kernel::row(vec![1.0; 2 * rx + 1], (2 * rx + 1) as f64)?;
    let column = Kernel::column(vec![1.0; 2 * ry + 1], (2 * ry + 1) as f64)?;
    separable_convolve(src, &row, &column)
}

/// Blur an image using a gaussian blur filter
///
/// Integer pixels use the gaussian weights scaled to integers.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel_radius` - The radius of the kernel (x_radius, y_radius).
/// * `sigma` - The sigma of the gaussian kernel.
///
/// PRECONDITION: the margin of `src` is at least `kernel_radius` on each axis.
pub fn gaussian_blur<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel_radius: (usize, usize),
    sigma: (f64, f64),
) -> Result<RasterBuffer<T>, ImageError> {
    if sigma.0 <= 0.0 || sigma.1 <= 0.0 {
        return Err(ImageError::InvalidParameter(format!(
            "gaussian sigma must be positive, got {sigma:?}"
        )));
    }

    let mut row = Kernel::row(kernels::gaussian_kernel_1d(2 * kernel_radius.0 + 1, sigma.0), 1.0)?;
    let mut column =
        Kernel::column(kernels::gaussian_kernel_1d(2 * kernel_radius.1 + 1, sigma.1), 1.0)?;

    if T::PIXEL_TYPE.is_integer() {
        row = row.quantize(INTEGER_KERNEL_SCALE)?;
        column = column.quantize(INTEGER_KERNEL_SCALE)?;
    }

    separable_convolve(src, &row, &column)
}

/// Compute the Sobel gradient magnitude `sqrt(gx^2 + gy^2)` with the 3x3 kernels.
///
/// The result is always `f64` so no gradient information is lost to saturation.
///
/// # Arguments
///
/// * `src` - The bordered source image, with a margin of at least one pixel.
pub fn sobel<T: Pixel>(src: &BorderedRaster<T>) -> Result<RasterBuffer<f64>, ImageError> {
    let gx = convolve_f64(src, &Kernel::sobel_x())?;
    let gy = convolve_f64(src, &Kernel::sobel_y())?;

    let magnitude = gx
        .as_slice()
        .iter()
        .zip(gy.as_slice())
        .map(|(&gx, &gy)| (gx * gx + gy * gy).sqrt())
        .collect();

    RasterBuffer::new(gx.size(), magnitude)
}

/// Replace every pixel by the median of its `(2 * rx + 1) x (2 * ry + 1)` neighbourhood.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel_radius` - The radius of the window (x_radius, y_radius).
pub fn median_filter<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel_radius: (usize, usize),
) -> Result<RasterBuffer<T>, ImageError> {
    let (rx, ry) = kernel_radius;
    let mut scratch = Vec::with_capacity((2 * rx + 1) * (2 * ry + 1));

    reduce_windows(src, rx, ry, |window| {
        scratch.clear();
        scratch.extend(window.values());
        scratch.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        scratch[scratch.len() / 2]
    })
}
