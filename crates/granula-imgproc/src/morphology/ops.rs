use granula_image::{ImageError, Pixel, RasterBuffer};

use crate::border::{BorderPolicy, BorderedRaster};
use crate::filter::kernels::Kernel;
use crate::filter::window::reduce_windows;

use super::kernels::StructuringElement;

/// Dilate a binary image using a structuring element [`Kernel`].
///
/// Dilation expands foreground (non-zero) regions. A foreground pixel is kept as is; a
/// background pixel takes the value of the first included neighbour that is foreground, or
/// stays background if there is none.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel` - The structuring element; weights `> 0` mark included offsets.
///
/// # Returns
///
/// An image `2 * x_radius` columns and `2 * y_radius` rows smaller than the bordered buffer,
/// or [`ImageError::InsufficientBorder`] if the margin is smaller than the kernel radius.
pub fn dilate<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    reduce_windows(src, kernel.x_radius(), kernel.y_radius(), |window| {
        let center = window.center();
        if center.is_foreground() {
            return center;
        }
        window
            .zip_weights(kernel.weights())
            .find(|&(v, w)| w > 0.0 && v.is_foreground())
            .map_or(center, |(v, _)| v)
    })
}

/// Erode a binary image using a structuring element [`Kernel`].
///
/// Erosion shrinks foreground (non-zero) regions. A background pixel is kept as is; a
/// foreground pixel stays only if every included neighbour is foreground, otherwise it
/// becomes zero.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel` - The structuring element; weights `> 0` mark included offsets.
///
/// # Returns
///
/// An image `2 * x_radius` columns and `2 * y_radius` rows smaller than the bordered buffer,
/// or [`ImageError::InsufficientBorder`] if the margin is smaller than the kernel radius.
pub fn erode<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    reduce_windows(src, kernel.x_radius(), kernel.y_radius(), |window| {
        let center = window.center();
        if !center.is_foreground() {
            return center;
        }
        let keep = window
            .zip_weights(kernel.weights())
            .all(|(v, w)| w <= 0.0 || v.is_foreground());
        if keep {
            center
        } else {
            T::zero()
        }
    })
}

/// Opening: erosion followed by dilation.
///
/// The eroded image is padded again by the kernel radius with a zero border before dilating,
/// so the output has the size of the eroded image. Removes small objects and thin protrusions.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel` - The structuring element.
pub fn open<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    let eroded = erode(src, kernel)?;
    dilate(&repad(&eroded, kernel)?, kernel)
}

/// Closing: dilation followed by erosion.
///
/// The dilated image is padded again by the kernel radius with a zero border before eroding,
/// so the output has the size of the dilated image. Fills small holes and gaps.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `kernel` - The structuring element.
pub fn close<T: Pixel>(
    src: &BorderedRaster<T>,
    kernel: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    let dilated = dilate(src, kernel)?;
    erode(&repad(&dilated, kernel)?, kernel)
}

fn repad<T: Pixel>(src: &RasterBuffer<T>, kernel: &Kernel) -> Result<BorderedRaster<T>, ImageError> {
    BorderedRaster::new(
        src,
        kernel.x_radius(),
        kernel.y_radius(),
        BorderPolicy::Constant(0.0),
    )
}

/// Pixels just outside the foreground: set in the 3x3 dilation but not in the source.
///
/// The image is padded with zeros, so foreground touching the image edge has no outer border
/// there. Output pixels keep the dilated value; every other pixel is zero.
pub fn outer_border<T: Pixel>(src: &RasterBuffer<T>) -> Result<RasterBuffer<T>, ImageError> {
    let kernel = StructuringElement::default().to_kernel();
    let dilated = dilate(&repad(src, &kernel)?, &kernel)?;
    mask_where(&dilated, src, |grown, orig| {
        grown.is_foreground() && !orig.is_foreground()
    })
}

/// Foreground pixels on the boundary: set in the source but cleared by the 3x3 erosion.
///
/// The image is padded with zeros, so foreground touching the image edge is part of the inner
/// border. Output pixels keep the source value; every other pixel is zero.
pub fn inner_border<T: Pixel>(src: &RasterBuffer<T>) -> Result<RasterBuffer<T>, ImageError> {
    let kernel = StructuringElement::default().to_kernel();
    let eroded = erode(&repad(src, &kernel)?, &kernel)?;
    mask_where(src, &eroded, |orig, shrunk| {
        orig.is_foreground() && !shrunk.is_foreground()
    })
}

/// Keep `a` where `pred(a, b)` holds, zero elsewhere.
fn mask_where<T: Pixel>(
    a: &RasterBuffer<T>,
    b: &RasterBuffer<T>,
    pred: impl Fn(T, T) -> bool,
) -> Result<RasterBuffer<T>, ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::DimensionMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }

    let mut dst = RasterBuffer::from_size_val(a.size(), T::zero())?;
    for y in 0..a.height() {
        for ((out, &va), &vb) in dst.row_mut(y).iter_mut().zip(a.row(y)).zip(b.row(y)) {
            if pred(va, vb) {
                *out = va;
            }
        }
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use granula_image::ImageSize;

    fn bordered(src: &RasterBuffer<u8>, radius: usize) -> Result<BorderedRaster<u8>, ImageError> {
        BorderedRaster::new(src, radius, radius, BorderPolicy::Constant(0.0))
    }

    #[test]
    fn test_dilate_single_pixel() -> Result<(), ImageError> {
        let mut src = RasterBuffer::from_size_val([5, 5].into(), 0u8)?;
        src.set_pixel(2, 2, 255)?;

        let kernel = StructuringElement::Cross { radius: 1 }.to_kernel();
        let dst = dilate(&bordered(&src, 1)?, &kernel)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 0, 255, 0, 0,
                0, 255, 255, 255, 0,
                0, 0, 255, 0, 0,
                0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_dilate_keeps_foreground_value() -> Result<(), ImageError> {
        let src = RasterBuffer::new([3, 1].into(), vec![0u8, 7, 3])?;
        let kernel = StructuringElement::Box {
            x_radius: 1,
            y_radius: 0,
        }
        .to_kernel();
        let dst = dilate(&bordered(&src, 1)?, &kernel)?;
        assert_eq!(dst.as_slice(), &[7, 7, 3]);
        Ok(())
    }

    #[test]
    fn test_erode_square() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0u8, 0, 0, 0, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let dst = erode(&bordered(&src, 1)?, &StructuringElement::default().to_kernel())?;
        assert_eq!(dst.count_where(|v| v != 0), 1);
        assert_eq!(dst.get_pixel(2, 2)?, 1);
        Ok(())
    }

    #[test]
    fn test_erode_consumes_border() -> Result<(), ImageError> {
        let src = RasterBuffer::from_size_val([4, 4].into(), 1i32)?;
        let bordered = BorderedRaster::new(&src, 2, 2, BorderPolicy::Copy)?;
        let dst = erode(&bordered, &StructuringElement::default().to_kernel())?;
        assert_eq!(dst.size(), ImageSize::from([6, 6]));
        assert!(dst.as_slice().iter().all(|&v| v == 1));
        Ok(())
    }

    #[test]
    fn test_morphology_insufficient_border() -> Result<(), ImageError> {
        let src = RasterBuffer::from_size_val([4, 4].into(), 1u8)?;
        let kernel = StructuringElement::Box {
            x_radius: 2,
            y_radius: 2,
        }
        .to_kernel();
        assert!(matches!(
            dilate(&bordered(&src, 1)?, &kernel),
            Err(ImageError::InsufficientBorder { .. })
        ));
        assert!(matches!(
            open(&bordered(&src, 1)?, &kernel),
            Err(ImageError::InsufficientBorder { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_open_removes_speck() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 6, height: 5 },
            vec![
                255u8, 0, 0, 0, 0, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 0, 0, 0, 0,
            ],
        )?;

        let dst = open(&bordered(&src, 1)?, &StructuringElement::default().to_kernel())?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 0, 0, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 255, 255, 255, 0,
                0, 0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_close_fills_hole() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0u8, 0, 0, 0, 0,
                0, 9, 9, 9, 0,
                0, 9, 0, 9, 0,
                0, 9, 9, 9, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let dst = close(&bordered(&src, 1)?, &StructuringElement::default().to_kernel())?;
        assert_eq!(dst.get_pixel(2, 2)?, 9);
        assert_eq!(dst.count_where(|v| v == 9), 9);
        Ok(())
    }

    #[test]
    fn test_outer_and_inner_border() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0u8, 0, 0, 0, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let outer = outer_border(&src)?;
        assert_eq!(outer.count_where(|v| v != 0), 16);
        assert_eq!(outer.get_pixel(2, 2)?, 0);
        assert_eq!(outer.get_pixel(0, 0)?, 1);

        let inner = inner_border(&src)?;
        assert_eq!(inner.count_where(|v| v != 0), 8);
        assert_eq!(inner.get_pixel(2, 2)?, 0);
        assert_eq!(inner.get_pixel(1, 1)?, 1);
        Ok(())
    }

    #[test]
    fn test_inner_border_at_image_edge() -> Result<(), ImageError> {
        let src = RasterBuffer::from_size_val([3, 3].into(), 4u16)?;
        let inner = inner_border(&src)?;
        assert_eq!(inner.count_where(|v| v == 4), 8);
        assert_eq!(inner.get_pixel(1, 1)?, 0);
        assert_eq!(outer_border(&src)?.count_where(|v| v != 0), 0);
        Ok(())
    }
}
