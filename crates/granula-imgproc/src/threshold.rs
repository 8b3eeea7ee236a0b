use std::cmp::Ordering;

use granula_image::{ImageError, Pixel, RasterBuffer};

/// Replace every pixel inside the inclusive range `[min, max]` with `new_value`.
///
/// Pixels outside the range are copied unchanged.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `min` - The lower end of the range, inclusive.
/// * `max` - The upper end of the range, inclusive.
/// * `new_value` - The value written to in-range pixels.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `min > max` or the range is not comparable.
///
/// Example:
///
/// ```
/// use granula_image::RasterBuffer;
/// use granula_imgproc::threshold::threshold;
///
/// let image = RasterBuffer::new([4, 1].into(), vec![10u8, 20, 30, 40]).unwrap();
/// let out = threshold(&image, 20, 30, 99).unwrap();
///
/// assert_eq!(out.as_slice(), &[10, 99, 99, 40]);
/// ```
pub fn threshold<T: Pixel>(
    src: &RasterBuffer<T>,
    min: T,
    max: T,
    new_value: T,
) -> Result<RasterBuffer<T>, ImageError> {
    let mut dst = src.to_contiguous();
    threshold_in_place(&mut dst, min, max, new_value)?;
    Ok(dst)
}

/// In-place variant of [`threshold`]. Returns the number of pixels replaced.
pub fn threshold_in_place<T: Pixel>(
    src: &mut RasterBuffer<T>,
    min: T,
    max: T,
    new_value: T,
) -> Result<usize, ImageError> {
    require_range(min, max)?;

    let mut replaced = 0;
    for y in 0..src.height() {
        src.row_mut(y)
            .iter_mut()
            .filter(|v| **v >= min && **v <= max)
            .for_each(|v| {
                *v = new_value;
                replaced += 1;
            });
    }

    log::debug!("threshold [{min:?}, {max:?}] replaced {replaced} pixels");
    Ok(replaced)
}

/// Build a binary mask from the inclusive range `[min, max]`.
///
/// In-range pixels become `fg` and every other pixel becomes zero.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `min` - The lower end of the range, inclusive.
/// * `max` - The upper end of the range, inclusive.
/// * `fg` - The foreground value of the mask.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `min > max` or the range is not comparable.
pub fn threshold_binary<T, U>(
    src: &RasterBuffer<T>,
    min: T,
    max: T,
    fg: U,
) -> Result<RasterBuffer<U>, ImageError>
where
    T: Pixel,
    U: Pixel,
{
    require_range(min, max)?;

    let mut dst = RasterBuffer::from_size_val(src.size(), U::zero())?;
    for y in 0..src.height() {
        dst.row_mut(y)
            .iter_mut()
            .zip(src.row(y).iter())
            .filter(|(_, &v)| v >= min && v <= max)
            .for_each(|(out, _)| *out = fg);
    }

    Ok(dst)
}

fn require_range<T: Pixel>(min: T, max: T) -> Result<(), ImageError> {
    // NaN bounds compare as None
    if !matches!(min.partial_cmp(&max), Some(Ordering::Less | Ordering::Equal)) {
        return Err(ImageError::InvalidParameter(format!(
            "threshold range [{min:?}, {max:?}] is empty"
        )));
    }
    Ok(())
}
