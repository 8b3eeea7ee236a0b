use crate::{ImageError, Pixel, RasterBuffer};

/// Cast the pixel data of a raster to a different type and scale it.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `dst` - The destination raster.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use granula_image::{ImageSize, RasterBuffer};
/// use granula_image::ops::cast_and_scale;
///
/// let image = RasterBuffer::<u8>::new(
///  ImageSize {
///   width: 2,
///   height: 1,
///  },
///  vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f32 = RasterBuffer::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get_pixel(0, 0).unwrap(), 0.0f32);
/// assert_eq!(image_f32.get_pixel(1, 0).unwrap(), 1.0f32);
/// ```
pub fn cast_and_scale<T, U>(
    src: &RasterBuffer<T>,
    dst: &mut RasterBuffer<U>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Pixel,
    U: Pixel + std::ops::Mul<U, Output = U>,
{
    require_same_size(src, dst)?;

    for y in 0..src.height() {
        dst.row_mut(y)
            .iter_mut()
            .zip(src.row(y).iter())
            .try_for_each(|(out, &inp)| {
                let x = <U as num_traits::NumCast>::from(inp).ok_or(ImageError::CastError(
                    std::any::type_name::<U>().to_string(),
                ))?;
                *out = x * scale;
                Ok::<(), ImageError>(())
            })?;
    }

    Ok(())
}

/// Copy the logical pixels of `src` into `dst`, row by row.
///
/// The two rasters may have different strides but must share a size.
pub fn copy_into<T>(src: &RasterBuffer<T>, dst: &mut RasterBuffer<T>) -> Result<(), ImageError>
where
    T: Copy,
{
    require_same_size(src, dst)?;

    for y in 0..src.height() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }

    Ok(())
}

/// Binarize a raster: foreground (non-zero) pixels become `fg`, the rest become zero.
pub fn binarize<T, U>(src: &RasterBuffer<T>, fg: U) -> Result<RasterBuffer<U>, ImageError>
where
    T: Pixel,
    U: Pixel,
{
    let mut dst = RasterBuffer::from_size_val(src.size(), U::zero())?;
    for y in 0..src.height() {
        dst.row_mut(y)
            .iter_mut()
            .zip(src.row(y).iter())
            .filter(|(_, inp)| inp.is_foreground())
            .for_each(|(out, _)| *out = fg);
    }
    Ok(dst)
}

fn require_same_size<T, U>(a: &RasterBuffer<T>, b: &RasterBuffer<U>) -> Result<(), ImageError>
where
    T: Copy,
    U: Copy,
{
    if a.size() != b.size() {
        return Err(ImageError::DimensionMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSize;

    #[test]
    fn test_cast_and_scale() -> Result<(), ImageError> {
        let image = RasterBuffer::<u8>::new(
            ImageSize {
                height: 2,
                width: 3,
            },
            vec![0u8, 0, 255, 0, 0, 255],
        )?;

        let mut image_f64: RasterBuffer<f64> = RasterBuffer::from_size_val(image.size(), 0.0)?;

        super::cast_and_scale(&image, &mut image_f64, 1. / 255.0)?;

        let expected = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

        assert_eq!(image_f64.as_slice(), expected);

        Ok(())
    }

    #[test]
    fn test_cast_and_scale_size_mismatch() -> Result<(), ImageError> {
        let image = RasterBuffer::<u8>::from_size_val([2, 2].into(), 1)?;
        let mut dst = RasterBuffer::<f32>::from_size_val([3, 2].into(), 0.0)?;
        assert_eq!(
            cast_and_scale(&image, &mut dst, 1.0),
            Err(ImageError::DimensionMismatch(2, 2, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn test_copy_into_strided() -> Result<(), ImageError> {
        let src = RasterBuffer::new([2, 2].into(), vec![1u16, 2, 3, 4])?;
        let mut dst = RasterBuffer::with_stride([2, 2].into(), 4, vec![0u16; 8])?;
        copy_into(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[1, 2, 0, 0, 3, 4, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_binarize() -> Result<(), ImageError> {
        let src = RasterBuffer::new([4, 1].into(), vec![0.0f32, 0.5, -1.0, 0.0])?;
        let mask = binarize(&src, 255u8)?;
        assert_eq!(mask.as_slice(), &[0, 255, 255, 0]);
        Ok(())
    }
}
