use granula_image::{ImageError, Pixel, RasterBuffer};

/// A filled horizontal span `[left, right]` on row `y`.
#[derive(Debug, Clone, Copy)]
struct Span {
    left: usize,
    right: usize,
    y: usize,
}

/// Fill the 4-connected region of pixels equal to the seed's value with `value`.
///
/// Returns a new image; the source is untouched. See [`flood_fill_in_place`].
///
/// # Arguments
///
/// * `src` - The source image.
/// * `seed` - The `(x, y)` pixel the fill starts from.
/// * `value` - The fill value.
///
/// # Example
///
/// ```rust
/// use granula_image::{ImageSize, RasterBuffer};
/// use granula_imgproc::flood_fill::flood_fill;
///
/// let src = RasterBuffer::new(ImageSize { width: 3, height: 1 }, vec![0u8, 1, 0]).unwrap();
/// let dst = flood_fill(&src, (0, 0), 5).unwrap();
/// assert_eq!(dst.as_slice(), &[5, 1, 0]);
/// ```
pub fn flood_fill<T: Pixel>(
    src: &RasterBuffer<T>,
    seed: (usize, usize),
    value: T,
) -> Result<RasterBuffer<T>, ImageError> {
    let mut dst = src.clone();
    flood_fill_in_place(&mut dst, seed, value)?;
    Ok(dst)
}

/// Fill, in place, the 4-connected region of pixels equal to the seed's value with `value`.
///
/// Uses a stack of filled horizontal spans: each popped span scans the rows directly above
/// and below it for pixels of the seed colour and fills the runs it finds. Diagonal neighbours
/// are never reached.
///
/// If `value` equals the seed's value the image already satisfies the fill and nothing is done.
///
/// # Returns
///
/// The number of pixels that were filled.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if the seed lies outside the image.
pub fn flood_fill_in_place<T: Pixel>(
    img: &mut RasterBuffer<T>,
    seed: (usize, usize),
    value: T,
) -> Result<usize, ImageError> {
    let (seed_x, seed_y) = seed;
    let target = img.get(seed_x, seed_y).copied().ok_or_else(|| {
        ImageError::InvalidParameter(format!(
            "flood fill seed ({seed_x}, {seed_y}) is outside the image {}",
            img.size()
        ))
    })?;

    if target == value {
        log::debug!("flood fill at ({seed_x}, {seed_y}) skipped: fill value equals seed value");
        return Ok(0);
    }

    let mut stack = Vec::new();
    let mut filled = 0;

    if let Some(span) = linear_fill(img, seed_x, seed_y, target, value) {
        filled += span.right - span.left + 1;
        stack.push(span);
    }

    while let Some(span) = stack.pop() {
        let above = span.y.checked_sub(1);
        let below = Some(span.y + 1).filter(|&y| y < img.height());

        for y in [above, below].into_iter().flatten() {
            let mut x = span.left;
            while x <= span.right {
                match linear_fill(img, x, y, target, value) {
                    Some(found) => {
                        filled += found.right - found.left + 1;
                        x = found.right + 1;
                        stack.push(found);
                    }
                    None => x += 1,
                }
            }
        }
    }

    log::debug!("flood fill at ({seed_x}, {seed_y}) filled {filled} pixels");

    Ok(filled)
}

/// Fill the run of `target` pixels through `(x, y)` on one row, extending both ways.
fn linear_fill<T: Pixel>(
    img: &mut RasterBuffer<T>,
    x: usize,
    y: usize,
    target: T,
    value: T,
) -> Option<Span> {
    let row = img.row_mut(y);
    if row[x] != target {
        return None;
    }

    let mut left = x;
    while left > 0 && row[left - 1] == target {
        left -= 1;
    }

    let mut right = x;
    while right + 1 < row.len() && row[right + 1] == target {
        right += 1;
    }

    row[left..=right].fill(value);

    Some(Span { left, right, y })
}

/// Set to `fg` every background pixel that cannot reach the image edge through background.
///
/// Background is zero. Connectivity between background pixels is 4-connected, matching
/// [`flood_fill_in_place`], so holes touching the outside only diagonally are filled.
///
/// # Arguments
///
/// * `src` - The binary source image.
/// * `fg` - The value written into the holes.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if the image has zero area or `fg` is zero.
pub fn fill_holes<T: Pixel>(src: &RasterBuffer<T>, fg: T) -> Result<RasterBuffer<T>, ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::InvalidParameter(format!(
            "cannot fill holes of an empty image ({})",
            src.size()
        )));
    }
    if !fg.is_foreground() {
        return Err(ImageError::InvalidParameter(
            "hole fill value must be non-zero".to_string(),
        ));
    }

    const BACKGROUND: u8 = 1;
    const OUTSIDE: u8 = 2;

    // 1 marks background, 0 foreground
    let mut mask = RasterBuffer::from_fn(src.size(), |x, y| {
        if src.row(y)[x].is_foreground() {
            0u8
        } else {
            BACKGROUND
        }
    })?;

    let (width, height) = (src.width(), src.height());
    let edge = (0..width)
        .flat_map(|x| [(x, 0), (x, height - 1)])
        .chain((0..height).flat_map(|y| [(0, y), (width - 1, y)]));

    for seed in edge {
        if mask.get(seed.0, seed.1) == Some(&BACKGROUND) {
            flood_fill_in_place(&mut mask, seed, OUTSIDE)?;
        }
    }

    let mut dst = src.clone();
    let mut holes = 0;
    for y in 0..height {
        for (out, &m) in dst.row_mut(y).iter_mut().zip(mask.row(y)) {
            if m == BACKGROUND {
                *out = fg;
                holes += 1;
            }
        }
    }

    log::debug!("fill holes: {holes} pixels filled");

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use granula_image::ImageSize;

    #[test]
    fn test_flood_fill_region() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 5, height: 4 },
            vec![
                0u8, 0, 1, 0, 0,
                0, 1, 1, 0, 1,
                0, 0, 1, 0, 0,
                1, 0, 0, 0, 1,
            ],
        )?;

        let mut dst = src.clone();
        let filled = flood_fill_in_place(&mut dst, (0, 0), 7)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                7, 7, 1, 7, 7,
                7, 1, 1, 7, 1,
                7, 7, 1, 7, 7,
                1, 7, 7, 7, 1,
            ]
        );
        assert_eq!(filled, 13);
        assert_eq!(src.get_pixel(0, 0)?, 0);
        Ok(())
    }

    #[test]
    fn test_flood_fill_stops_at_diagonal() -> Result<(), ImageError> {
        let src = RasterBuffer::new([2, 2].into(), vec![1u8, 0, 0, 1])?;
        let dst = flood_fill(&src, (0, 0), 9)?;
        assert_eq!(dst.as_slice(), &[9, 0, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_flood_fill_same_value_is_noop() -> Result<(), ImageError> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut img = RasterBuffer::from_size_val([4, 4].into(), 3i16)?;
        assert_eq!(flood_fill_in_place(&mut img, (1, 1), 3)?, 0);
        assert!(img.as_slice().iter().all(|&v| v == 3));
        Ok(())
    }

    #[test]
    fn test_flood_fill_already_filled_region() -> Result<(), ImageError> {
        let src = RasterBuffer::new([3, 1].into(), vec![5.0f32, 5.0, 2.0])?;
        let once = flood_fill(&src, (0, 0), 2.0)?;
        assert_eq!(once.as_slice(), &[2.0, 2.0, 2.0]);

        // the region now holds the fill value: filling again with another value touches it all
        let mut twice = once.clone();
        assert_eq!(flood_fill_in_place(&mut twice, (2, 0), 8.0)?, 3);
        Ok(())
    }

    #[test]
    fn test_flood_fill_seed_outside() -> Result<(), ImageError> {
        let mut img = RasterBuffer::from_size_val([2, 2].into(), 0u8)?;
        assert!(matches!(
            flood_fill_in_place(&mut img, (2, 0), 1),
            Err(ImageError::InvalidParameter(_))
        ));
        Ok(())
    }

    #[test]
    fn test_flood_fill_spiral() -> Result<(), ImageError> {
        // a corridor that forces spans to turn back up and down
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 7, height: 5 },
            vec![
                0u32, 0, 0, 0, 0, 0, 0,
                1, 1, 1, 1, 1, 1, 0,
                0, 0, 0, 0, 0, 1, 0,
                0, 1, 1, 1, 1, 1, 0,
                0, 0, 0, 0, 0, 0, 0,
            ],
        )?;
        let mut img = src.clone();
        let filled = flood_fill_in_place(&mut img, (4, 2), 5)?;
        assert_eq!(filled, src.count_where(|v| v == 0));
        assert_eq!(img.count_where(|v| v == 0), 0);
        Ok(())
    }

    #[test]
    fn test_fill_holes() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 6, height: 5 },
            vec![
                0u8, 0, 0, 0, 0, 0,
                0, 255, 255, 255, 255, 0,
                0, 255, 0, 0, 255, 0,
                0, 255, 255, 255, 255, 0,
                0, 0, 0, 0, 0, 0,
            ],
        )?;
        let dst = fill_holes(&src, 255)?;
        assert_eq!(dst.get_pixel(2, 2)?, 255);
        assert_eq!(dst.get_pixel(3, 2)?, 255);
        assert_eq!(dst.count_where(|v| v == 255), 12);
        Ok(())
    }

    #[test]
    fn test_fill_holes_open_region_untouched() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = RasterBuffer::new(
            ImageSize { width: 4, height: 3 },
            vec![
                1u16, 1, 1, 1,
                1, 0, 0, 0,
                1, 1, 1, 1,
            ],
        )?;
        let dst = fill_holes(&src, 1)?;
        assert_eq!(dst, src);
        assert!(fill_holes(&src, 0).is_err());
        Ok(())
    }
}
