use granula_image::{ImageError, ImageSize, Pixel, RasterBuffer};

use crate::border::BorderedRaster;
use crate::filter::window::KernelWindow;

/// A local maximum in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak<T> {
    /// Column of the peak.
    pub x: usize,
    /// Row of the peak.
    pub y: usize,
    /// Pixel value at the peak.
    pub value: T,
}

/// Find the local maxima of an image with a 3x3 non-maximum suppression.
///
/// A pixel is a peak when it is strictly above `threshold` and no 8-connected neighbour is
/// greater. Pixels of a flat plateau are all reported. Peaks are returned in raster order,
/// in the coordinates of the logical image.
///
/// # Arguments
///
/// * `src` - The bordered source image; both margins must be at least 1.
/// * `threshold` - Pixels at or below this value are never peaks.
///
/// # Errors
///
/// Returns [`ImageError::InsufficientBorder`] if a margin is zero.
pub fn local_maxima<T: Pixel>(
    src: &BorderedRaster<T>,
    threshold: T,
) -> Result<Vec<Peak<T>>, ImageError> {
    let mut window = KernelWindow::new(src, 1, 1)?;
    let (x_margin, y_margin) = src.margins();
    let size = src.image_size();

    let mut peaks = Vec::new();
    for y in 0..size.height {
        for x in 0..size.width {
            window.move_to(x + x_margin - 1, y + y_margin - 1);
            let value = window.center();
            if value > threshold && window.values().all(|v| v <= value) {
                peaks.push(Peak { x, y, value });
            }
        }
    }

    log::debug!("{} local maxima above {threshold:?} in {size}", peaks.len());
    Ok(peaks)
}

/// Keep the `n` brightest peaks, brightest first.
///
/// Peaks of equal value keep their raster order. NaN peaks are dropped.
pub fn brightest<T: Pixel>(mut peaks: Vec<Peak<T>>, n: usize) -> Vec<Peak<T>> {
    peaks.retain(|p| p.value.partial_cmp(&p.value).is_some());
    peaks.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    peaks.truncate(n);
    peaks
}

/// Paint a solid `marker x marker` square of 255 centred on every peak.
///
/// Squares are clipped to the image and peaks outside it are ignored. A marker of zero is
/// treated as one.
/// Large markers let neighbouring peaks merge into one particle.
pub fn draw_maxima<T>(
    size: ImageSize,
    peaks: &[Peak<T>],
    marker: usize,
) -> Result<RasterBuffer<u8>, ImageError> {
    let marker = marker.max(1);
    let mut dst = RasterBuffer::from_size_val(size, 0u8)?;

    for peak in peaks {
        let left = peak.x.saturating_sub(marker / 2);
        let top = peak.y.saturating_sub(marker / 2);
        let right = (peak.x + marker - marker / 2).min(size.width);
        let bottom = (peak.y + marker - marker / 2).min(size.height);
        if left >= right {
            continue;
        }
        for y in top..bottom {
            dst.row_mut(y)[left..right].fill(255);
        }
    }

    Ok(dst)
}

/// Mark the local maxima of an image above `threshold`.
///
/// Combines [`local_maxima`] and [`draw_maxima`]: each peak becomes a square of side
/// `min_separation` in a binary mask of the logical image size.
pub fn find_image_maxima<T: Pixel>(
    src: &BorderedRaster<T>,
    threshold: T,
    min_separation: usize,
) -> Result<RasterBuffer<u8>, ImageError> {
    let peaks = local_maxima(src, threshold)?;
    draw_maxima(src.image_size(), &peaks, min_separation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderPolicy;

    fn two_hills() -> Result<RasterBuffer<u8>, ImageError> {
        RasterBuffer::new(
            [6, 4].into(),
            vec![
                0, 10, 0, 0, 0, 0, //
                10, 90, 10, 0, 30, 0, //
                0, 10, 0, 0, 70, 0, //
                0, 0, 0, 0, 0, 0,
            ],
        )
    }

    #[test]
    fn test_local_maxima_above_threshold() -> Result<(), ImageError> {
        let src = BorderedRaster::new(&two_hills()?, 1, 1, BorderPolicy::Constant(0.0))?;

        let peaks = local_maxima(&src, 50)?;
        assert_eq!(
            peaks,
            vec![
                Peak { x: 1, y: 1, value: 90 },
                Peak { x: 4, y: 2, value: 70 }
            ]
        );

        // the threshold itself is excluded
        assert_eq!(local_maxima(&src, 70)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_local_maxima_plateau_and_margin() -> Result<(), ImageError> {
        let flat = RasterBuffer::from_size_val([3, 2].into(), 5i32)?;
        let bordered = BorderedRaster::new(&flat, 2, 3, BorderPolicy::Copy)?;
        let peaks = local_maxima(&bordered, 0)?;
        assert_eq!(peaks.len(), 6);
        assert_eq!((peaks[5].x, peaks[5].y), (2, 1));

        let unbordered = BorderedRaster::new(&flat, 0, 1, BorderPolicy::Copy)?;
        assert!(matches!(
            local_maxima(&unbordered, 0),
            Err(ImageError::InsufficientBorder { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_brightest_keeps_order_of_ties() {
        let peaks = vec![
            Peak { x: 0, y: 0, value: 1.0f32 },
            Peak { x: 1, y: 0, value: 3.0 },
            Peak { x: 2, y: 0, value: 1.0 },
            Peak { x: 3, y: 0, value: 2.0 },
        ];
        let top = brightest(peaks, 3);
        let xs: Vec<usize> = top.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1, 3, 0]);
    }

    #[test]
    fn test_draw_maxima_clips_markers() -> Result<(), ImageError> {
        let peaks = [Peak { x: 0, y: 0, value: 1u8 }, Peak { x: 4, y: 3, value: 1 }];
        let mask = draw_maxima([5, 4].into(), &peaks, 3)?;
        assert_eq!(mask.row(0), &[255, 255, 0, 0, 0]);
        assert_eq!(mask.row(1), &[255, 255, 0, 0, 0]);
        assert_eq!(mask.row(2), &[0, 0, 0, 255, 255]);
        assert_eq!(mask.row(3), &[0, 0, 0, 255, 255]);

        let dots = draw_maxima([3, 1].into(), &peaks[..1], 0)?;
        assert_eq!(dots.as_slice(), &[255, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_find_image_maxima_marks_each_hill() -> Result<(), ImageError> {
        let src = BorderedRaster::new(&two_hills()?, 1, 1, BorderPolicy::Constant(0.0))?;
        let mask = find_image_maxima(&src, 50, 1)?;
        assert_eq!(mask.count_where(|v| v == 255), 2);
        assert_eq!(mask.get_pixel(1, 1)?, 255);
        assert_eq!(mask.get_pixel(4, 2)?, 255);
        Ok(())
    }
}
