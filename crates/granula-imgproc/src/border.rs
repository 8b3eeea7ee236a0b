use granula_image::{ImageError, ImageSize, Pixel, RasterBuffer};

/// A border type used to fill the margin of a [`BorderedRaster`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderPolicy {
    /// This border type fills the border with a single, constant value.
    ///
    /// The value is saturated into the range of the pixel type.
    ///
    /// Example: ...d c b a | v v v v...
    Constant(f64),

    /// This border type takes the outermost row or column of pixels and repeats it into the margin.
    ///
    /// Example: ...d c b a | a a a a...
    Copy,

    /// Reflects the image across its boundary, starting with the edge pixel itself.
    ///
    /// Margins wider than the image keep reflecting back and forth across the image.
    ///
    /// Example: ...c b a | a b c d...
    Mirror,
}

impl Default for BorderPolicy {
    fn default() -> Self {
        BorderPolicy::Constant(0.0)
    }
}

impl BorderPolicy {
    /// Index of `i` reflected about the outer sides of `0` and `len - 1`, period `2 * len`.
    #[inline]
    fn mirror(i: isize, len: usize) -> usize {
        let len = len as isize;
        let m = i.rem_euclid(2 * len);
        if m < len {
            m as usize
        } else {
            (2 * len - 1 - m) as usize
        }
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the policy.
    ///
    /// - `Copy`: clamp to edge
    /// - `Mirror`: reflect including edge
    /// - `Constant`: returns `None`, the margin does not read the source
    ///
    /// PRECONDITION: `len > 0`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        match self {
            BorderPolicy::Constant(_) => None,
            BorderPolicy::Copy => Some(i.clamp(0, len as isize - 1) as usize),
            BorderPolicy::Mirror => Some(Self::mirror(i, len)),
        }
    }
}

/// A raster surrounded by a margin of `x_margin` columns and `y_margin` rows on each side.
///
/// The logical image occupies `[x_margin, x_margin + width) x [y_margin, y_margin + height)`
/// of the underlying buffer. Windowed operations read the margin instead of bounds checking.
#[derive(Clone, Debug, PartialEq)]
pub struct BorderedRaster<T> {
    raster: RasterBuffer<T>,
    x_margin: usize,
    y_margin: usize,
}

impl<T: Pixel> BorderedRaster<T> {
    /// Builds a bordered copy of `src` with the margin filled by `policy`.
    ///
    /// # Arguments
    ///
    /// * `src` - The source image.
    /// * `x_margin` - Number of columns added to the left and to the right.
    /// * `y_margin` - Number of rows added to the top and to the bottom.
    /// * `policy` - How the margin pixels are produced.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the source has zero area.
    ///
    /// # Example
    ///
    /// ```rust
    /// use granula_image::{ImageSize, RasterBuffer};
    /// use granula_imgproc::border::{BorderPolicy, BorderedRaster};
    ///
    /// let src = RasterBuffer::new(ImageSize { width: 2, height: 1 }, vec![1u8, 2]).unwrap();
    /// let bordered = BorderedRaster::new(&src, 2, 0, BorderPolicy::Mirror).unwrap();
    ///
    /// assert_eq!(bordered.raster().row(0), &[2, 1, 1, 2, 2, 1]);
    /// ```
    pub fn new(
        src: &RasterBuffer<T>,
        x_margin: usize,
        y_margin: usize,
        policy: BorderPolicy,
    ) -> Result<Self, ImageError> {
        if src.size().is_empty() {
            return Err(ImageError::InvalidParameter(format!(
                "cannot build a border around an empty image ({})",
                src.size()
            )));
        }

        let width = src.width();
        let height = src.height();
        let new_size = ImageSize {
            width: width + 2 * x_margin,
            height: height + 2 * y_margin,
        };

        let fill = match policy {
            BorderPolicy::Constant(v) => T::from_f64_saturating(v),
            _ => T::zero(),
        };
        let mut raster = RasterBuffer::from_size_val(new_size, fill)?;

        // copy old image data as center of new image data
        for y in 0..height {
            raster.row_mut(y + y_margin)[x_margin..x_margin + width].copy_from_slice(src.row(y));
        }

        if !matches!(policy, BorderPolicy::Constant(_)) {
            // left and right margins of the interior rows
            for y in y_margin..y_margin + height {
                let row = raster.row_mut(y);
                for x in (0..x_margin).chain(x_margin + width..new_size.width) {
                    if let Some(src_x) = policy.map_index(x as isize - x_margin as isize, width) {
                        row[x] = row[x_margin + src_x];
                    }
                }
            }

            // top and bottom margins copy whole, already widened rows
            for y in (0..y_margin).chain(y_margin + height..new_size.height) {
                if let Some(src_y) = policy.map_index(y as isize - y_margin as isize, height) {
                    let start = (y_margin + src_y) * new_size.width;
                    raster
                        .as_slice_mut()
                        .copy_within(start..start + new_size.width, y * new_size.width);
                }
            }
        }

        Ok(Self {
            raster,
            x_margin,
            y_margin,
        })
    }

    /// Wraps an already padded buffer, treating its outer `x_margin` columns and
    /// `y_margin` rows as margin.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the margins leave no logical image.
    pub fn from_padded(
        raster: RasterBuffer<T>,
        x_margin: usize,
        y_margin: usize,
    ) -> Result<Self, ImageError> {
        if raster.width() <= 2 * x_margin || raster.height() <= 2 * y_margin {
            return Err(ImageError::InvalidParameter(format!(
                "margins ({x_margin}, {y_margin}) leave no image inside {}",
                raster.size()
            )));
        }

        Ok(Self {
            raster,
            x_margin,
            y_margin,
        })
    }

    /// The `(x_margin, y_margin)` pair.
    pub fn margins(&self) -> (usize, usize) {
        (self.x_margin, self.y_margin)
    }

    /// Size of the logical image, without the margin.
    pub fn image_size(&self) -> ImageSize {
        ImageSize {
            width: self.raster.width() - 2 * self.x_margin,
            height: self.raster.height() - 2 * self.y_margin,
        }
    }

    /// The full buffer, margin included.
    pub fn raster(&self) -> &RasterBuffer<T> {
        &self.raster
    }

    /// Consume the bordered raster and return the full buffer.
    pub fn into_inner(self) -> RasterBuffer<T> {
        self.raster
    }

    /// Copy the logical image out of the buffer.
    pub fn interior(&self) -> Result<RasterBuffer<T>, ImageError> {
        self.raster.crop(self.x_margin, self.y_margin, self.image_size())
    }

    /// Checks that the margin is wide enough for a kernel of the given radii.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InsufficientBorder`] if either margin is smaller than its radius.
    pub fn require_margin(&self, x_radius: usize, y_radius: usize) -> Result<(), ImageError> {
        if self.x_margin < x_radius || self.y_margin < y_radius {
            return Err(ImageError::InsufficientBorder {
                x_margin: self.x_margin,
                y_margin: self.y_margin,
                x_radius,
                y_radius,
            });
        }
        Ok(())
    }
}
