use crate::error::ImageError;
use crate::pixel::{Pixel, PixelType};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use granula_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// A 2D raster of a single pixel type with a row stride.
///
/// Rows are stored top to bottom; row `y` starts at `y * stride` and its first `width`
/// elements are the logical pixels. Any trailing elements up to `stride` are padding
/// and are never read by the image processing operations.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer<T> {
    size: ImageSize,
    stride: usize,
    data: Vec<T>,
}

impl<T> RasterBuffer<T>
where
    T: Copy,
{
    /// Create a new raster from tightly packed pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, row-major.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use granula_image::{ImageSize, RasterBuffer};
    ///
    /// let image = RasterBuffer::<u8>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// assert_eq!(image.stride(), 10);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        Self::with_stride(size, size.width, data)
    }

    /// Create a new raster whose rows are `stride` pixels apart.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidStride`] if `stride < width` and
    /// [`ImageError::InvalidDataLength`] if `data.len() != stride * height`.
    pub fn with_stride(size: ImageSize, stride: usize, data: Vec<T>) -> Result<Self, ImageError> {
        if stride < size.width {
            return Err(ImageError::InvalidStride(stride, size.width));
        }

        if data.len() != stride * size.height {
            return Err(ImageError::InvalidDataLength(
                data.len(),
                stride * size.height,
            ));
        }

        Ok(Self { size, stride, data })
    }

    /// Create a new raster with every pixel set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use granula_image::{ImageSize, RasterBuffer};
    ///
    /// let image = RasterBuffer::from_size_val(ImageSize { width: 3, height: 2 }, 7u16).unwrap();
    ///
    /// assert_eq!(image.get(2, 1), Some(&7));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError> {
        Self::new(size, vec![val; size.width * size.height])
    }

    /// Create a raster by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(size: ImageSize, f: impl Fn(usize, usize) -> T) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Distance in pixels between the starts of two consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the rows are stored without padding.
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.size.width
    }

    /// The whole pixel storage, including stride padding.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole mutable pixel storage, including stride padding.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the raster and return its storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The `width` logical pixels of row `y`.
    ///
    /// PRECONDITION: `y < height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.size.width]
    }

    /// The `width` logical pixels of row `y`, mutably.
    ///
    /// PRECONDITION: `y < height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.stride;
        let width = self.size.width;
        &mut self.data[start..start + width]
    }

    /// Iterate over the logical rows from top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.size.height).map(move |y| self.row(y))
    }

    /// Get a reference to the pixel at `(x, y)`, or `None` if outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Get the pixel value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] if the coordinate lies outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<T, ImageError> {
        self.get(x, y).copied().ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.size.width,
            self.size.height,
        ))
    }

    /// Set the pixel value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] if the coordinate lies outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, val: T) -> Result<(), ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        self.data[y * self.stride + x] = val;
        Ok(())
    }

    /// Copy the logical pixels into a tightly packed raster (stride == width).
    pub fn to_contiguous(&self) -> RasterBuffer<T> {
        let mut data = Vec::with_capacity(self.size.area());
        for row in self.rows_iter() {
            data.extend_from_slice(row);
        }
        RasterBuffer {
            size: self.size,
            stride: self.size.width,
            data,
        }
    }

    /// Copy a rectangular region into a new tightly packed raster.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidParameter`] if the region does not fit inside the image.
    pub fn crop(&self, x: usize, y: usize, size: ImageSize) -> Result<RasterBuffer<T>, ImageError> {
        if x + size.width > self.size.width || y + size.height > self.size.height {
            return Err(ImageError::InvalidParameter(format!(
                "crop region {}x{} at ({}, {}) exceeds {}",
                size.width, size.height, x, y, self.size
            )));
        }

        let mut data = Vec::with_capacity(size.area());
        for row in y..y + size.height {
            data.extend_from_slice(&self.row(row)[x..x + size.width]);
        }
        RasterBuffer::new(size, data)
    }

    /// Count the logical pixels for which `pred` holds.
    pub fn count_where(&self, pred: impl Fn(T) -> bool) -> usize {
        self.rows_iter()
            .map(|row| row.iter().filter(|&&v| pred(v)).count())
            .sum()
    }
}

impl<T> RasterBuffer<T>
where
    T: Pixel,
{
    /// The runtime tag of the pixel type.
    pub fn pixel_type(&self) -> PixelType {
        T::PIXEL_TYPE
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::CastError`] if a value does not fit in the target type.
    pub fn cast<U>(&self) -> Result<RasterBuffer<U>, ImageError>
    where
        U: Pixel,
    {
        let mut data = Vec::with_capacity(self.size.area());
        for row in self.rows_iter() {
            for &x in row {
                let xu = <U as num_traits::NumCast>::from(x)
                    .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
                data.push(xu);
            }
        }
        RasterBuffer::new(self.size, data)
    }
}
