use granula_image::{ImageError, ImageSize, Pixel, RasterBuffer};

use crate::border::BorderedRaster;

/// A `(2 * x_radius + 1) x (2 * y_radius + 1)` view sliding over a [`BorderedRaster`].
///
/// Positions are given in output coordinates: output pixel `(x, y)` is centred on buffer
/// pixel `(x + x_radius, y + y_radius)`, so the window never leaves the buffer.
pub struct KernelWindow<'a, T> {
    raster: &'a RasterBuffer<T>,
    x_radius: usize,
    y_radius: usize,
    x: usize,
    y: usize,
}

impl<'a, T: Copy> KernelWindow<'a, T> {
    /// Create a window over `src`, positioned at output pixel `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InsufficientBorder`] if the margin of `src` is smaller than a radius.
    pub fn new(
        src: &'a BorderedRaster<T>,
        x_radius: usize,
        y_radius: usize,
    ) -> Result<Self, ImageError>
    where
        T: Pixel,
    {
        src.require_margin(x_radius, y_radius)?;
        Ok(Self {
            raster: src.raster(),
            x_radius,
            y_radius,
            x: 0,
            y: 0,
        })
    }

    /// Size of the raster produced by sliding the window over the whole buffer.
    pub fn output_size(&self) -> ImageSize {
        ImageSize {
            width: self.raster.width() - 2 * self.x_radius,
            height: self.raster.height() - 2 * self.y_radius,
        }
    }

    /// Number of columns covered by the window.
    pub fn width(&self) -> usize {
        2 * self.x_radius + 1
    }

    /// Number of rows covered by the window.
    pub fn height(&self) -> usize {
        2 * self.y_radius + 1
    }

    /// Centre the window on output pixel `(x, y)`.
    ///
    /// PRECONDITION: `(x, y)` lies inside [`KernelWindow::output_size`].
    #[inline]
    pub fn move_to(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }

    /// The pixel under the centre of the window.
    #[inline]
    pub fn center(&self) -> T {
        self.raster.row(self.y + self.y_radius)[self.x + self.x_radius]
    }

    /// Row `ky` of the window, `0 <= ky < height`.
    #[inline]
    pub fn row(&self, ky: usize) -> &'a [T] {
        &self.raster.row(self.y + ky)[self.x..self.x + self.width()]
    }

    /// Window pixels in row-major order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = T> + 'a {
        let raster = self.raster;
        let (x, y, width) = (self.x, self.y, self.width());
        (y..y + self.height()).flat_map(move |row| raster.row(row)[x..x + width].iter().copied())
    }

    /// Window pixels paired with the kernel weight at the same offset.
    ///
    /// PRECONDITION: `weights.len() == width * height`.
    #[inline]
    pub fn zip_weights<'w, W: Copy>(
        &self,
        weights: &'w [W],
    ) -> impl Iterator<Item = (T, W)> + 'w
    where
        'a: 'w,
    {
        self.values().zip(weights.iter().copied())
    }
}

/// Slide a window over `src` and reduce every position to one output pixel.
///
/// This is the engine shared by convolution, morphology and the median filter: it validates
/// the margin once and then calls `reduce` for each output pixel in raster order.
///
/// # Arguments
///
/// * `src` - The bordered source image.
/// * `x_radius` - Horizontal radius of the window.
/// * `y_radius` - Vertical radius of the window.
/// * `reduce` - Maps a positioned window to the output pixel.
///
/// # Errors
///
/// Returns [`ImageError::InsufficientBorder`] if the margin is smaller than a radius.
pub fn reduce_windows<T, U, F>(
    src: &BorderedRaster<T>,
    x_radius: usize,
    y_radius: usize,
    mut reduce: F,
) -> Result<RasterBuffer<U>, ImageError>
where
    T: Pixel,
    U: Copy,
    F: FnMut(&KernelWindow<T>) -> U,
{
    let mut window = KernelWindow::new(src, x_radius, y_radius)?;
    let size = window.output_size();

    let mut data = Vec::with_capacity(size.area());
    for y in 0..size.height {
        for x in 0..size.width {
            window.move_to(x, y);
            data.push(reduce(&window));
        }
    }

    RasterBuffer::new(size, data)
}
