use crate::pixel::PixelType;

/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when two operand rasters must share a size but do not.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    /// Error when the margin of a bordered raster is smaller than the kernel radius.
    #[error("Border ({x_margin}, {y_margin}) is smaller than the kernel radius ({x_radius}, {y_radius})")]
    InsufficientBorder {
        /// Horizontal margin of the bordered raster.
        x_margin: usize,
        /// Vertical margin of the bordered raster.
        y_margin: usize,
        /// Horizontal radius required by the operation.
        x_radius: usize,
        /// Vertical radius required by the operation.
        y_radius: usize,
    },

    /// Error when an operation does not handle the given pixel representation.
    #[error("Unsupported pixel type: {0:?}")]
    UnsupportedPixelType(PixelType),

    /// Error when an argument is out of its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error when the data length does not match stride * height.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the row stride is smaller than the width.
    #[error("Row stride ({0}) is smaller than the image width ({1})")]
    InvalidStride(usize, usize),

    /// Error when a pixel coordinate lies outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
