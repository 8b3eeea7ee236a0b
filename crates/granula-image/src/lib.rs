#![deny(missing_docs)]
//! Raster buffer types and pixel traits for image analysis

/// image representation for image analysis purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// pixel traits and runtime pixel tags.
pub mod pixel;

/// runtime-typed raster container.
pub mod dyn_raster;

/// element-wise raster operations.
pub mod ops;

pub use crate::dyn_raster::DynRaster;
pub use crate::error::ImageError;
pub use crate::image::{ImageSize, RasterBuffer};
pub use crate::pixel::{Accumulator, Pixel, PixelType};
