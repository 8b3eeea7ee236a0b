use granula_image::{DynRaster, ImageError, Pixel, RasterBuffer};

use crate::border::{BorderPolicy, BorderedRaster};
use crate::filter::{self, kernels::Kernel};
use crate::morphology;
use crate::particles::{self, BlobInfo, Polarity};

/// The morphological operator applied by [`morphology_dyn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MorphologyOp {
    /// See [`morphology::dilate`].
    Dilate,
    /// See [`morphology::erode`].
    Erode,
    /// See [`morphology::open`].
    Open,
    /// See [`morphology::close`].
    Close,
}

macro_rules! dispatch_scalar {
    ($src:expr, $img:ident => $body:expr) => {
        match $src {
            DynRaster::U8($img) => DynRaster::U8($body?),
            DynRaster::I16($img) => DynRaster::I16($body?),
            DynRaster::U16($img) => DynRaster::U16($body?),
            DynRaster::I32($img) => DynRaster::I32($body?),
            DynRaster::U32($img) => DynRaster::U32($body?),
            DynRaster::F32($img) => DynRaster::F32($body?),
            DynRaster::F64($img) => DynRaster::F64($body?),
            other => return Err(ImageError::UnsupportedPixelType(other.pixel_type())),
        }
    };
}

/// Convolve a runtime-typed image, padding it by the kernel radius with `policy`.
///
/// The output has the size and pixel type of the input.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] for multi-component pixels, plus the errors of
/// [`filter::convolve`].
pub fn convolve_dyn(
    src: &DynRaster,
    kernel: &Kernel,
    policy: BorderPolicy,
) -> Result<DynRaster, ImageError> {
    Ok(dispatch_scalar!(src, img => filter::filter2d(img, kernel, policy)))
}

/// Apply a binary morphological operator to a runtime-typed image.
///
/// The image is padded by the element radius with a zero border, so the output has the size
/// and pixel type of the input.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] for multi-component pixels.
pub fn morphology_dyn(
    src: &DynRaster,
    op: MorphologyOp,
    element: &Kernel,
) -> Result<DynRaster, ImageError> {
    Ok(dispatch_scalar!(src, img => apply_morphology(img, op, element)))
}

fn apply_morphology<T: Pixel>(
    src: &RasterBuffer<T>,
    op: MorphologyOp,
    element: &Kernel,
) -> Result<RasterBuffer<T>, ImageError> {
    let bordered = BorderedRaster::new(
        src,
        element.x_radius(),
        element.y_radius(),
        BorderPolicy::Constant(0.0),
    )?;
    match op {
        MorphologyOp::Dilate => morphology::dilate(&bordered, element),
        MorphologyOp::Erode => morphology::erode(&bordered, element),
        MorphologyOp::Open => morphology::open(&bordered, element),
        MorphologyOp::Close => morphology::close(&bordered, element),
    }
}

/// Extract the particles of a runtime-typed binary image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] for multi-component pixels, plus the errors of
/// [`particles::particle_info`].
pub fn particle_info_dyn(src: &DynRaster, polarity: Polarity) -> Result<Vec<BlobInfo>, ImageError> {
    match src {
        DynRaster::U8(img) => particles::particle_info(img, polarity),
        DynRaster::I16(img) => particles::particle_info(img, polarity),
        DynRaster::U16(img) => particles::particle_info(img, polarity),
        DynRaster::I32(img) => particles::particle_info(img, polarity),
        DynRaster::U32(img) => particles::particle_info(img, polarity),
        DynRaster::F32(img) => particles::particle_info(img, polarity),
        DynRaster::F64(img) => particles::particle_info(img, polarity),
        other => Err(ImageError::UnsupportedPixelType(other.pixel_type())),
    }
}
