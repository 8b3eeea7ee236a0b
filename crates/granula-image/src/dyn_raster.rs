use crate::{ImageSize, PixelType, RasterBuffer};

/// A raster whose pixel type is only known at runtime.
///
/// Scalar variants can be handed to the generic processing engines. The
/// multi-component variants are carried so callers can route them, but the kernel
/// and morphology engines answer them with [`crate::ImageError::UnsupportedPixelType`].
#[derive(Clone, Debug, PartialEq)]
pub enum DynRaster {
    /// 8-bit unsigned pixels.
    U8(RasterBuffer<u8>),
    /// 16-bit signed pixels.
    I16(RasterBuffer<i16>),
    /// 16-bit unsigned pixels.
    U16(RasterBuffer<u16>),
    /// 32-bit signed pixels.
    I32(RasterBuffer<i32>),
    /// 32-bit unsigned pixels.
    U32(RasterBuffer<u32>),
    /// 32-bit float pixels.
    F32(RasterBuffer<f32>),
    /// 64-bit float pixels.
    F64(RasterBuffer<f64>),
    /// Complex pixels stored as `[re, im]`.
    Complex64(RasterBuffer<[f64; 2]>),
    /// Packed RGB pixels.
    Rgb8(RasterBuffer<[u8; 3]>),
}

macro_rules! dyn_dispatch {
    ($self:expr, $img:ident => $body:expr) => {
        match $self {
            DynRaster::U8($img) => $body,
            DynRaster::I16($img) => $body,
            DynRaster::U16($img) => $body,
            DynRaster::I32($img) => $body,
            DynRaster::U32($img) => $body,
            DynRaster::F32($img) => $body,
            DynRaster::F64($img) => $body,
            DynRaster::Complex64($img) => $body,
            DynRaster::Rgb8($img) => $body,
        }
    };
}

impl DynRaster {
    /// The runtime pixel tag of the wrapped raster.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            DynRaster::U8(_) => PixelType::U8,
            DynRaster::I16(_) => PixelType::I16,
            DynRaster::U16(_) => PixelType::U16,
            DynRaster::I32(_) => PixelType::I32,
            DynRaster::U32(_) => PixelType::U32,
            DynRaster::F32(_) => PixelType::F32,
            DynRaster::F64(_) => PixelType::F64,
            DynRaster::Complex64(_) => PixelType::Complex64,
            DynRaster::Rgb8(_) => PixelType::Rgb8,
        }
    }

    /// Size of the wrapped raster.
    pub fn size(&self) -> ImageSize {
        dyn_dispatch!(self, img => img.size())
    }

    /// Row stride of the wrapped raster, in pixels.
    pub fn stride(&self) -> usize {
        dyn_dispatch!(self, img => img.stride())
    }
}

macro_rules! impl_from_raster {
    ($ty:ty, $variant:ident) => {
        impl From<RasterBuffer<$ty>> for DynRaster {
            fn from(raster: RasterBuffer<$ty>) -> Self {
                DynRaster::$variant(raster)
            }
        }
    };
}

impl_from_raster!(u8, U8);
impl_from_raster!(i16, I16);
impl_from_raster!(u16, U16);
impl_from_raster!(i32, I32);
impl_from_raster!(u32, U32);
impl_from_raster!(f32, F32);
impl_from_raster!(f64, F64);
impl_from_raster!([f64; 2], Complex64);
impl_from_raster!([u8; 3], Rgb8);
