use std::fmt::Debug;
use std::ops::{Add, Div, Mul};

use num_traits::{Bounded, NumCast, ToPrimitive, Zero};

/// Tag describing the pixel representation of a raster.
///
/// The scalar variants map one to one onto the [`Pixel`] implementations.
/// `Complex64` and `Rgb8` are multi-component pixels: they can be carried around in a
/// [`crate::DynRaster`] but the kernel and morphology engines reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelType {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Pair of 64-bit floats (real, imaginary).
    Complex64,
    /// Three 8-bit channels.
    Rgb8,
}

impl PixelType {
    /// Number of numeric components per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelType::Complex64 => 2,
            PixelType::Rgb8 => 3,
            _ => 1,
        }
    }

    /// Size of one pixel in bytes.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelType::U8 => 1,
            PixelType::I16 | PixelType::U16 => 2,
            PixelType::I32 | PixelType::U32 | PixelType::F32 => 4,
            PixelType::F64 => 8,
            PixelType::Complex64 => 16,
            PixelType::Rgb8 => 3,
        }
    }

    /// Whether the pixel is a single real numeric channel.
    pub fn is_scalar(&self) -> bool {
        self.channels() == 1
    }

    /// Whether the pixel components are integers.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            PixelType::U8
                | PixelType::I16
                | PixelType::U16
                | PixelType::I32
                | PixelType::U32
                | PixelType::Rgb8
        )
    }

    /// Whether the pixel components can hold negative values.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            PixelType::I16 | PixelType::I32 | PixelType::F32 | PixelType::F64 | PixelType::Complex64
        )
    }
}

/// Numeric type used to sum weighted pixels inside a kernel window.
pub trait Accumulator:
    Copy
    + Debug
    + PartialOrd
    + Zero
    + Add<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + ToPrimitive
    + Send
    + Sync
{
    /// `self + value * weight`, saturating at the accumulator bounds.
    fn mul_add_saturating(self, value: Self, weight: Self) -> Self;

    /// `self / divisor`, saturating at the accumulator bounds.
    ///
    /// PRECONDITION: `divisor` is non-zero.
    fn div_saturating(self, divisor: Self) -> Self;
}

impl Accumulator for i64 {
    #[inline]
    fn mul_add_saturating(self, value: i64, weight: i64) -> i64 {
        self.saturating_add(value.saturating_mul(weight))
    }

    #[inline]
    fn div_saturating(self, divisor: i64) -> i64 {
        self.saturating_div(divisor)
    }
}

impl Accumulator for f64 {
    #[inline]
    fn mul_add_saturating(self, value: f64, weight: f64) -> f64 {
        self + value * weight
    }

    #[inline]
    fn div_saturating(self, divisor: f64) -> f64 {
        self / divisor
    }
}

/// A single real numeric pixel channel.
///
/// Integer pixels accumulate in `i64` and see kernel weights truncated to integers;
/// floating pixels accumulate in `f64`.
pub trait Pixel:
    Copy + Debug + Default + PartialEq + PartialOrd + Zero + Bounded + NumCast + Send + Sync + 'static
{
    /// The runtime tag of this pixel type.
    const PIXEL_TYPE: PixelType;

    /// The accumulator used for weighted sums.
    type Accumulator: Accumulator;

    /// Widen the pixel into the accumulator type.
    fn to_accumulator(self) -> Self::Accumulator;

    /// Convert a kernel weight into the accumulator type.
    fn weight_to_accumulator(weight: f64) -> Self::Accumulator;

    /// Narrow an accumulated value back into the pixel range, saturating at the bounds.
    fn from_accumulator(acc: Self::Accumulator) -> Self {
        match <Self as NumCast>::from(acc) {
            Some(v) => v,
            None if acc < <Self::Accumulator as Zero>::zero() => Self::min_value(),
            None => Self::max_value(),
        }
    }

    /// Convert a double into the pixel range, saturating at the bounds.
    fn from_f64_saturating(value: f64) -> Self {
        match <Self as NumCast>::from(value) {
            Some(v) => v,
            None if value < 0.0 => Self::min_value(),
            None => Self::max_value(),
        }
    }

    /// Binary foreground test: any non-zero value.
    #[inline]
    fn is_foreground(self) -> bool {
        self != Self::zero()
    }
}

macro_rules! impl_integer_pixel {
    ($ty:ty, $tag:ident) => {
        impl Pixel for $ty {
            const PIXEL_TYPE: PixelType = PixelType::$tag;
            type Accumulator = i64;

            #[inline]
            fn to_accumulator(self) -> i64 {
                self as i64
            }

            #[inline]
            fn weight_to_accumulator(weight: f64) -> i64 {
                weight.trunc() as i64
            }
        }
    };
}

macro_rules! impl_float_pixel {
    ($ty:ty, $tag:ident) => {
        impl Pixel for $ty {
            const PIXEL_TYPE: PixelType = PixelType::$tag;
            type Accumulator = f64;

            #[inline]
            fn to_accumulator(self) -> f64 {
                self as f64
            }

            #[inline]
            fn weight_to_accumulator(weight: f64) -> f64 {
                weight
            }
        }
    };
}

impl_integer_pixel!(u8, U8);
impl_integer_pixel!(i16, I16);
impl_integer_pixel!(u16, U16);
impl_integer_pixel!(i32, I32);
impl_integer_pixel!(u32, U32);
impl_float_pixel!(f32, F32);
impl_float_pixel!(f64, F64);
