#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use granula_image as image;

#[doc(inline)]
pub use granula_imgproc as imgproc;
