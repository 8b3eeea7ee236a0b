//! Binary morphology operations.

/// Structuring elements.
pub mod kernels;
pub use kernels::StructuringElement;

/// Dilation, erosion, opening, closing and border extraction.
mod ops;
pub use ops::*;
