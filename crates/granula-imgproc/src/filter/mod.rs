//! Filter operations
//!
//! This module provides windowed kernel operations over bordered images.

/// Filter kernels
pub mod kernels;

/// Sliding kernel window
pub mod window;

/// Convolution operations
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;
