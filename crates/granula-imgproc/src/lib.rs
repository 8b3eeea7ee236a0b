#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// bordered rasters and border policies.
pub mod border;

/// pixel-type dispatch over runtime-typed rasters.
pub mod dispatch;

/// euclidean distance transform of binary images.
pub mod distance_transform;

/// image filtering module.
pub mod filter;

/// seeded scanline fill and hole filling.
pub mod flood_fill;

/// local maxima detection.
pub mod maxima;

/// binary morphology module.
pub mod morphology;

/// connected particle extraction and statistics.
pub mod particles;

/// range thresholding.
pub mod threshold;
