//! Raster reconstruction from the two image regions of a dump

pub mod fundus;
pub mod volume;

pub use fundus::{window, FundusDecoder, FundusHeader, FundusHeaderScanner, FundusImages};
pub use volume::{unpack_frame, unpack_sample, VolumeFrames, VolumetricDecoder};
