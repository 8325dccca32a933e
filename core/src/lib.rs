//! Decoder for Tomey OCT binary dump files
//!
//! A dump holds a text tag block, a run of volumetric frames with 7-bit
//! packed samples, and a directory of 8-bit fundus images. [`TomeyFile`]
//! parses the metadata once and decodes rasters lazily; [`export`] writes
//! them to image files and a JSON record.

pub mod api;
pub mod cli;
pub mod decode;
pub mod error;
pub mod export;
pub mod extraction;
pub mod observer;
pub mod types;

#[cfg(test)]
mod testutil;

pub use api::{TomeyExtractor, TomeyFile};
pub use cli::report::{BatchSummary, TextReport};
pub use decode::{FundusDecoder, FundusHeader, FundusHeaderScanner, VolumetricDecoder};
pub use error::{Result, TomeyError};
pub use export::{BatchReport, ExportConfig, Exporter, FileReport};
pub use extraction::{FileTagSettings, HeaderParser, ImageLocator, PatientTags};
pub use observer::{LogObserver, NoopObserver, ParseObserver};
pub use types::*;
