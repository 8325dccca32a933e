//! Core type definitions for Tomey dump contents
//!
//! - [`MetadataRecord`]: Complete metadata of one dump, with [`Patient`]
//! - [`ScannedHeader`] and [`ImageOffsets`]: The two stages a record is built from
//! - [`Raster`]: Decoded volumetric frames and fundus images
//! - [`ExportMode`]: Output classes selected for a run
//! - [`FieldOverrides`]: Literal values replacing scanned fields

mod mode;
mod overrides;
mod raster;
mod record;

pub use mode::ExportMode;
pub use overrides::{FieldOverrides, DERIVE_FROM_FILE};
pub use raster::{FundusImage, Raster, VolumeFrame};
pub use record::{ImageOffsets, MetadataRecord, Patient, ScannedHeader};
