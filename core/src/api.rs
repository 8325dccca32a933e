use crate::decode::{
    FundusDecoder, FundusHeader, FundusHeaderScanner, FundusImages, VolumeFrames,
    VolumetricDecoder,
};
use crate::error::Result;
use crate::extraction::{FileTagSettings, HeaderParser, ImageLocator};
use crate::observer::ParseObserver;
use crate::types::{FieldOverrides, MetadataRecord};
use std::path::Path;

/// Main extractor for Tomey dump metadata
///
/// Runs the header scan and the offset search; either both succeed and a
/// complete [`MetadataRecord`] is returned, or the first failure is.
///
/// # Example
///
/// ```
/// use tomey_core::{FieldOverrides, FileTagSettings, NoopObserver, TomeyExtractor, TomeyError};
///
/// let settings = FileTagSettings::default();
/// let overrides = FieldOverrides::default();
/// let extractor = TomeyExtractor::new(&settings, &overrides);
///
/// let err = extractor.extract(b"not a dump", &NoopObserver).unwrap_err();
/// assert!(matches!(err, TomeyError::TagNotFound { .. }));
/// ```
pub struct TomeyExtractor<'a> {
    settings: &'a FileTagSettings,
    overrides: &'a FieldOverrides,
}

impl<'a> TomeyExtractor<'a> {
    pub fn new(settings: &'a FileTagSettings, overrides: &'a FieldOverrides) -> Self {
        Self {
            settings,
            overrides,
        }
    }

    /// Extracts the metadata record of a loaded dump
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required tag is missing, unterminated or malformed
    /// - A resolution-derived field is not positive
    /// - The volumetric or fundus marker is missing
    pub fn extract(&self, bytes: &[u8], observer: &dyn ParseObserver) -> Result<MetadataRecord> {
        let header = HeaderParser::new(self.settings, self.overrides).parse(bytes, observer)?;
        let offsets =
            ImageLocator::new(self.settings, self.overrides).locate(bytes, &header, observer)?;
        Ok(MetadataRecord::new(header, offsets))
    }
}

/// A dump loaded into memory together with its parsed metadata
///
/// Rasters are decoded lazily from the owned buffer.
pub struct TomeyFile<'s> {
    bytes: Vec<u8>,
    metadata: MetadataRecord,
    settings: &'s FileTagSettings,
}

impl<'s> TomeyFile<'s> {
    /// Reads and parses a dump file
    pub fn open(
        path: &Path,
        settings: &'s FileTagSettings,
        overrides: &FieldOverrides,
        observer: &dyn ParseObserver,
    ) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, settings, overrides, observer)
    }

    /// Parses a dump already held in memory
    pub fn from_bytes(
        bytes: Vec<u8>,
        settings: &'s FileTagSettings,
        overrides: &FieldOverrides,
        observer: &dyn ParseObserver,
    ) -> Result<Self> {
        let metadata = TomeyExtractor::new(settings, overrides).extract(&bytes, observer)?;
        Ok(Self {
            bytes,
            metadata,
            settings,
        })
    }

    pub fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    pub fn into_metadata(self) -> MetadataRecord {
        self.metadata
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Volumetric frames in file order
    pub fn volume_frames<'a>(&'a self, observer: &'a dyn ParseObserver) -> VolumeFrames<'a> {
        VolumetricDecoder::new(&self.metadata).frames(&self.bytes, observer)
    }

    /// Reads the fundus header directory
    pub fn fundus_headers(&self, observer: &dyn ParseObserver) -> Result<Vec<FundusHeader>> {
        FundusHeaderScanner::new(self.settings).scan(
            &self.bytes,
            self.metadata.fundus_offset,
            observer,
        )
    }

    /// Fundus images for a directory read with [`TomeyFile::fundus_headers`]
    pub fn fundus_images<'a>(
        &'a self,
        headers: &'a [FundusHeader],
        observer: &'a dyn ParseObserver,
    ) -> FundusImages<'a> {
        FundusDecoder::new(self.settings, headers, self.metadata.fundus_offset)
            .images(&self.bytes, observer)
    }
}
