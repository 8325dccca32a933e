use crate::error::{Result, TomeyError};
use crate::extraction::scanner::{encode_text, find_offset};
use crate::extraction::tags::FileTagSettings;
use crate::observer::ParseObserver;
use crate::types::{FieldOverrides, ImageOffsets, ScannedHeader};

/// Resolves where the volumetric frames and the fundus directory start
///
/// Neither offset is declared in the dump. Both are found by searching for
/// the filename tokens scanned from the header:
///
/// - volumetric: first token + two null bytes; the frames start at
///   `match_end + volume_offset - 1`
/// - fundus: escape byte + second token, searched from the volumetric start;
///   the directory starts at `match_end + fundus_first_header_offset`
pub struct ImageLocator<'a> {
    settings: &'a FileTagSettings,
    overrides: &'a FieldOverrides,
}

impl<'a> ImageLocator<'a> {
    pub fn new(settings: &'a FileTagSettings, overrides: &'a FieldOverrides) -> Self {
        Self {
            settings,
            overrides,
        }
    }

    /// Resolves both region offsets, honouring offset overrides
    ///
    /// # Errors
    ///
    /// Returns `MarkerNotFound` if either marker is absent
    pub fn locate(
        &self,
        bytes: &[u8],
        header: &ScannedHeader,
        observer: &dyn ParseObserver,
    ) -> Result<ImageOffsets> {
        let volume = match self.overrides.volume_offset {
            Some(offset) => offset,
            None => self.volume_start(bytes, &header.volume_file_name)?,
        };
        observer.offset_resolved("volume", volume);

        let fundus = match self.overrides.fundus_offset {
            Some(offset) => offset,
            None => self.fundus_start(bytes, &header.fundus_file_name, volume)?,
        };
        observer.offset_resolved("fundus", fundus);

        Ok(ImageOffsets { volume, fundus })
    }

    /// Offset of the first volumetric frame
    pub fn volume_start(&self, bytes: &[u8], file_name: &str) -> Result<usize> {
        let marker = self.settings.volume_marker(&encode_text(file_name));
        let end = find_offset(&marker, bytes, 0).ok_or_else(|| TomeyError::MarkerNotFound {
            marker: format!("volume marker '{}'", file_name),
        })?;
        Ok((end + self.settings.volume_offset).saturating_sub(1))
    }

    /// Offset of the first fundus header record, searching from `from`
    pub fn fundus_start(&self, bytes: &[u8], file_name: &str, from: usize) -> Result<usize> {
        let marker = self.settings.fundus_marker(&encode_text(file_name));
        let end = find_offset(&marker, bytes, from).ok_or_else(|| TomeyError::MarkerNotFound {
            marker: format!("fundus marker '{}'", file_name),
        })?;
        Ok(end + self.settings.fundus_first_header_offset)
    }
}
