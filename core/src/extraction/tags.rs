use crate::error::{Result, TomeyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Control bytes used by the device firmware
pub const NULL_CHAR: u8 = 0x00;
pub const DLE_CHAR: u8 = 0x10;
pub const LINE_BREAK: &str = "\r\n";

/// Byte that opens every fundus header record after the first
pub const FUNDUS_HEADER_SENTINEL: u8 = 6;

/// Tag prefixes of the patient block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientTags {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday: String,
    pub eye: String,
    pub commentary: String,
}

impl Default for PatientTags {
    fn default() -> Self {
        Self {
            id: "PATIENT_ID:".to_string(),
            first_name: "FIRST_NAME:".to_string(),
            last_name: "LAST_NAME:".to_string(),
            birthday: "BIRTHDAY:".to_string(),
            eye: "EYE:".to_string(),
            commentary: "COMMENT:".to_string(),
        }
    }
}

/// Tag prefixes, markers and structural offsets of one firmware's dump layout
///
/// Every value can be replaced from a JSON settings file; keys that are
/// missing from the file keep their default.
///
/// # Example
///
/// ```
/// use tomey_core::FileTagSettings;
///
/// let settings = FileTagSettings::default();
/// assert_eq!(settings.line_break, "\r\n");
/// assert_eq!(settings.fundus_sentinel, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileTagSettings {
    pub width: String,
    pub height: String,
    pub frame_count: String,
    pub bits_per_pixel: String,
    pub x_size_in_mm: String,
    pub y_size_in_mm: String,
    pub z_mm_per_pixel: String,
    pub examination_date: String,
    pub examination_time: String,
    pub volume_file_name: String,
    pub fundus_file_name: String,
    pub patient: PatientTags,

    /// Terminator closing every tag value
    pub line_break: String,
    pub null_char: u8,
    /// Byte preceding the fundus filename token
    ///
    /// The DLE default is unconfirmed for real firmware; device profiles
    /// should set it explicitly.
    pub escape_marker: u8,

    /// Distance from the end of the volumetric marker to the first frame, plus one
    pub volume_offset: usize,
    /// Distance from the end of the fundus marker to the first header record
    pub fundus_first_header_offset: usize,
    pub fundus_header_size: usize,
    pub fundus_height_position: usize,
    pub fundus_width_position: usize,
    /// Padding in front of every fundus payload
    pub fundus_content_offset: usize,
    pub fundus_sentinel: u8,

    /// Extension of written raster files
    pub image_extension: String,
}

impl Default for FileTagSettings {
    fn default() -> Self {
        Self {
            width: "WIDTH:".to_string(),
            height: "HEIGHT:".to_string(),
            frame_count: "FRAMES:".to_string(),
            bits_per_pixel: "BITS_PER_PIXEL:".to_string(),
            x_size_in_mm: "X_SIZE_MM:".to_string(),
            y_size_in_mm: "Y_SIZE_MM:".to_string(),
            z_mm_per_pixel: "Z_MM_PER_PIXEL:".to_string(),
            examination_date: "EXAM_DATE:".to_string(),
            examination_time: "EXAM_TIME:".to_string(),
            volume_file_name: "FILE_NAME:".to_string(),
            fundus_file_name: "FILE_NAME_2:".to_string(),
            patient: PatientTags::default(),
            line_break: LINE_BREAK.to_string(),
            null_char: NULL_CHAR,
            escape_marker: DLE_CHAR,
            volume_offset: 2,
            fundus_first_header_offset: 1,
            fundus_header_size: 40,
            fundus_height_position: 4,
            fundus_width_position: 8,
            fundus_content_offset: 0,
            fundus_sentinel: FUNDUS_HEADER_SENTINEL,
            image_extension: "png".to_string(),
        }
    }
}

impl FileTagSettings {
    /// Loads settings from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `TomeyError::Settings` if the file cannot be read or is not
    /// valid settings JSON
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TomeyError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
            .map_err(|e| TomeyError::Settings(format!("{}: {}", path.display(), e)))
    }

    /// Parses settings from JSON text
    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn line_break_bytes(&self) -> &[u8] {
        self.line_break.as_bytes()
    }

    /// Marker preceding the first volumetric frame: the token followed by two null bytes
    pub fn volume_marker(&self, file_name: &[u8]) -> Vec<u8> {
        let mut marker = Vec::with_capacity(file_name.len() + 2);
        marker.extend_from_slice(file_name);
        marker.push(self.null_char);
        marker.push(self.null_char);
        marker
    }

    /// Marker preceding the fundus header directory: the escape byte followed by the token
    pub fn fundus_marker(&self, file_name: &[u8]) -> Vec<u8> {
        let mut marker = Vec::with_capacity(file_name.len() + 1);
        marker.push(self.escape_marker);
        marker.extend_from_slice(file_name);
        marker
    }
}
