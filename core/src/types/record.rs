use serde::{Deserialize, Serialize};

/// Patient block of a dump
///
/// Values are kept exactly as scanned; no validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday: String,
    pub eye: String,
    pub commentary: String,
}

/// Header fields scanned from a dump before any region offset is known
///
/// Produced whole by the header parser or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedHeader {
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub bytes_per_pixel: u32,
    pub x_mm_per_pixel: f64,
    pub y_mm_per_pixel: f64,
    pub z_mm_per_pixel: f64,
    pub examination_date: String,
    pub examination_time: String,
    pub patient: Patient,
    /// Token marking the start of the volumetric frames
    pub volume_file_name: String,
    /// Token marking the start of the fundus directory
    pub fundus_file_name: String,
}

impl ScannedHeader {
    /// Byte size of one volumetric frame
    pub fn frame_byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel as usize
    }
}

/// Resolved start offsets of the two image regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOffsets {
    pub volume: usize,
    pub fundus: usize,
}

/// Complete metadata of one dump file
///
/// Serialized field names follow the established export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    #[serde(rename = "xResolution")]
    pub width: u32,

    #[serde(rename = "yResolution")]
    pub height: u32,

    /// Number of volumetric frames
    #[serde(rename = "imageCount")]
    pub frame_count: u32,

    pub bytes_per_pixel: u32,

    /// Horizontal scale in mm per pixel
    #[serde(rename = "xMMperPixel")]
    pub x_mm_per_pixel: f64,

    /// Vertical scale in mm per pixel, derived from the horizontal resolution
    #[serde(rename = "yMMperPixel")]
    pub y_mm_per_pixel: f64,

    /// Depth scale in mm per pixel
    #[serde(rename = "zMMperPixel")]
    pub z_mm_per_pixel: f64,

    pub examination_date: String,
    pub examination_time: String,
    pub patient: Patient,

    #[serde(rename = "fileName1")]
    pub volume_file_name: String,

    #[serde(rename = "fileName2")]
    pub fundus_file_name: String,

    #[serde(rename = "startOffset")]
    pub volume_offset: usize,

    #[serde(rename = "eyeImageStartOffset")]
    pub fundus_offset: usize,

    /// width * height * bytes_per_pixel
    #[serde(rename = "imageSize")]
    pub frame_byte_size: usize,
}

impl MetadataRecord {
    /// Combines a scanned header with its resolved region offsets
    pub fn new(header: ScannedHeader, offsets: ImageOffsets) -> Self {
        let frame_byte_size = header.frame_byte_size();
        Self {
            width: header.width,
            height: header.height,
            frame_count: header.frame_count,
            bytes_per_pixel: header.bytes_per_pixel,
            x_mm_per_pixel: header.x_mm_per_pixel,
            y_mm_per_pixel: header.y_mm_per_pixel,
            z_mm_per_pixel: header.z_mm_per_pixel,
            examination_date: header.examination_date,
            examination_time: header.examination_time,
            patient: header.patient,
            volume_file_name: header.volume_file_name,
            fundus_file_name: header.fundus_file_name,
            volume_offset: offsets.volume,
            fundus_offset: offsets.fundus,
            frame_byte_size,
        }
    }

    /// Number of samples in one volumetric frame
    pub fn pixels_per_frame(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
