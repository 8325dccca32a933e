//! Synthetic dump fixtures for unit tests

use crate::extraction::{encode_text, FileTagSettings};
use crate::types::{ImageOffsets, MetadataRecord, Patient, ScannedHeader};

pub const VOLUME_FILE_NAME: &str = "scan.vol";
pub const FUNDUS_FILE_NAME: &str = "scan.img";

/// Header matching the default [`DumpBuilder`] tags
pub fn sample_header() -> ScannedHeader {
    ScannedHeader {
        width: 512,
        height: 256,
        frame_count: 128,
        bytes_per_pixel: 2,
        x_mm_per_pixel: 16.0 / 512.0,
        y_mm_per_pixel: 16.0 / 512.0,
        z_mm_per_pixel: 0.0125,
        examination_date: "2019-03-14".to_string(),
        examination_time: "10:42:00".to_string(),
        patient: Patient {
            id: "P-001".to_string(),
            first_name: "Zoë".to_string(),
            last_name: "Muster".to_string(),
            birthday: "1970-01-01".to_string(),
            eye: "OD".to_string(),
            commentary: String::new(),
        },
        volume_file_name: VOLUME_FILE_NAME.to_string(),
        fundus_file_name: FUNDUS_FILE_NAME.to_string(),
    }
}

/// Record with the given geometry and volumetric offset
pub fn record_with(
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    frame_count: u32,
    volume_offset: usize,
) -> MetadataRecord {
    let header = ScannedHeader {
        width,
        height,
        frame_count,
        bytes_per_pixel,
        ..sample_header()
    };
    MetadataRecord::new(
        header,
        ImageOffsets {
            volume: volume_offset,
            fundus: 0,
        },
    )
}

/// Packs a sample into 7-bit groups, least significant first
pub fn pack_sample(value: u16, bytes_per_pixel: usize) -> Vec<u8> {
    (0..bytes_per_pixel)
        .map(|y| ((value as u32 >> (7 * y)) & 0x7F) as u8)
        .collect()
}

/// One fundus header record opening with the sentinel byte
pub fn fundus_record(settings: &FileTagSettings, width: i32, height: i32) -> Vec<u8> {
    let mut record = vec![0u8; settings.fundus_header_size];
    record[0] = settings.fundus_sentinel;
    let h = settings.fundus_height_position;
    let w = settings.fundus_width_position;
    record[h..h + 4].copy_from_slice(&height.to_le_bytes());
    record[w..w + 4].copy_from_slice(&width.to_le_bytes());
    record
}

/// A built dump with the offsets its layout implies
pub struct Dump {
    pub bytes: Vec<u8>,
    pub volume_offset: usize,
    pub fundus_offset: usize,
}

/// Assembles a dump: tag block, volumetric marker and frames, fundus marker,
/// directory and payloads
///
/// The first payload byte follows the directory directly, so fixtures must
/// not start their first fundus image with the sentinel byte.
pub struct DumpBuilder {
    settings: FileTagSettings,
    tags: Vec<(String, String)>,
    volume_marker: bool,
    fundus_marker: bool,
    volume_payload: Vec<u8>,
    fundus_images: Vec<(i32, i32, Vec<u8>)>,
}

impl DumpBuilder {
    pub fn new() -> Self {
        let settings = FileTagSettings::default();
        let t = &settings;
        let tags = [
            (&t.width, "4"),
            (&t.height, "3"),
            (&t.frame_count, "2"),
            (&t.bits_per_pixel, "12"),
            (&t.x_size_in_mm, "6.0"),
            (&t.y_size_in_mm, "3.0"),
            (&t.z_mm_per_pixel, "0.0125"),
            (&t.examination_date, "14.03.2019"),
            (&t.examination_time, "10:42"),
            (&t.patient.id, "P-001"),
            (&t.patient.first_name, "Zoë"),
            (&t.patient.last_name, "Müller"),
            (&t.patient.birthday, "01.01.1970"),
            (&t.patient.eye, "OD"),
            (&t.patient.commentary, "follow-up"),
            (&t.volume_file_name, VOLUME_FILE_NAME),
            (&t.fundus_file_name, FUNDUS_FILE_NAME),
        ]
        .iter()
        .map(|(prefix, value)| (prefix.to_string(), value.to_string()))
        .collect();

        Self {
            settings,
            tags,
            volume_marker: true,
            fundus_marker: true,
            volume_payload: Vec::new(),
            fundus_images: Vec::new(),
        }
    }

    /// Replaces the text of a tag
    pub fn raw_tag(mut self, prefix: &str, value: &str) -> Self {
        if let Some(tag) = self.tags.iter_mut().find(|(p, _)| p == prefix) {
            tag.1 = value.to_string();
        }
        self
    }

    pub fn omit_tag(mut self, prefix: &str) -> Self {
        self.tags.retain(|(p, _)| p != prefix);
        self
    }

    pub fn width(self, width: u32) -> Self {
        let prefix = self.settings.width.clone();
        self.raw_tag(&prefix, &width.to_string())
    }

    pub fn height(self, height: u32) -> Self {
        let prefix = self.settings.height.clone();
        self.raw_tag(&prefix, &height.to_string())
    }

    pub fn frames(self, frames: u32) -> Self {
        let prefix = self.settings.frame_count.clone();
        self.raw_tag(&prefix, &frames.to_string())
    }

    pub fn bits(self, bits: u32) -> Self {
        let prefix = self.settings.bits_per_pixel.clone();
        self.raw_tag(&prefix, &bits.to_string())
    }

    pub fn x_size_mm(self, size: &str) -> Self {
        let prefix = self.settings.x_size_in_mm.clone();
        self.raw_tag(&prefix, size)
    }

    pub fn y_size_mm(self, size: &str) -> Self {
        let prefix = self.settings.y_size_in_mm.clone();
        self.raw_tag(&prefix, size)
    }

    pub fn without_volume_marker(mut self) -> Self {
        self.volume_marker = false;
        self
    }

    pub fn without_fundus_marker(mut self) -> Self {
        self.fundus_marker = false;
        self
    }

    pub fn volume_payload(mut self, payload: Vec<u8>) -> Self {
        self.volume_payload = payload;
        self
    }

    pub fn fundus_image(mut self, width: i32, height: i32, pixels: Vec<u8>) -> Self {
        self.fundus_images.push((width, height, pixels));
        self
    }

    pub fn build(self) -> Dump {
        let s = &self.settings;
        let mut bytes = Vec::new();

        for (prefix, value) in &self.tags {
            bytes.extend(encode_text(prefix));
            bytes.extend(encode_text(value));
            bytes.extend_from_slice(s.line_break_bytes());
        }
        bytes.extend_from_slice(&[0x01, 0x02, 0x03]);

        let mut volume_offset = 0;
        if self.volume_marker {
            bytes.extend(s.volume_marker(VOLUME_FILE_NAME.as_bytes()));
            volume_offset = bytes.len() - 1 + s.volume_offset - 1;
            bytes.resize(bytes.len().max(volume_offset), 0x01);
        }
        bytes.extend(&self.volume_payload);

        let mut fundus_offset = 0;
        if self.fundus_marker {
            bytes.extend(s.fundus_marker(FUNDUS_FILE_NAME.as_bytes()));
            fundus_offset = bytes.len() - 1 + s.fundus_first_header_offset;
            bytes.resize(bytes.len().max(fundus_offset), 0x01);
        }

        for (width, height, _) in &self.fundus_images {
            bytes.extend(fundus_record(s, *width, *height));
        }
        for (_, _, pixels) in &self.fundus_images {
            bytes.extend(std::iter::repeat(0u8).take(s.fundus_content_offset));
            bytes.extend(pixels);
        }

        Dump {
            bytes,
            volume_offset,
            fundus_offset,
        }
    }
}

impl Default for DumpBuilder {
    fn default() -> Self {
        Self::new()
    }
}
