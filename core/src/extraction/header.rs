use crate::error::{Result, TomeyError};
use crate::extraction::scanner::{encode_text, find_tag};
use crate::extraction::tags::FileTagSettings;
use crate::observer::ParseObserver;
use crate::types::{FieldOverrides, Patient, ScannedHeader};
use std::str::FromStr;

/// Converts a bit depth to the number of bytes holding one sample
///
/// Non-finite or non-positive depths yield 0, which the parser rejects.
pub fn bytes_per_pixel(bits_per_pixel: f64) -> u32 {
    (bits_per_pixel / 8.0).ceil() as u32
}

/// Scans the tagged header of a dump
///
/// Every field is either taken from [`FieldOverrides`] or read with
/// [`find_tag`] from the start of the buffer. The first field that cannot be
/// scanned or parsed aborts the whole parse.
///
/// # Example
///
/// ```
/// use tomey_core::{FieldOverrides, FileTagSettings, HeaderParser, NoopObserver};
///
/// let settings = FileTagSettings::default();
/// let overrides = FieldOverrides::default();
/// let parser = HeaderParser::new(&settings, &overrides);
///
/// let err = parser.parse(b"HEIGHT:10\r\n", &NoopObserver).unwrap_err();
/// assert!(err.to_string().contains("WIDTH:"));
/// ```
pub struct HeaderParser<'a> {
    settings: &'a FileTagSettings,
    overrides: &'a FieldOverrides,
}

impl<'a> HeaderParser<'a> {
    pub fn new(settings: &'a FileTagSettings, overrides: &'a FieldOverrides) -> Self {
        Self {
            settings,
            overrides,
        }
    }

    /// Parses all header fields
    ///
    /// # Errors
    ///
    /// - `TagNotFound` / `IncompleteTag` if a required tag cannot be scanned
    /// - `MalformedValue` if a numeric tag does not parse
    /// - `InvalidRecord` if width, height or bytes per pixel is not positive
    pub fn parse(&self, bytes: &[u8], observer: &dyn ParseObserver) -> Result<ScannedHeader> {
        let tags = self.settings;
        let overrides = self.overrides;

        let width = self.number_or("width", overrides.width, &tags.width, bytes, observer)?;
        let height = self.number_or("height", overrides.height, &tags.height, bytes, observer)?;
        let frame_count = self.number_or(
            "frame count",
            overrides.frame_count,
            &tags.frame_count,
            bytes,
            observer,
        )?;
        let bytes_per_pixel = match overrides.bytes_per_pixel {
            Some(value) => value,
            None => {
                let bits: f64 =
                    self.scan_number("bits per pixel", &tags.bits_per_pixel, bytes, observer)?;
                bytes_per_pixel(bits)
            }
        };

        if width == 0 || height == 0 || bytes_per_pixel == 0 {
            return Err(TomeyError::InvalidRecord(format!(
                "resolution {}x{} with {} bytes per pixel",
                width, height, bytes_per_pixel
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(bytes_per_pixel as usize))
            .ok_or_else(|| {
                TomeyError::InvalidRecord(format!(
                    "frame size {}x{}x{} overflows",
                    width, height, bytes_per_pixel
                ))
            })?;

        let x_mm_per_pixel = match overrides.x_mm_per_pixel {
            Some(value) => value,
            None => {
                let size: f64 = self.scan_number("x size", &tags.x_size_in_mm, bytes, observer)?;
                size / width as f64
            }
        };
        // The device stores the B-scan rotated by 90°, so the vertical extent
        // is divided by the horizontal resolution as well
        let y_mm_per_pixel = match overrides.y_mm_per_pixel {
            Some(value) => value,
            None => {
                let size: f64 = self.scan_number("y size", &tags.y_size_in_mm, bytes, observer)?;
                size / width as f64
            }
        };
        let z_mm_per_pixel = self.number_or(
            "z mm per pixel",
            overrides.z_mm_per_pixel,
            &tags.z_mm_per_pixel,
            bytes,
            observer,
        )?;

        let examination_date =
            self.scan_text("examination date", &tags.examination_date, bytes, observer)?;
        let examination_time =
            self.scan_text("examination time", &tags.examination_time, bytes, observer)?;

        let patient = Patient {
            id: self.scan_text("patient id", &tags.patient.id, bytes, observer)?,
            first_name: self.scan_text("first name", &tags.patient.first_name, bytes, observer)?,
            last_name: self.scan_text("last name", &tags.patient.last_name, bytes, observer)?,
            birthday: self.scan_text("birthday", &tags.patient.birthday, bytes, observer)?,
            eye: self.scan_text("eye", &tags.patient.eye, bytes, observer)?,
            commentary: self.scan_text("commentary", &tags.patient.commentary, bytes, observer)?,
        };

        let volume_file_name =
            self.scan_text("volume file name", &tags.volume_file_name, bytes, observer)?;
        let fundus_file_name =
            self.scan_text("fundus file name", &tags.fundus_file_name, bytes, observer)?;

        Ok(ScannedHeader {
            width,
            height,
            frame_count,
            bytes_per_pixel,
            x_mm_per_pixel,
            y_mm_per_pixel,
            z_mm_per_pixel,
            examination_date,
            examination_time,
            patient,
            volume_file_name,
            fundus_file_name,
        })
    }

    fn scan_text(
        &self,
        field: &str,
        prefix: &str,
        bytes: &[u8],
        observer: &dyn ParseObserver,
    ) -> Result<String> {
        let tag = find_tag(
            &encode_text(prefix),
            self.settings.line_break_bytes(),
            bytes,
            0,
        )?;
        observer.field_parsed(field, &tag.text);
        Ok(tag.text)
    }

    fn scan_number<T: FromStr>(
        &self,
        field: &str,
        prefix: &str,
        bytes: &[u8],
        observer: &dyn ParseObserver,
    ) -> Result<T> {
        let text = self.scan_text(field, prefix, bytes, observer)?;
        text.parse().map_err(|_| TomeyError::MalformedValue {
            field: field.to_string(),
            value: text,
        })
    }

    fn number_or<T: FromStr + ToString>(
        &self,
        field: &str,
        value: Option<T>,
        prefix: &str,
        bytes: &[u8],
        observer: &dyn ParseObserver,
    ) -> Result<T> {
        match value {
            Some(value) => {
                observer.field_parsed(field, &value.to_string());
                Ok(value)
            }
            None => self.scan_number(field, prefix, bytes, observer),
        }
    }
}
