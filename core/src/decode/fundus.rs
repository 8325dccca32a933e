//! Fundus directory scanning and image reconstruction
//!
//! The directory is a run of fixed-size header records without a count.
//! Record `n + 1` exists only if its first byte is the sentinel. Image
//! payloads follow the directory in the same order, each behind a fixed
//! padding, one byte per pixel.

use crate::error::{Result, TomeyError};
use crate::extraction::FileTagSettings;
use crate::observer::ParseObserver;
use crate::types::FundusImage;

/// Dimensions of one fundus image as declared in its header record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundusHeader {
    pub width: u32,
    pub height: u32,
}

impl FundusHeader {
    /// Payload size in bytes, one byte per pixel
    pub fn byte_size(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Reads a little-endian i32, failing instead of reading past the end
fn read_i32_le(bytes: &[u8], at: usize, what: &str) -> Result<i32> {
    let end = at
        .checked_add(4)
        .ok_or_else(|| TomeyError::truncated(what, 4, 0))?;
    let field = bytes
        .get(at..end)
        .ok_or_else(|| TomeyError::truncated(what, 4, bytes.len().saturating_sub(at)))?;
    Ok(i32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

fn dimension(value: i32, field: String) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(TomeyError::MalformedValue {
            field,
            value: value.to_string(),
        }),
    }
}

/// Reads the sentinel-terminated directory of fundus headers
pub struct FundusHeaderScanner<'a> {
    settings: &'a FileTagSettings,
}

impl<'a> FundusHeaderScanner<'a> {
    pub fn new(settings: &'a FileTagSettings) -> Self {
        Self { settings }
    }

    /// Scans the directory starting at `fundus_offset`
    ///
    /// The first record is always read. The scan continues while the byte
    /// at the start of the next record equals the sentinel; a probe beyond
    /// the buffer ends the directory.
    ///
    /// # Errors
    ///
    /// - `TruncatedBuffer` if a width or height field lies past the buffer
    /// - `MalformedValue` if a width or height is not positive
    pub fn scan(
        &self,
        bytes: &[u8],
        fundus_offset: usize,
        observer: &dyn ParseObserver,
    ) -> Result<Vec<FundusHeader>> {
        let settings = self.settings;
        let record_size = settings.fundus_header_size;
        if record_size == 0 {
            return Err(TomeyError::Settings(
                "fundus header size must be positive".to_string(),
            ));
        }

        let mut headers = Vec::new();
        let mut record_start = fundus_offset;

        loop {
            let n = headers.len();
            let height = read_i32_le(
                bytes,
                record_start.saturating_add(settings.fundus_height_position),
                &format!("fundus header {} height", n),
            )?;
            let width = read_i32_le(
                bytes,
                record_start.saturating_add(settings.fundus_width_position),
                &format!("fundus header {} width", n),
            )?;

            let header = FundusHeader {
                width: dimension(width, format!("fundus header {} width", n))?,
                height: dimension(height, format!("fundus header {} height", n))?,
            };
            observer.fundus_header_read(n, header.width, header.height);
            headers.push(header);

            record_start = record_start.saturating_add(record_size);
            match bytes.get(record_start) {
                Some(&b) if b == settings.fundus_sentinel => continue,
                Some(_) => break,
                None => {
                    observer.decode_stopped(&format!(
                        "fundus directory probe at {} is past the end ({} bytes)",
                        record_start,
                        bytes.len()
                    ));
                    break;
                }
            }
        }

        Ok(headers)
    }
}

/// Replaces every byte with the sign bit set by the image maximum
///
/// The maximum is taken over the bytes read as signed values, so a byte
/// with the sign bit set can only be the maximum if every byte has it.
/// Returns the maximum used, or `None` for an empty image.
///
/// # Example
///
/// ```
/// use tomey_core::decode::window;
///
/// let mut pixels = [0xFF, 0x64, 0x32];
/// assert_eq!(window(&mut pixels), Some(100));
/// assert_eq!(pixels, [100, 100, 50]);
/// ```
pub fn window(pixels: &mut [u8]) -> Option<u8> {
    let max = pixels.iter().map(|&b| b as i8).max()? as u8;
    for pixel in pixels.iter_mut().filter(|p| **p & 0x80 != 0) {
        *pixel = max;
    }
    Some(max)
}

/// Decodes the fundus images listed in a directory
pub struct FundusDecoder<'a> {
    settings: &'a FileTagSettings,
    headers: &'a [FundusHeader],
    fundus_offset: usize,
}

impl<'a> FundusDecoder<'a> {
    pub fn new(
        settings: &'a FileTagSettings,
        headers: &'a [FundusHeader],
        fundus_offset: usize,
    ) -> Self {
        Self {
            settings,
            headers,
            fundus_offset,
        }
    }

    /// Offset where the first payload's padding begins
    pub fn payload_base(&self) -> usize {
        self.fundus_offset
            .saturating_add(self.settings.fundus_header_size * self.headers.len())
    }

    /// Lazily decodes images in directory order
    ///
    /// A payload that does not fit in `bytes` yields one
    /// `TruncatedBuffer` error, after which the iterator is exhausted.
    pub fn images<'b>(
        &self,
        bytes: &'b [u8],
        observer: &'b dyn ParseObserver,
    ) -> FundusImages<'b>
    where
        'a: 'b,
    {
        FundusImages {
            bytes,
            headers: self.headers,
            content_offset: self.settings.fundus_content_offset,
            cursor: self.payload_base(),
            index: 0,
            observer,
        }
    }
}

/// Iterator over the fundus images of one dump
pub struct FundusImages<'b> {
    bytes: &'b [u8],
    headers: &'b [FundusHeader],
    content_offset: usize,
    cursor: usize,
    index: usize,
    observer: &'b dyn ParseObserver,
}

impl Iterator for FundusImages<'_> {
    type Item = Result<FundusImage>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = *self.headers.get(self.index)?;
        let start = self.cursor.saturating_add(self.content_offset);
        let size = header.byte_size();

        let pixels = match start.checked_add(size).and_then(|end| self.bytes.get(start..end)) {
            Some(pixels) => pixels,
            None => {
                let what = format!("fundus image {}", self.index);
                self.index = self.headers.len();
                return Some(Err(TomeyError::truncated(
                    what,
                    size,
                    self.bytes.len().saturating_sub(start),
                )));
            }
        };

        let mut pixels = pixels.to_vec();
        let max = window(&mut pixels).unwrap_or(u8::MAX);
        self.observer.fundus_decoded(self.index, max);

        let image = FundusImage::new(self.index, header.width, header.height, pixels);
        self.cursor = start + size;
        self.index += 1;
        Some(Ok(image))
    }
}
