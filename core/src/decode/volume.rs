//! Volumetric frame reconstruction
//!
//! Frames lie back to back from the volumetric offset, each
//! `width * height * bytes_per_pixel` bytes long. A sample is spread over
//! `bytes_per_pixel` consecutive bytes carrying 7 bits each, least
//! significant group first; the eighth bit of every byte is reserved by the
//! device and is still OR-ed in unmasked.

use crate::observer::ParseObserver;
use crate::types::{MetadataRecord, VolumeFrame};

/// Bits carried by each byte of a packed sample
pub const BITS_PER_PACKED_BYTE: u32 = 7;

/// Combines the bytes of one packed sample
///
/// `byte[y] << (7 * y)` for every byte, computed in 32 bits and truncated
/// to 16.
pub fn unpack_sample(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .enumerate()
        .fold(0u32, |acc, (y, &b)| {
            // Shift amount is taken modulo 32, so byte 5 lands at bit 3
            acc | (b as u32).wrapping_shl(BITS_PER_PACKED_BYTE * y as u32)
        }) as u16
}

/// Unpacks `pixels` samples of `bytes_per_pixel` bytes each
///
/// If `staging` runs out in the middle of a sample, that sample keeps the
/// bytes read so far and every later sample is zero.
pub fn unpack_frame(staging: &[u8], pixels: usize, bytes_per_pixel: usize) -> Vec<u16> {
    let mut samples = vec![0u16; pixels];
    if bytes_per_pixel == 0 {
        return samples;
    }

    for (sample, chunk) in samples.iter_mut().zip(staging.chunks(bytes_per_pixel)) {
        *sample = unpack_sample(chunk);
    }

    samples
}

/// Decodes the volumetric frames described by a metadata record
pub struct VolumetricDecoder<'a> {
    record: &'a MetadataRecord,
}

impl<'a> VolumetricDecoder<'a> {
    pub fn new(record: &'a MetadataRecord) -> Self {
        Self { record }
    }

    /// Lazily decodes frames in order
    ///
    /// Yields at most `frame_count` frames and stops early, without error,
    /// once less than one full frame remains in `bytes`.
    pub fn frames<'b>(
        &self,
        bytes: &'b [u8],
        observer: &'b dyn ParseObserver,
    ) -> VolumeFrames<'b>
    where
        'a: 'b,
    {
        VolumeFrames {
            bytes,
            record: self.record,
            offset: self.record.volume_offset,
            index: 0,
            observer,
        }
    }
}

/// Iterator over the volumetric frames of one dump
pub struct VolumeFrames<'b> {
    bytes: &'b [u8],
    record: &'b MetadataRecord,
    offset: usize,
    index: usize,
    observer: &'b dyn ParseObserver,
}

impl Iterator for VolumeFrames<'_> {
    type Item = VolumeFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.record;
        if self.index >= record.frame_count as usize {
            return None;
        }

        let frame_size = record.frame_byte_size;
        let end = match self.offset.checked_add(frame_size) {
            Some(end) if end <= self.bytes.len() => end,
            _ => {
                self.observer.decode_stopped(&format!(
                    "volume frame {} of {} needs {} bytes at offset {}, buffer holds {}",
                    self.index + 1,
                    record.frame_count,
                    frame_size,
                    self.offset,
                    self.bytes.len()
                ));
                // Fuse: later calls must not re-report
                self.index = record.frame_count as usize;
                return None;
            }
        };

        let staging = &self.bytes[self.offset..end];
        let samples = unpack_frame(
            staging,
            record.pixels_per_frame(),
            record.bytes_per_pixel as usize,
        );
        let frame = VolumeFrame::new(self.index, record.width, record.height, samples);

        self.observer.frame_decoded(self.index, record.frame_count);
        self.offset = end;
        self.index += 1;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::recording::RecordingObserver;
    use crate::observer::NoopObserver;
    use crate::testutil::{pack_sample, record_with};

    #[test]
    fn test_unpack_sample_uses_seven_bit_groups() {
        assert_eq!(unpack_sample(&[0x05]), 5);
        assert_eq!(unpack_sample(&[0x7F, 0x01]), 0x7F | (1 << 7));
        assert_eq!(unpack_sample(&[0x00, 0x02]), 0x100);
        // Reserved high bit overlaps the next group
        assert_eq!(unpack_sample(&[0x80, 0x01]), 0x80);
        assert_eq!(unpack_sample(&[0xFF, 0x00]), 0xFF);
    }

    #[test]
    fn test_unpack_sample_truncates_to_16_bits() {
        assert_eq!(unpack_sample(&[0x00, 0x00, 0x07]), (7u32 << 14) as u16);
        assert_eq!(unpack_sample(&[0x00, 0x00, 0x10]), 0);
    }

    #[test]
    fn test_unpack_sample_wraps_wide_shifts() {
        // 7 * 5 = 35 wraps to a shift of 3
        assert_eq!(unpack_sample(&[0, 0, 0, 0, 0, 0x01]), 8);
        assert_eq!(unpack_sample(&[0, 0, 0, 0, 0, 0x01, 0x01]), 8 | (1 << 10));
    }

    #[test]
    fn test_unpack_frame_zero_fills_after_exhaustion() {
        let samples = unpack_frame(&[1, 0, 2, 0, 3], 4, 2);
        assert_eq!(samples, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_frames_are_row_major_and_complete() {
        let values: Vec<u16> = (0..12).map(|v| v * 300).collect();
        let mut payload = Vec::new();
        for v in &values {
            payload.extend(pack_sample(*v, 2));
        }
        let record = record_with(4, 3, 2, 1, 0);

        let frames: Vec<_> = VolumetricDecoder::new(&record)
            .frames(&payload, &NoopObserver)
            .collect();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].index(), 0);
        assert_eq!(frames[0].samples().len(), 4 * 3);
        assert_eq!(frames[0].samples(), values.as_slice());
    }

    #[test]
    fn test_frames_start_at_volume_offset() {
        let mut bytes = vec![0xAA; 5];
        bytes.extend([1, 2, 3, 4, 5, 6, 7, 8]);
        let record = record_with(2, 2, 1, 2, 5);

        let frames: Vec<_> = VolumetricDecoder::new(&record)
            .frames(&bytes, &NoopObserver)
            .collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].samples(), &[1, 2, 3, 4]);
        assert_eq!(frames[1].samples(), &[5, 6, 7, 8]);
        assert_eq!(frames[1].index(), 1);
    }

    #[test]
    fn test_frame_ending_at_buffer_end_is_decoded() {
        let bytes = vec![9u8; 8];
        let record = record_with(2, 2, 1, 2, 0);
        let count = VolumetricDecoder::new(&record)
            .frames(&bytes, &NoopObserver)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_truncated_frame_stops_early() {
        let bytes = vec![1u8; 10];
        let record = record_with(2, 2, 1, 5, 0);
        let observer = RecordingObserver::default();

        let mut frames = VolumetricDecoder::new(&record).frames(&bytes, &observer);
        assert!(frames.next().is_some());
        assert!(frames.next().is_some());
        assert!(frames.next().is_none());
        assert!(frames.next().is_none());

        let events = observer.events();
        let stops: Vec<_> = events.iter().filter(|e| e.starts_with("stopped")).collect();
        assert_eq!(stops.len(), 1);
        assert!(stops[0].contains("volume frame 3 of 5"));
    }

    #[test]
    fn test_frame_count_limits_output() {
        let bytes = vec![1u8; 100];
        let record = record_with(2, 2, 1, 3, 0);
        let count = VolumetricDecoder::new(&record)
            .frames(&bytes, &NoopObserver)
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_offset_past_end_yields_nothing() {
        let bytes = vec![1u8; 4];
        let record = record_with(2, 2, 1, 3, 50);
        let count = VolumetricDecoder::new(&record)
            .frames(&bytes, &NoopObserver)
            .count();
        assert_eq!(count, 0);
    }
}
