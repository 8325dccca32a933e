//! Progress events emitted while a dump is parsed and decoded
//!
//! Parsing and decoding never write to a logger on their own. Callers pass
//! a [`ParseObserver`]; [`LogObserver`] forwards events to the `log` facade.

use crate::error::TomeyError;
use log::{debug, error, info};
use std::path::Path;

/// Receiver of parse and decode events
///
/// All methods default to doing nothing.
pub trait ParseObserver {
    /// A header field was scanned or taken from an override
    fn field_parsed(&self, _field: &str, _value: &str) {}

    /// A region offset was resolved
    fn offset_resolved(&self, _region: &str, _offset: usize) {}

    /// A volumetric frame was decoded
    fn frame_decoded(&self, _index: usize, _total: u32) {}

    /// A fundus header record was read
    fn fundus_header_read(&self, _index: usize, _width: u32, _height: u32) {}

    /// A fundus image was decoded
    fn fundus_decoded(&self, _index: usize, _max_value: u8) {}

    /// A decode loop stopped before its nominal end
    fn decode_stopped(&self, _reason: &str) {}

    /// Processing of a file failed
    fn file_failed(&self, _path: &Path, _error: &TomeyError) {}
}

/// Observer discarding every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Observer forwarding events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ParseObserver for LogObserver {
    fn field_parsed(&self, field: &str, value: &str) {
        debug!("{} = {}", field, value);
    }

    fn offset_resolved(&self, region: &str, offset: usize) {
        info!("{} offset = {}", region, offset);
    }

    fn frame_decoded(&self, index: usize, total: u32) {
        debug!("Decoded volume frame {} of {}", index + 1, total);
    }

    fn fundus_header_read(&self, index: usize, width: u32, height: u32) {
        debug!("Fundus header {}: {}x{}", index, width, height);
    }

    fn fundus_decoded(&self, index: usize, max_value: u8) {
        debug!("Decoded fundus image {} (window max {})", index, max_value);
    }

    fn decode_stopped(&self, reason: &str) {
        info!("Decoding stopped early: {}", reason);
    }

    fn file_failed(&self, path: &Path, error: &TomeyError) {
        error!("Failed to process {}: {}", path.display(), error);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::Mutex;

    /// Observer collecting events as strings for assertions
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        pub events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl ParseObserver for RecordingObserver {
        fn field_parsed(&self, field: &str, value: &str) {
            self.push(format!("field {}={}", field, value));
        }

        fn offset_resolved(&self, region: &str, offset: usize) {
            self.push(format!("offset {}={}", region, offset));
        }

        fn frame_decoded(&self, index: usize, _total: u32) {
            self.push(format!("frame {}", index));
        }

        fn fundus_header_read(&self, index: usize, width: u32, height: u32) {
            self.push(format!("fundus-header {} {}x{}", index, width, height));
        }

        fn fundus_decoded(&self, index: usize, max_value: u8) {
            self.push(format!("fundus {} max={}", index, max_value));
        }

        fn decode_stopped(&self, reason: &str) {
            self.push(format!("stopped {}", reason));
        }

        fn file_failed(&self, path: &Path, error: &TomeyError) {
            self.push(format!("failed {} {}", path.display(), error));
        }
    }
}
