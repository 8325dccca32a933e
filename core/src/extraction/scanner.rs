//! Byte-pattern search over a loaded dump
//!
//! Both searches use a single running match counter that drops back to zero
//! on any mismatch, without re-testing the mismatching byte against the start
//! of the pattern. A pattern whose prefix repeats inside itself (e.g. `"AB"`
//! in `"AAB"`) is therefore not found where a textbook substring search would
//! find it. Tag prefixes and markers of the device never overlap this way, and
//! the exact occurrence selected must stay stable across firmware dumps.

use crate::error::{Result, TomeyError};
use encoding_rs::WINDOWS_1252;

/// A tag value located in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    /// Index of the final byte of the terminator
    pub end: usize,
    /// Decoded text between prefix and terminator
    pub text: String,
}

/// Finds `pattern` in `buffer` at or after `start`
///
/// Returns the index of the pattern's LAST byte, or `None` if the end of the
/// buffer is reached first. An empty pattern never matches.
///
/// # Example
///
/// ```
/// use tomey_core::extraction::find_offset;
///
/// assert_eq!(find_offset(b"AB", b"XABY", 0), Some(2));
/// assert_eq!(find_offset(b"AB", b"XABY", 3), None);
/// ```
pub fn find_offset(pattern: &[u8], buffer: &[u8], start: usize) -> Option<usize> {
    let last = pattern.len().checked_sub(1)?;
    let mut matched = 0;

    for (i, &byte) in buffer.iter().enumerate().skip(start) {
        if byte == pattern[matched] {
            if matched == last {
                return Some(i);
            }
            matched += 1;
        } else {
            matched = 0;
        }
    }

    None
}

/// Reads the text following `prefix` up to `terminator`
///
/// Bytes that partially match the terminator before a mismatch are dropped
/// from the value; the mismatching byte itself is kept.
///
/// # Errors
///
/// - `TagNotFound` if `prefix` does not occur at or after `start`
/// - `IncompleteTag` if the buffer ends before `terminator` completes
pub fn find_tag(prefix: &[u8], terminator: &[u8], buffer: &[u8], start: usize) -> Result<TagValue> {
    let tag_end = find_offset(prefix, buffer, start).ok_or_else(|| TomeyError::TagNotFound {
        tag: decode_text(prefix),
    })?;

    let mut content = Vec::new();
    let mut matched = 0;

    for (i, &byte) in buffer.iter().enumerate().skip(tag_end + 1) {
        if !terminator.is_empty() && byte == terminator[matched] {
            if matched == terminator.len() - 1 {
                return Ok(TagValue {
                    end: i,
                    text: decode_text(&content),
                });
            }
            matched += 1;
        } else {
            matched = 0;
            content.push(byte);
        }
    }

    Err(TomeyError::IncompleteTag {
        tag: decode_text(prefix),
        partial: decode_text(&content),
    })
}

/// Decodes tag text with the Windows-1252 code page
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encodes text back to Windows-1252 bytes for use as a search pattern
pub fn encode_text(text: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1252.encode(text);
    bytes.into_owned()
}
