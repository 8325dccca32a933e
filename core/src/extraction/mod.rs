pub mod header;
pub mod locator;
pub mod scanner;
pub mod tags;

pub use header::{bytes_per_pixel, HeaderParser};
pub use locator::ImageLocator;
pub use scanner::{decode_text, encode_text, find_offset, find_tag, TagValue};
pub use tags::{FileTagSettings, PatientTags};
