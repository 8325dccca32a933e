/// Command-line sentinel meaning "derive from file"
pub const DERIVE_FROM_FILE: i64 = -1;

/// Literal values replacing fields otherwise scanned from the dump
///
/// `None` means the field is derived from the file. A region offset override
/// skips the corresponding marker search.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_count: Option<u32>,
    pub bytes_per_pixel: Option<u32>,
    pub x_mm_per_pixel: Option<f64>,
    pub y_mm_per_pixel: Option<f64>,
    pub z_mm_per_pixel: Option<f64>,
    pub volume_offset: Option<usize>,
    pub fundus_offset: Option<usize>,
}

impl FieldOverrides {
    /// Returns true if no field is overridden
    pub fn is_empty(&self) -> bool {
        *self == FieldOverrides::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(FieldOverrides::default().is_empty());

        let overrides = FieldOverrides {
            frame_count: Some(4),
            ..Default::default()
        };
        assert!(!overrides.is_empty());
    }
}
