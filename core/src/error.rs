use std::path::PathBuf;
use thiserror::Error;

/// Result type for tomey operations
pub type Result<T> = std::result::Result<T, TomeyError>;

/// Error types for tomey operations
#[derive(Error, Debug)]
pub enum TomeyError {
    /// Tag prefix not present in the dump
    #[error("Tag not found: {tag}")]
    TagNotFound { tag: String },

    /// Tag prefix found but its terminator never follows
    #[error("Tag '{tag}' is not terminated (read '{partial}' before end of buffer)")]
    IncompleteTag { tag: String, partial: String },

    /// Scanned text could not be parsed as the expected type
    #[error("Malformed value for {field}: '{value}'")]
    MalformedValue { field: String, value: String },

    /// Record fields parsed but violate an invariant
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Structural marker used for offset discovery is absent
    #[error("Marker not found: {marker}")]
    MarkerNotFound { marker: String },

    /// Not enough bytes left for a read
    #[error("Truncated buffer reading {what}: need {needed} bytes, {available} available")]
    TruncatedBuffer {
        what: String,
        needed: usize,
        available: usize,
    },

    /// Output path exists but is not a directory
    #[error("Output target is not a directory: {}", .0.display())]
    OutputTargetInvalid(PathBuf),

    /// No input file matched the configured extension
    #[error("No files ending with '{extension}' found in {}", .dir.display())]
    NoInputFiles { dir: PathBuf, extension: String },

    /// Raster encoder failure
    #[error("Encode error: {0}")]
    Encode(String),

    /// Settings file could not be loaded
    #[error("Settings error: {0}")]
    Settings(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TomeyError {
    pub(crate) fn truncated(what: impl Into<String>, needed: usize, available: usize) -> Self {
        TomeyError::TruncatedBuffer {
            what: what.into(),
            needed,
            available,
        }
    }

    /// Returns true for failures caused by the dump's structure rather than the environment
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TomeyError::TagNotFound { .. }
                | TomeyError::IncompleteTag { .. }
                | TomeyError::MalformedValue { .. }
                | TomeyError::InvalidRecord(_)
                | TomeyError::MarkerNotFound { .. }
                | TomeyError::TruncatedBuffer { .. }
        )
    }
}

impl From<image::ImageError> for TomeyError {
    fn from(e: image::ImageError) -> Self {
        TomeyError::Encode(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err = TomeyError::TagNotFound {
            tag: "WIDTH:".to_string(),
        };
        assert_eq!(err.to_string(), "Tag not found: WIDTH:");

        let err = TomeyError::truncated("volume frame 3", 100, 42);
        assert_eq!(
            err.to_string(),
            "Truncated buffer reading volume frame 3: need 100 bytes, 42 available"
        );
    }

    #[test]
    fn test_format_error_classification() {
        assert!(TomeyError::MarkerNotFound {
            marker: "x".to_string()
        }
        .is_format_error());
        assert!(!TomeyError::OutputTargetInvalid(PathBuf::from("/tmp/x")).is_format_error());
        assert!(!TomeyError::Encode("boom".to_string()).is_format_error());
    }
}
