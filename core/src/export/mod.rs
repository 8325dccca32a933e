//! Batch export of dump files to images and metadata records
//!
//! An [`ExportConfig`] is resolved once per run. [`Exporter`] then walks the
//! input directory, decodes each dump and hands rasters to a
//! [`RasterWriter`].

pub mod batch;
pub mod layout;
pub mod writer;

pub use batch::{BatchReport, Exporter, FileReport};
pub use layout::{collect_input_files, prepare_output_dir, OutputLayout};
pub use writer::{write_metadata_json, ImageFileWriter, RasterWriter};

use crate::extraction::FileTagSettings;
use crate::types::{ExportMode, FieldOverrides};
use std::path::{Path, PathBuf};

/// Settings of one export run
///
/// # Example
///
/// ```
/// use tomey_core::export::ExportConfig;
/// use tomey_core::ExportMode;
///
/// let config = ExportConfig::new("out", ".oct")
///     .with_mode(ExportMode::Metadata)
///     .with_nested(true);
/// assert_eq!(config.mode(), ExportMode::Metadata);
/// assert!(config.nested());
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    mode: ExportMode,
    output_dir: PathBuf,
    nested: bool,
    extension: String,
    settings: FileTagSettings,
    overrides: FieldOverrides,
}

impl ExportConfig {
    /// Config writing every output class flat into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            mode: ExportMode::default(),
            output_dir: output_dir.into(),
            nested: false,
            extension: extension.into(),
            settings: FileTagSettings::default(),
            overrides: FieldOverrides::default(),
        }
    }

    pub fn with_mode(mut self, mode: ExportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Writes each file's outputs into `<output>/<stem>/`
    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_settings(mut self, settings: FileTagSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_overrides(mut self, overrides: FieldOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn nested(&self) -> bool {
        self.nested
    }

    /// Input file name suffix
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn settings(&self) -> &FileTagSettings {
        &self.settings
    }

    pub fn overrides(&self) -> &FieldOverrides {
        &self.overrides
    }

    /// Target naming for one input file
    pub fn layout_for(&self, input: &Path) -> OutputLayout {
        OutputLayout::new(
            &self.output_dir,
            input,
            self.nested,
            &self.settings.image_extension,
        )
    }
}
