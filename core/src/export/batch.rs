use super::layout::{collect_input_files, prepare_output_dir};
use super::writer::{write_metadata_json, ImageFileWriter, RasterWriter};
use super::ExportConfig;
use crate::api::TomeyFile;
use crate::error::{Result, TomeyError};
use crate::observer::ParseObserver;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of exporting one input file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub frames_written: usize,
    pub fundus_written: usize,
    pub metadata_written: bool,
    /// Failure reason; outputs counted above were still written
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole run, one entry per input file in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| !f.succeeded()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    pub fn frames_written(&self) -> usize {
        self.files.iter().map(|f| f.frames_written).sum()
    }

    pub fn fundus_written(&self) -> usize {
        self.files.iter().map(|f| f.fundus_written).sum()
    }
}

/// Exports every matching file of a directory
///
/// Files are processed one after another. A failure aborts only the file
/// it occurred in.
pub struct Exporter<W = ImageFileWriter> {
    config: ExportConfig,
    writer: W,
}

impl Exporter<ImageFileWriter> {
    /// Exporter encoding rasters in the format named by the image extension
    ///
    /// # Errors
    ///
    /// Returns `TomeyError::Encode` if the extension names no format that
    /// can be written
    pub fn new(config: ExportConfig) -> Result<Self> {
        let writer = ImageFileWriter::for_extension(&config.settings().image_extension)?;
        Ok(Self { config, writer })
    }
}

impl<W: RasterWriter> Exporter<W> {
    pub fn with_writer(config: ExportConfig, writer: W) -> Self {
        Self { config, writer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports every file in `input_dir` ending with the configured extension
    ///
    /// # Errors
    ///
    /// Only run-level problems are returned: an unusable output directory,
    /// an unreadable input directory or no matching input file. Per-file
    /// failures are recorded in the report.
    pub fn run(&self, input_dir: &Path, observer: &dyn ParseObserver) -> Result<BatchReport> {
        prepare_output_dir(self.config.output_dir())?;

        let files = collect_input_files(input_dir, self.config.extension())?;
        if files.is_empty() {
            return Err(TomeyError::NoInputFiles {
                dir: input_dir.to_path_buf(),
                extension: self.config.extension().to_string(),
            });
        }
        info!(
            "Found {} files ending with '{}' in {}",
            files.len(),
            self.config.extension(),
            input_dir.display()
        );

        let mut report = BatchReport::default();
        for path in &files {
            report.files.push(self.export_file(path, observer));
        }

        info!(
            "Exported {} files ({} failed)",
            report.files.len(),
            report.failed_count()
        );
        Ok(report)
    }

    /// Exports one dump
    ///
    /// Outputs are written in order: volumetric frames, metadata record,
    /// fundus images. Nothing is written when the metadata cannot be parsed.
    pub fn export_file(&self, path: &Path, observer: &dyn ParseObserver) -> FileReport {
        info!("Processing {}", path.display());
        let mut report = FileReport::new(path);

        if let Err(e) = self.write_outputs(path, observer, &mut report) {
            observer.file_failed(path, &e);
            report.error = Some(e.to_string());
        }
        report
    }

    fn write_outputs(
        &self,
        path: &Path,
        observer: &dyn ParseObserver,
        report: &mut FileReport,
    ) -> Result<()> {
        let file = TomeyFile::open(
            path,
            self.config.settings(),
            self.config.overrides(),
            observer,
        )?;
        let mode = self.config.mode();
        let layout = self.config.layout_for(path);
        layout.ensure_dir()?;

        if mode.writes_volume() {
            for frame in file.volume_frames(observer) {
                self.writer
                    .write_volume_frame(&frame, &layout.volume_frame(frame.index()))?;
                report.frames_written += 1;
            }

            let metadata = file.metadata();
            if report.frames_written == 0 && metadata.frame_count > 0 {
                return Err(TomeyError::truncated(
                    "volume frame 0",
                    metadata.frame_byte_size,
                    file.len().saturating_sub(metadata.volume_offset),
                ));
            }
        }

        if mode.writes_metadata() {
            write_metadata_json(file.metadata(), &layout.metadata())?;
            report.metadata_written = true;
        }

        if mode.writes_fundus() {
            let headers = file.fundus_headers(observer)?;
            for image in file.fundus_images(&headers, observer) {
                let image = image?;
                self.writer
                    .write_fundus_image(&image, &layout.fundus_image(image.index()))?;
                report.fundus_written += 1;
            }
        }

        Ok(())
    }
}
