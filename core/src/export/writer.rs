use crate::error::{Result, TomeyError};
use crate::types::{FundusImage, MetadataRecord, VolumeFrame};
use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encodes decoded rasters to files
pub trait RasterWriter {
    /// Writes a 16-bit grayscale volumetric frame
    fn write_volume_frame(&self, frame: &VolumeFrame, path: &Path) -> Result<()>;

    /// Writes an 8-bit grayscale fundus image
    fn write_fundus_image(&self, image: &FundusImage, path: &Path) -> Result<()>;
}

/// Raster writer backed by the `image` crate
///
/// # Example
///
/// ```
/// use tomey_core::export::ImageFileWriter;
///
/// assert!(ImageFileWriter::for_extension("png").is_ok());
/// assert!(ImageFileWriter::for_extension("tif").is_err());
/// assert!(ImageFileWriter::for_extension("nope").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImageFileWriter {
    format: ImageFormat,
}

impl ImageFileWriter {
    pub fn png() -> Self {
        Self {
            format: ImageFormat::Png,
        }
    }

    /// Selects the output format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `TomeyError::Encode` for unknown extensions and for formats
    /// whose encoder is not built in
    pub fn for_extension(extension: &str) -> Result<Self> {
        let extension = extension.trim_start_matches('.');
        let format = ImageFormat::from_extension(extension)
            .ok_or_else(|| TomeyError::Encode(format!("unknown image format '{}'", extension)))?;
        if !format.writing_enabled() {
            return Err(TomeyError::Encode(format!(
                "writing {:?} images is not supported",
                format
            )));
        }
        Ok(Self { format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::png()
    }
}

impl RasterWriter for ImageFileWriter {
    fn write_volume_frame(&self, frame: &VolumeFrame, path: &Path) -> Result<()> {
        debug!(
            "Encoding volume frame {} ({}x{}) to {}",
            frame.index(),
            frame.width(),
            frame.height(),
            path.display()
        );
        let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(frame.width(), frame.height(), frame.samples().to_vec())
                .ok_or_else(|| {
                    TomeyError::Encode(format!("volume frame {} has wrong size", frame.index()))
                })?;
        buffer.save_with_format(path, self.format)?;
        Ok(())
    }

    fn write_fundus_image(&self, image: &FundusImage, path: &Path) -> Result<()> {
        debug!(
            "Encoding fundus image {} ({}x{}) to {}",
            image.index(),
            image.width(),
            image.height(),
            path.display()
        );
        let buffer = GrayImage::from_raw(image.width(), image.height(), image.samples().to_vec())
            .ok_or_else(|| {
                TomeyError::Encode(format!("fundus image {} has wrong size", image.index()))
            })?;
        buffer.save_with_format(path, self.format)?;
        Ok(())
    }
}

/// Writes the metadata record as pretty-printed JSON
pub fn write_metadata_json(record: &MetadataRecord, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}
