/// Grayscale raster decoded from a dump
///
/// `index` is the 0-based position of the raster in its sequence (frame
/// order for volumetric frames, directory order for fundus images). Samples
/// are row-major and never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster<T> {
    index: usize,
    width: u32,
    height: u32,
    samples: Vec<T>,
}

/// One volumetric frame with 16-bit samples
pub type VolumeFrame = Raster<u16>;

/// One fundus image with 8-bit samples
pub type FundusImage = Raster<u8>;

impl<T> Raster<T> {
    /// Creates a raster; `samples` must hold exactly `width * height` values
    pub fn new(index: usize, width: u32, height: u32, samples: Vec<T>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize);
        Self {
            index,
            width,
            height,
            samples,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Releases the sample buffer
    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }
}
