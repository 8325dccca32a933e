use crate::error::{Result, TomeyError};
use std::path::{Path, PathBuf};

/// Collects the input files of a run
///
/// Regular files directly inside `directory` whose name ends with
/// `extension` (case-sensitive), sorted by path.
pub fn collect_input_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file()
            && path
                .file_name()
                .map(|name| name.to_string_lossy().ends_with(extension))
                .unwrap_or(false)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Creates the output directory if needed
///
/// # Errors
///
/// Returns `OutputTargetInvalid` if `path` exists and is not a directory
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(TomeyError::OutputTargetInvalid(path.to_path_buf()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Naming of the files written for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    stem: String,
    image_extension: String,
}

impl OutputLayout {
    /// Layout for `input`, optionally nested in a directory named after its stem
    pub fn new(output_dir: &Path, input: &Path, nested: bool, image_extension: &str) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = if nested {
            output_dir.join(&stem)
        } else {
            output_dir.to_path_buf()
        };
        Self {
            dir,
            stem,
            image_extension: image_extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<stem>-<index>.<ext>`
    pub fn volume_frame(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{}-{}.{}", self.stem, index, self.image_extension))
    }

    /// `<stem>-eye-image-<index>.<ext>`
    pub fn fundus_image(&self, index: usize) -> PathBuf {
        self.dir.join(format!(
            "{}-eye-image-{}.{}",
            self.stem, index, self.image_extension
        ))
    }

    /// `<stem>.json`
    pub fn metadata(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.stem))
    }

    /// Creates the target directory
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}
