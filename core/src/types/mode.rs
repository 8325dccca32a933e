use std::fmt;

/// Output classes produced for every input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportMode {
    /// Metadata record only
    Metadata,
    /// Fundus images only
    Fundus,
    /// Volumetric frames only
    Volume,
    /// Volumetric frames, metadata record and fundus images
    #[default]
    All,
}

impl ExportMode {
    pub fn writes_volume(&self) -> bool {
        matches!(self, ExportMode::Volume | ExportMode::All)
    }

    pub fn writes_metadata(&self) -> bool {
        matches!(self, ExportMode::Metadata | ExportMode::All)
    }

    pub fn writes_fundus(&self) -> bool {
        matches!(self, ExportMode::Fundus | ExportMode::All)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ExportMode::Metadata => "metadata",
            ExportMode::Fundus => "fundus",
            ExportMode::Volume => "volume",
            ExportMode::All => "all",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
