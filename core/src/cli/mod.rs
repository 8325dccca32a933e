pub mod report;

use crate::error::Result;
use crate::extraction::FileTagSettings;
use crate::types::{FieldOverrides, DERIVE_FROM_FILE};
use clap::{Args, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Command-line arguments for tomey
#[derive(Parser, Debug)]
#[command(name = "tomey")]
#[command(about = "Tomey OCT dump metadata inspection tool")]
#[command(version)]
pub struct Cli {
    /// Path to dump file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// JSON file with tag prefixes and structural offsets
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Also list the fundus image directory
    #[arg(long)]
    pub fundus: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Literal field values; -1 derives the field from the file
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OverrideArgs {
    /// Frame width in pixels
    #[arg(long, value_name = "PX", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub width: i64,

    /// Frame height in pixels
    #[arg(long, value_name = "PX", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub height: i64,

    /// Number of volumetric frames
    #[arg(long, value_name = "N", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub frames: i64,

    /// Bytes per volumetric sample
    #[arg(long, value_name = "N", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub bytes_per_pixel: i64,

    /// Horizontal scale in mm per pixel
    #[arg(long, value_name = "MM", default_value_t = DERIVE_FROM_FILE as f64, value_parser = parse_scale_override, allow_negative_numbers = true)]
    pub x_mm: f64,

    /// Vertical scale in mm per pixel
    #[arg(long, value_name = "MM", default_value_t = DERIVE_FROM_FILE as f64, value_parser = parse_scale_override, allow_negative_numbers = true)]
    pub y_mm: f64,

    /// Depth scale in mm per pixel
    #[arg(long, value_name = "MM", default_value_t = DERIVE_FROM_FILE as f64, value_parser = parse_scale_override, allow_negative_numbers = true)]
    pub z_mm: f64,

    /// Byte offset of the first volumetric frame
    #[arg(long, value_name = "BYTES", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub volume_offset: i64,

    /// Byte offset of the first fundus header record
    #[arg(long, value_name = "BYTES", default_value_t = DERIVE_FROM_FILE, value_parser = parse_override, allow_negative_numbers = true)]
    pub fundus_offset: i64,
}

impl Default for OverrideArgs {
    fn default() -> Self {
        let scale = DERIVE_FROM_FILE as f64;
        Self {
            width: DERIVE_FROM_FILE,
            height: DERIVE_FROM_FILE,
            frames: DERIVE_FROM_FILE,
            bytes_per_pixel: DERIVE_FROM_FILE,
            x_mm: scale,
            y_mm: scale,
            z_mm: scale,
            volume_offset: DERIVE_FROM_FILE,
            fundus_offset: DERIVE_FROM_FILE,
        }
    }
}

impl OverrideArgs {
    /// Maps sentinel values to `None`
    pub fn to_overrides(&self) -> FieldOverrides {
        FieldOverrides {
            width: literal(self.width),
            height: literal(self.height),
            frame_count: literal(self.frames),
            bytes_per_pixel: literal(self.bytes_per_pixel),
            x_mm_per_pixel: scale_literal(self.x_mm),
            y_mm_per_pixel: scale_literal(self.y_mm),
            z_mm_per_pixel: scale_literal(self.z_mm),
            volume_offset: literal(self.volume_offset),
            fundus_offset: literal(self.fundus_offset),
        }
    }
}

fn literal<T: TryFrom<i64>>(value: i64) -> Option<T> {
    if value == DERIVE_FROM_FILE {
        return None;
    }
    T::try_from(value).ok()
}

fn scale_literal(value: f64) -> Option<f64> {
    if value == DERIVE_FROM_FILE as f64 {
        None
    } else {
        Some(value)
    }
}

/// Parses an integer override: -1 or a value in `0..=u32::MAX`
pub fn parse_override(s: &str) -> std::result::Result<i64, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an integer", s))?;
    if value == DERIVE_FROM_FILE || (0..=u32::MAX as i64).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "'{}' must be {} or between 0 and {}",
            s,
            DERIVE_FROM_FILE,
            u32::MAX
        ))
    }
}

/// Parses a scale override: -1 or a positive number
pub fn parse_scale_override(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value == DERIVE_FROM_FILE as f64 || (value.is_finite() && value > 0.0) {
        Ok(value)
    } else {
        Err(format!("'{}' must be {} or positive", s, DERIVE_FROM_FILE))
    }
}

/// Loads tag settings from `path`, or the built-in defaults
pub fn load_settings(path: Option<&Path>) -> Result<FileTagSettings> {
    match path {
        Some(path) => FileTagSettings::from_json_file(path),
        None => Ok(FileTagSettings::default()),
    }
}

/// Initialises env_logger at `Info`, or `Debug` when verbose
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TomeyError;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("-1", Ok(-1))]
    #[case("0", Ok(0))]
    #[case("512", Ok(512))]
    #[case(" 7 ", Ok(7))]
    #[case("4294967295", Ok(4294967295))]
    fn test_parse_override_accepts(#[case] input: &str, #[case] expected: std::result::Result<i64, String>) {
        assert_eq!(parse_override(input), expected);
    }

    #[rstest]
    #[case("-2")]
    #[case("abc")]
    #[case("1.5")]
    #[case("4294967296")]
    fn test_parse_override_rejects(#[case] input: &str) {
        assert!(parse_override(input).is_err());
    }

    #[rstest]
    #[case("-1", true)]
    #[case("0.0125", true)]
    #[case("0", false)]
    #[case("-0.5", false)]
    #[case("inf", false)]
    #[case("x", false)]
    fn test_parse_scale_override(#[case] input: &str, #[case] accepted: bool) {
        assert_eq!(parse_scale_override(input).is_ok(), accepted);
    }

    #[test]
    fn test_defaults_derive_everything() {
        assert!(OverrideArgs::default().to_overrides().is_empty());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "tomey",
            "scan.oct",
            "--width",
            "640",
            "--frames",
            "-1",
            "--z-mm",
            "0.5",
            "--volume-offset",
            "1024",
        ]);

        let overrides = cli.overrides.to_overrides();
        assert_eq!(overrides.width, Some(640));
        assert_eq!(overrides.frame_count, None);
        assert_eq!(overrides.z_mm_per_pixel, Some(0.5));
        assert_eq!(overrides.x_mm_per_pixel, None);
        assert_eq!(overrides.volume_offset, Some(1024));
        assert_eq!(overrides.fundus_offset, None);
    }

    #[test]
    fn test_cli_rejects_bad_override() {
        assert!(Cli::try_parse_from(["tomey", "scan.oct", "--height", "-5"]).is_err());
    }

    #[test]
    fn test_load_settings() {
        assert_eq!(load_settings(None).unwrap(), FileTagSettings::default());

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"width": "BREITE:", "fundusSentinel": 9}"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.width, "BREITE:");
        assert_eq!(settings.fundus_sentinel, 9);
        assert_eq!(settings.height, "HEIGHT:");

        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            load_settings(Some(&path)).unwrap_err(),
            TomeyError::Settings(_)
        ));
    }
}
