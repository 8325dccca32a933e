use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use tomey_core::cli::{load_settings, setup_logging, OutputFormat, OverrideArgs};
use tomey_core::{BatchReport, BatchSummary, ExportConfig, ExportMode, Exporter, LogObserver};

/// CLI tool for exporting a directory of Tomey dumps to images and metadata
#[derive(Parser, Debug)]
#[command(name = "tomeyexport")]
#[command(about = "Export volumetric frames, fundus images and metadata from Tomey dump files")]
#[command(version)]
struct Cli {
    /// Directory containing dump files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Suffix selecting the input files, matched case-sensitively
    #[arg(short, long)]
    extension: String,

    /// Output directory, created if missing
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Output classes to write
    #[arg(short, long, default_value = "all")]
    mode: ExportModeArg,

    /// Write each file's outputs into a subdirectory named after it
    #[arg(long)]
    nested: bool,

    /// JSON file with tag prefixes and structural offsets
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,

    /// Summary format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output classes written per input file
#[derive(Debug, Clone, ValueEnum)]
enum ExportModeArg {
    /// Metadata JSON only
    Metadata,
    /// Fundus images only
    Fundus,
    /// Volumetric frames only
    Volume,
    /// Volumetric frames, metadata JSON and fundus images
    All,
}

impl From<ExportModeArg> for ExportMode {
    fn from(arg: ExportModeArg) -> Self {
        match arg {
            ExportModeArg::Metadata => ExportMode::Metadata,
            ExportModeArg::Fundus => ExportMode::Fundus,
            ExportModeArg::Volume => ExportMode::Volume,
            ExportModeArg::All => ExportMode::All,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.directory.display());

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            error!("Export failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_report(&report, &cli.format);

    if report.has_failures() {
        process::exit(1);
    }
}

fn run(cli: &Cli) -> tomey_core::Result<BatchReport> {
    let settings = load_settings(cli.settings.as_deref())?;
    let config = ExportConfig::new(&cli.output, cli.extension.as_str())
        .with_mode(cli.mode.clone().into())
        .with_nested(cli.nested)
        .with_settings(settings)
        .with_overrides(cli.overrides.to_overrides());

    info!("Using export mode: {}", config.mode());

    Exporter::new(config)?.run(&cli.directory, &LogObserver)
}

fn output_report(report: &BatchReport, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", BatchSummary::new(report)),
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(1);
            }
        },
    }
}
