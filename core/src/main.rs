use clap::Parser;
use log::error;
use std::process;
use tomey_core::cli::{load_settings, setup_logging, Cli, OutputFormat};
use tomey_core::{LogObserver, TextReport, TomeyFile};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}: {}", cli.file.display(), e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> tomey_core::Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;
    let overrides = cli.overrides.to_overrides();
    let observer = LogObserver;

    let file = TomeyFile::open(&cli.file, &settings, &overrides, &observer)?;
    let headers = if cli.fundus {
        Some(file.fundus_headers(&observer)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Text => {
            let mut report = TextReport::new(file.metadata());
            if let Some(headers) = headers.as_deref() {
                report = report.with_fundus(headers);
            }
            println!("{}", report);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(file.metadata())?);
        }
    }

    Ok(())
}
