use anyhow::{Context, Result};
use clap::Parser;
use kroppie_core::{Profile, ui};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dataset cropping tool for image captioning workflows", long_about = None)]
struct Args {
    /// Open this source directory at startup instead of the remembered one
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Override the output directory for this run
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let mut profile = Profile::load();
    if let Some(output) = args.output {
        profile.output_directory = Some(output);
    }

    ui::run(profile, args.source).context("Failed to run the UI")?;
    Ok(())
}
