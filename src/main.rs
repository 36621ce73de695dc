use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::info;

mod color;
mod config;
mod dataset;
mod display;
mod error;
mod geometry;
mod plot;
mod record;

use config::{Config, ConsistencyPolicy};
use display::DisplayMode;

#[derive(Parser, Debug)]
#[command(name = "bikefit")]
#[command(author, version, about = "Convert bike cockpit geometry between cartesian and polar form and plot it")]
pub struct Args {
    /// Bike table (CSV); defaults to the configured input path
    pub input: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Display mode: terminal or print
    #[arg(short, long)]
    pub mode: Option<DisplayMode>,

    /// Row used for the single-bike figures (0-based)
    #[arg(short, long)]
    pub record: Option<usize>,

    /// Color scheme: tab10, spectrum, rainbow, fire, ocean, forest, purple, monochrome
    #[arg(long)]
    pub colors: Option<String>,

    /// Handling of rows whose cartesian and polar fields disagree
    #[arg(long)]
    pub consistency: Option<ConsistencyPolicy>,

    /// Allowed cartesian/polar disagreement in mm
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Write the completed table to this CSV file
    #[arg(short = 'o', long)]
    pub export: Option<PathBuf>,

    /// Figure width in cells (print mode)
    #[arg(long)]
    pub width: Option<u16>,

    /// Figure height in cells (print mode)
    #[arg(long)]
    pub height: Option<u16>,

    /// Write a commented config template to the default path and exit
    #[arg(long)]
    pub init_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

fn main() -> Result<()> {
    // Logs go to stderr so print mode output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bikefit=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "bikefit", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote config template to {}", path.display());
        return Ok(());
    }

    // Load or create config
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);

    info!("Starting bikefit in {:?} mode", config.display.mode);

    let records = dataset::load_records(&config.input.path)?;
    let geometries = dataset::complete_records(&records, &config.fill)
        .with_context(|| format!("Failed to complete {}", config.input.path.display()))?;

    if let Some(path) = &config.export.path {
        dataset::write_records(path, &geometries)?;
    }

    match config.display.mode {
        DisplayMode::Terminal => display::terminal::run(&geometries, &config)?,
        DisplayMode::Print => display::print::run(&geometries, &config)?,
    }

    Ok(())
}
