use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::debug;

use inss_cli::app;
use inss_cli::config::{AppConfig, ConfigOverrides, OutputFormat};
use inss_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimates INSS contributions paid above the ceiling.
///
/// Reads a CNIS statement (PDF or text), computes each competence's
/// contributions against the published tables, and reports the excess
/// over the ceiling for the recovery window.
#[derive(Debug, Parser)]
#[command(name = "inss-refund", version, about)]
struct Cli {
    /// Statement to analyse (`.pdf`, or plain text).
    document: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV of rate tables replacing the built-in ones.
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Reference date for the window (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Window length in years.
    #[arg(long)]
    window_years: Option<u32>,

    /// Report format.
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file as well as stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            rate_tables: self.rates.clone(),
            window_years: self.window_years,
            output: self.output,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;

    if !logging::env_filter_overridden() {
        logging::set_log_level(&config.log_level)?;
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration resolved");

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let output = app::run(&cli.document, &config, today)?;
    print!("{output}");

    Ok(())
}
