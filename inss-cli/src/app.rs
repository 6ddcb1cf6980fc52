use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use inss_core::{PipelineReport, TableRegistry, analyze_text};
use inss_data::RateTableLoader;
use tracing::info;

use crate::config::{AppConfig, OutputFormat};
use crate::document;
use crate::report::{TextReport, render_json};

/// The statutory tables, or the tables of `rate_tables` when given.
pub fn load_registry(rate_tables: Option<&Path>) -> Result<Cow<'static, TableRegistry>> {
    match rate_tables {
        Some(path) => {
            let registry = RateTableLoader::load_from_file(path)
                .with_context(|| format!("Failed to load rate tables: {}", path.display()))?;
            info!(path = %path.display(), tables = registry.len(), "using rate tables from file");
            Ok(Cow::Owned(registry))
        }
        None => Ok(Cow::Borrowed(TableRegistry::statutory())),
    }
}

/// Reads the statement at `document` and analyses it as of `today`.
pub fn analyze_document(
    document: &Path,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<PipelineReport> {
    let registry = load_registry(config.rate_tables.as_deref())?;
    let text = document::load_text(document)?;

    analyze_text(&text, &registry, today, config.window_years)
        .with_context(|| format!("Failed to analyse: {}", document.display()))
}

/// Renders `report` in the configured output format.
pub fn render(
    report: &PipelineReport,
    config: &AppConfig,
) -> Result<String> {
    match config.output {
        OutputFormat::Text => Ok(TextReport::new(report, config.window_years).to_string()),
        OutputFormat::Json => {
            render_json(report, config.window_years).context("Failed to serialise report")
        }
    }
}

/// Full run: document in, rendered report out.
pub fn run(
    document: &Path,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<String> {
    let report = analyze_document(document, config, today)?;
    render(&report, config)
}
