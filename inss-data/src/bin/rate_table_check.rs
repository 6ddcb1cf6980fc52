use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use inss_data::RateTableLoader;

/// Validate a contribution table CSV file and print the tables it defines.
///
/// The CSV file should have the following columns:
/// - effective_from: First month the table applies (e.g., 2024-01)
/// - min: Lower bound of the bracket, inclusive
/// - max: Upper bound of the bracket, inclusive
/// - rate: The marginal rate as a decimal (e.g., 0.075)
#[derive(Parser, Debug)]
#[command(name = "rate-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing rate table data
    #[arg(short, long)]
    file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = RateTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} brackets from CSV", records.len());

    let registry = RateTableLoader::build(&records).context("Rate tables are inconsistent")?;

    for table in registry.tables() {
        println!(
            "{}  {} brackets  ceiling {}",
            table.effective_from().to_iso(),
            table.brackets().len(),
            table.ceiling()
        );
    }

    println!("All {} tables are valid.", registry.len());

    Ok(())
}
