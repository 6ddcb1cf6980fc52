use std::fs::File;
use std::io::Read;
use std::path::Path;

use inss_core::{Bracket, Period, PeriodParseError, RateTable, RateTableError, TableRegistry};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading contribution tables.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to open rate table file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row}: invalid effective date")]
    InvalidEffectiveDate {
        row: usize,
        #[source]
        source: PeriodParseError,
    },

    #[error("Invalid rate table: {0}")]
    InvalidTable(#[from] RateTableError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single bracket row from the rate tables CSV file.
///
/// The CSV format has one row per bracket:
/// - `effective_from`: First month the table applies, as `YYYY-MM`
/// - `min`: Lower bound of the bracket (inclusive)
/// - `max`: Upper bound of the bracket (inclusive)
/// - `rate`: The marginal rate as a decimal (e.g., 0.075 for 7.5%)
///
/// Rows sharing an `effective_from` form one table, in file order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateTableRecord {
    pub effective_from: String,
    pub min: Decimal,
    pub max: Decimal,
    pub rate: Decimal,
}

/// Loader for contribution tables kept outside the binary.
///
/// Published tables change every January (and occasionally mid-year); a CSV
/// file lets a new table be used without a rebuild.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse bracket rows from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateTableRecord>, RateTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group parsed rows into tables and validate them into a registry.
    ///
    /// Brackets keep their row order within a table. Tables may appear in any
    /// order; the registry sorts them by effective date.
    pub fn build(records: &[RateTableRecord]) -> Result<TableRegistry, RateTableLoaderError> {
        let mut groups: Vec<(Period, Vec<Bracket>)> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let effective_from = Period::parse_iso(&record.effective_from).map_err(|source| {
                RateTableLoaderError::InvalidEffectiveDate {
                    // Header is row 1.
                    row: index + 2,
                    source,
                }
            })?;

            let bracket = Bracket::new(record.min, record.max, record.rate);
            match groups.iter_mut().find(|(period, _)| *period == effective_from) {
                Some((_, brackets)) => brackets.push(bracket),
                None => groups.push((effective_from, vec![bracket])),
            }
        }

        let tables = groups
            .into_iter()
            .map(|(effective_from, brackets)| {
                debug!(%effective_from, brackets = brackets.len(), "building rate table");
                RateTable::new(effective_from, brackets)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let registry = TableRegistry::new(tables)?;
        info!(tables = registry.len(), "rate tables loaded");
        Ok(registry)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<TableRegistry, RateTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<TableRegistry, RateTableLoaderError> {
        let file = File::open(path.as_ref())?;
        Self::load(file)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"effective_from,min,max,rate
2023-01,0.00,1302.00,0.075
2023-01,1302.01,2571.29,0.09
2023-01,2571.30,3856.94,0.12
2023-01,3856.95,7507.49,0.14
2024-01,0.00,1412.00,0.075
2024-01,1412.01,2666.68,0.09
2024-01,2666.69,4000.03,0.12
2024-01,4000.04,7786.02,0.14
"#;

    fn period(
        year: i32,
        month: u32,
    ) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "effective_from,min,max,rate\n2024-01,0.00,1412.00,0.075";

        let records = RateTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![RateTableRecord {
                effective_from: "2024-01".to_string(),
                min: dec!(0.00),
                max: dec!(1412.00),
                rate: dec!(0.075),
            }]
        );
    }

    #[test]
    fn test_parse_csv_trims_whitespace() {
        let csv = "effective_from, min, max, rate\n 2024-01 , 0.00 , 1412.00 , 0.075 ";

        let records = RateTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].effective_from, "2024-01");
        assert_eq!(records[0].rate, dec!(0.075));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records =
            RateTableLoader::parse("effective_from,min,max,rate\n".as_bytes()).expect("parse");

        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "effective_from,min\n2024-01,0";

        let err = RateTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        let RateTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "effective_from,min,max,rate\n2024-01,abc,1412.00,0.075";

        let err = RateTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, RateTableLoaderError::CsvParse(_)));
    }

    #[test]
    fn test_build_groups_rows_by_effective_date() {
        let registry = RateTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load");

        assert_eq!(registry.len(), 2);
        let table = registry.lookup(period(2023, 8)).expect("table in force");
        assert_eq!(table.effective_from(), period(2023, 1));
        assert_eq!(table.brackets().len(), 4);
        assert_eq!(table.ceiling(), dec!(7507.49));
    }

    #[test]
    fn test_build_accepts_tables_out_of_order() {
        let csv = "effective_from,min,max,rate\n\
                   2024-01,0.00,1412.00,0.075\n\
                   2023-01,0.00,1302.00,0.075\n";

        let registry = RateTableLoader::load(csv.as_bytes()).expect("Failed to load");

        let keys: Vec<_> = registry.tables().iter().map(|t| t.effective_from()).collect();
        assert_eq!(keys, vec![period(2023, 1), period(2024, 1)]);
    }

    #[test]
    fn test_build_rejects_bad_effective_date() {
        let csv = "effective_from,min,max,rate\n\
                   2024-01,0.00,1412.00,0.075\n\
                   01/2024,0.00,1412.00,0.075\n";

        let err = RateTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        match err {
            RateTableLoaderError::InvalidEffectiveDate { row, .. } => assert_eq!(row, 3),
            other => panic!("expected InvalidEffectiveDate, got {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_gap_between_brackets() {
        let csv = "effective_from,min,max,rate\n\
                   2024-01,0.00,1412.00,0.075\n\
                   2024-01,1500.00,2666.68,0.09\n";

        let err = RateTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(
            err,
            RateTableLoaderError::InvalidTable(RateTableError::NotContiguous { index: 1, .. })
        ));
    }

    #[test]
    fn test_build_empty_file_gives_empty_registry() {
        let registry = RateTableLoader::load("effective_from,min,max,rate\n".as_bytes())
            .expect("an empty registry is valid");

        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = RateTableLoader::load_from_file("/nonexistent/rate_tables.csv")
            .expect_err("Should fail");

        assert!(matches!(err, RateTableLoaderError::Io(_)));
    }
}
