//! Statement text in, analysis out.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::analysis::Aggregator;
use crate::calculations::ContributionError;
use crate::extraction::{ExtractionWarning, Extractor};
use crate::models::AnalysisOutcome;
use crate::registry::TableRegistry;

/// Outcome of a full run plus what extraction had to skip to get there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub outcome: AnalysisOutcome,
    pub records_extracted: usize,
    pub warnings: Vec<ExtractionWarning>,
}

/// Extracts every record from `text` and aggregates it against `registry`
/// with a window of `window_years` ending at `today`.
///
/// # Errors
///
/// Propagates [`ContributionError`] from aggregation. Extraction itself never
/// fails; lines it cannot read end up in [`PipelineReport::warnings`].
pub fn analyze_text(
    text: &str,
    registry: &TableRegistry,
    today: NaiveDate,
    window_years: u32,
) -> Result<PipelineReport, ContributionError> {
    let extraction = Extractor::new().extract(text);

    info!(
        segments = extraction.segments,
        records = extraction.records.len(),
        warnings = extraction.warnings.len(),
        "statement read"
    );

    let outcome = Aggregator::new(registry)
        .with_window_years(window_years)
        .aggregate(&extraction.records, today)?;

    Ok(PipelineReport {
        outcome,
        records_extracted: extraction.records.len(),
        warnings: extraction.warnings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::analysis::DEFAULT_WINDOW_YEARS;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn text_without_records_is_nothing_found() {
        let report = analyze_text(
            "CNIS\nsem vínculos",
            TableRegistry::statutory(),
            today(),
            DEFAULT_WINDOW_YEARS,
        )
        .unwrap();

        assert_eq!(report.outcome, AnalysisOutcome::NothingFound);
        assert_eq!(report.records_extracted, 0);
    }

    #[test]
    fn warnings_survive_into_report() {
        let text = "\
Código Emp. 1 11.111.111/0001-11 ALFA
03/2024 7.786,02
04/2024 ???
Código Emp. 2 22.222.222/0001-22 BETA
03/2024 1.000,00
";

        let report = analyze_text(text, TableRegistry::statutory(), today(), 5).unwrap();

        assert_eq!(report.records_extracted, 2);
        assert_eq!(report.warnings.len(), 1);
        let AnalysisOutcome::Analyzed(result) = report.outcome else {
            panic!("expected an analysis result");
        };
        // 03/2024 exceeds by 75.00, counted for both records
        assert_eq!(result.total_excess, dec!(150.00));
        assert_eq!(result.period_excess, dec!(75.00));
    }
}
