//! End-to-end analysis of a statement transcript.

use chrono::NaiveDate;
use inss_core::{
    AnalysisOutcome, AnalysisResult, DEFAULT_WINDOW_YEARS, ExtractionWarning, Extractor, Period,
    PeriodRange, TableRegistry, analyze_text,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const STATEMENT: &str = include_str!("fixtures/cnis_statement.txt");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn period(
    year: i32,
    month: u32,
) -> Period {
    Period::new(year, month).unwrap()
}

fn analyzed(outcome: AnalysisOutcome) -> AnalysisResult {
    match outcome {
        AnalysisOutcome::Analyzed(result) => result,
        AnalysisOutcome::NothingFound => panic!("expected an analysis result"),
    }
}

#[test]
fn test_extracts_every_payer_block() {
    let extraction = Extractor::new().extract(STATEMENT);

    assert_eq!(extraction.records.len(), 10);

    let payers: Vec<_> = extraction
        .records
        .iter()
        .map(|r| r.payer_id())
        .collect();
    assert_eq!(payers[0], "12.345.678/0001-90");
    assert_eq!(payers[5], "98.765.432/0001-10");
    assert_eq!(payers[8], "11.111.111/0001-11");
    assert_eq!(payers[9], "33.333.333");

    assert!(matches!(
        extraction.warnings.as_slice(),
        [ExtractionWarning::MalformedAmount { period, .. }] if period == "03/2024"
    ));
}

#[test]
fn test_statement_excess_within_window() {
    let report = analyze_text(
        STATEMENT,
        TableRegistry::statutory(),
        today(),
        DEFAULT_WINDOW_YEARS,
    )
    .unwrap();

    let result = analyzed(report.outcome);

    // Period excesses 10/2021: 277.40, 11/2021: 75.00, 01/2024: 158.82,
    // 02/2024: 75.00; each of those periods has two records.
    assert_eq!(result.total_excess, dec!(1172.44));
    assert_eq!(result.period_excess, dec!(586.22));
    assert_eq!(result.total_records, 9);
    assert_eq!(result.distinct_periods, 5);
    assert_eq!(
        result.period_range,
        PeriodRange::Span {
            start: period(2021, 10),
            end: period(2024, 5),
        }
    );
    assert_eq!(report.records_extracted, 10);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_period_breakdown_is_chronological() {
    let report = analyze_text(STATEMENT, TableRegistry::statutory(), today(), 5).unwrap();

    let result = analyzed(report.outcome);
    let periods: Vec<_> = result.periods.iter().map(|p| p.period).collect();

    assert_eq!(
        periods,
        vec![
            period(2021, 10),
            period(2021, 11),
            period(2024, 1),
            period(2024, 2),
            period(2024, 5),
        ]
    );

    let october = &result.periods[0];
    assert_eq!(october.ceiling_contribution, dec!(751.99));
    assert_eq!(october.total_contribution, dec!(1029.39));
    assert_eq!(october.excess_contribution, dec!(277.40));
    assert_eq!(october.payers, 2);
}

#[test]
fn test_old_statement_has_no_periods_in_window() {
    let far_future = NaiveDate::from_ymd_opt(2035, 1, 1).unwrap();

    let report = analyze_text(STATEMENT, TableRegistry::statutory(), far_future, 5).unwrap();

    assert_eq!(
        report.outcome,
        AnalysisOutcome::Analyzed(AnalysisResult::empty_window())
    );
}

#[test]
fn test_unrelated_text_finds_nothing() {
    let report = analyze_text(
        "Relatório de férias\n01/2024 sem remuneração",
        TableRegistry::statutory(),
        today(),
        5,
    )
    .unwrap();

    assert_eq!(report.outcome, AnalysisOutcome::NothingFound);
}

#[test]
fn test_analysis_is_repeatable() {
    let first = analyze_text(STATEMENT, TableRegistry::statutory(), today(), 5).unwrap();
    let second = analyze_text(STATEMENT, TableRegistry::statutory(), today(), 5).unwrap();

    assert_eq!(first, second);
}
