//! Human and JSON renderings of a [`PipelineReport`].

use std::fmt;

use inss_core::calculations::common::round_currency;
use inss_core::{AnalysisOutcome, AnalysisResult, PeriodRange, PipelineReport};
use rust_decimal::Decimal;
use serde::Serialize;

/// Formats `amount` as Brazilian currency, e.g. `R$ 1.234,56`.
///
/// ```
/// use inss_cli::report::format_brl;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_brl(dec!(1234.56)), "R$ 1.234,56");
/// ```
pub fn format_brl(amount: Decimal) -> String {
    let rounded = round_currency(amount.abs());
    let digits = format!("{rounded:.2}");
    let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{cents}")
}

/// Plain-text report for the terminal.
pub struct TextReport<'a> {
    report: &'a PipelineReport,
    window_years: u32,
}

impl<'a> TextReport<'a> {
    pub fn new(
        report: &'a PipelineReport,
        window_years: u32,
    ) -> Self {
        Self {
            report,
            window_years,
        }
    }

    fn write_result(
        &self,
        f: &mut fmt::Formatter<'_>,
        result: &AnalysisResult,
    ) -> fmt::Result {
        let PeriodRange::Span { start, end } = result.period_range else {
            return writeln!(
                f,
                "No competences fall within the last {} years; nothing is recoverable.",
                self.window_years
            );
        };

        writeln!(
            f,
            "Excess contributions (last {} years): {}",
            self.window_years,
            format_brl(result.total_excess)
        )?;
        writeln!(
            f,
            "Sum of competence excesses (each competence once): {}",
            format_brl(result.period_excess)
        )?;
        writeln!(
            f,
            "Records analysed: {} across {} competences ({start} to {end})",
            result.total_records, result.distinct_periods
        )?;

        let above: Vec<_> = result
            .periods
            .iter()
            .filter(|p| p.excess_contribution > Decimal::ZERO)
            .collect();
        if above.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<11} {:>7} {:>16} {:>16} {:>16}",
            "Competence", "Payers", "Contributed", "Ceiling", "Excess"
        )?;
        for period in above {
            writeln!(
                f,
                "{:<11} {:>7} {:>16} {:>16} {:>16}",
                period.period.to_string(),
                period.payers,
                format_brl(period.total_contribution),
                format_brl(period.ceiling_contribution),
                format_brl(period.excess_contribution)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.report.outcome {
            AnalysisOutcome::NothingFound => {
                writeln!(f, "No salary records were found in the document.")?
            }
            AnalysisOutcome::Analyzed(result) => self.write_result(f, result)?,
        }

        let warnings = &self.report.warnings;
        if !warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "{} line(s) could not be read:", warnings.len())?;
            for warning in warnings {
                writeln!(f, "  - {warning}")?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    window_years: u32,
    #[serde(flatten)]
    report: &'a PipelineReport,
}

/// Pretty-printed JSON report. Amounts are decimal strings.
pub fn render_json(
    report: &PipelineReport,
    window_years: u32,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        window_years,
        report,
    })
}
