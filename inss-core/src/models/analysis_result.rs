use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// Contribution totals for one competence month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period: Period,

    /// Sum of the contributions computed for every record in the period.
    pub total_contribution: Decimal,

    /// Largest contribution the period's table allows.
    pub ceiling_contribution: Decimal,

    /// `total_contribution - ceiling_contribution`, floored at zero.
    pub excess_contribution: Decimal,

    /// Number of records that fed the totals.
    pub records: usize,

    /// Number of distinct payers among those records.
    pub payers: usize,
}

/// First and last competence included in a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodRange {
    Span { start: Period, end: Period },

    /// Records exist, but none fall inside the analysis window.
    NoPeriodsInWindow,
}

/// Summary of a statement restricted to the analysis window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Headline figure: every windowed record contributes its period's
    /// excess, so a period with `n` records counts `n` times.
    pub total_excess: Decimal,

    /// Each windowed period's excess counted once.
    pub period_excess: Decimal,

    pub total_records: usize,
    pub distinct_periods: usize,
    pub period_range: PeriodRange,

    /// Per-period breakdown for the windowed periods, oldest first.
    pub periods: Vec<PeriodAggregate>,
}

impl AnalysisResult {
    /// Zero-valued result for a statement whose periods all predate the window.
    pub fn empty_window() -> Self {
        Self {
            total_excess: Decimal::ZERO,
            period_excess: Decimal::ZERO,
            total_records: 0,
            distinct_periods: 0,
            period_range: PeriodRange::NoPeriodsInWindow,
            periods: Vec::new(),
        }
    }

    pub fn has_periods_in_window(&self) -> bool {
        !matches!(self.period_range, PeriodRange::NoPeriodsInWindow)
    }
}

/// What an analysis produced. `NothingFound` is a valid terminal state, not an
/// error, and is distinct from a result whose excess is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    NothingFound,
    Analyzed(AnalysisResult),
}
