//! Per-period excess over the contribution ceiling, summed over a trailing
//! window.
//!
//! Aggregation is deliberately two-phase:
//!
//! 1. Every record, whatever its age, feeds the contribution total of its
//!    period. The period's excess is that total minus the ceiling
//!    contribution, floored at zero.
//! 2. Only then is the window applied. Each windowed record contributes its
//!    period's excess to the headline total, so a period with several
//!    records counts once per record there. The once-per-period sum is
//!    reported alongside as `period_excess`.
//!
//! Filtering before grouping would compare partial totals against the
//! ceiling and under-report excesses.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculations::common::non_negative;
use crate::calculations::{ContributionCalculator, ContributionError};
use crate::models::{
    AnalysisOutcome, AnalysisResult, IncomeRecord, Period, PeriodAggregate, PeriodRange,
};
use crate::registry::TableRegistry;

/// Length of the recovery window, in years.
pub const DEFAULT_WINDOW_YEARS: u32 = 5;

#[derive(Debug, Default)]
struct PeriodTotals<'r> {
    contribution: Decimal,
    records: usize,
    payers: BTreeSet<&'r str>,
}

/// Groups records by competence and computes the windowed excess.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use inss_core::{Aggregator, AnalysisOutcome, IncomeRecord, TableRegistry};
/// use rust_decimal_macros::dec;
///
/// let records = vec![
///     IncomeRecord::new("01/2024", "11.111.111", dec!(7786.02)),
///     IncomeRecord::new("01/2024", "22.222.222", dec!(7786.02)),
/// ];
/// let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
///
/// let outcome = Aggregator::new(TableRegistry::statutory())
///     .aggregate(&records, today)
///     .unwrap();
///
/// let AnalysisOutcome::Analyzed(result) = outcome else { panic!("records were found") };
/// // The period's excess, once per windowed record.
/// assert_eq!(result.total_excess, dec!(1817.72));
/// assert_eq!(result.period_excess, dec!(908.86));
/// assert_eq!(result.total_records, 2);
/// assert_eq!(result.distinct_periods, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    calculator: ContributionCalculator<'a>,
    window_years: u32,
}

impl<'a> Aggregator<'a> {
    pub fn new(registry: &'a TableRegistry) -> Self {
        Self {
            calculator: ContributionCalculator::new(registry),
            window_years: DEFAULT_WINDOW_YEARS,
        }
    }

    /// Overrides the window length (in years back from "today").
    pub fn with_window_years(
        mut self,
        years: u32,
    ) -> Self {
        self.window_years = years;
        self
    }

    /// Runs the full aggregation for `records` as of `today`.
    ///
    /// Records whose competence token is not a calendar month are dropped
    /// with a warning. If nothing usable remains the outcome is
    /// [`AnalysisOutcome::NothingFound`]; if records exist but all predate
    /// the window, the result is zero-valued with
    /// [`PeriodRange::NoPeriodsInWindow`].
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::NegativeSalary`] if any record carries a
    /// negative salary.
    pub fn aggregate(
        &self,
        records: &[IncomeRecord],
        today: NaiveDate,
    ) -> Result<AnalysisOutcome, ContributionError> {
        let parsed = Self::parse_periods(records);
        if parsed.is_empty() {
            info!(records = records.len(), "no usable records");
            return Ok(AnalysisOutcome::NothingFound);
        }

        let aggregates = self.aggregate_periods(&parsed)?;

        let window_start = Period::window_start(today, self.window_years);
        let windowed: Vec<Period> = parsed
            .iter()
            .map(|(period, _)| *period)
            .filter(|period| *period >= window_start)
            .collect();

        debug!(
            %window_start,
            all = parsed.len(),
            windowed = windowed.len(),
            "window applied"
        );

        let (Some(start), Some(end)) = (windowed.iter().min(), windowed.iter().max()) else {
            info!(%window_start, "no periods in window");
            return Ok(AnalysisOutcome::Analyzed(AnalysisResult::empty_window()));
        };

        let periods: Vec<PeriodAggregate> = aggregates
            .range(window_start..)
            .map(|(_, aggregate)| aggregate.clone())
            .collect();

        let total_excess = windowed
            .iter()
            .filter_map(|period| aggregates.get(period))
            .map(|aggregate| aggregate.excess_contribution)
            .sum::<Decimal>();

        let period_excess = periods
            .iter()
            .map(|aggregate| aggregate.excess_contribution)
            .sum::<Decimal>();

        let result = AnalysisResult {
            total_excess,
            period_excess,
            total_records: windowed.len(),
            distinct_periods: periods.len(),
            period_range: PeriodRange::Span {
                start: *start,
                end: *end,
            },
            periods,
        };

        info!(
            total_excess = %result.total_excess,
            period_excess = %result.period_excess,
            records = result.total_records,
            periods = result.distinct_periods,
            "analysis complete"
        );

        Ok(AnalysisOutcome::Analyzed(result))
    }

    /// Phase one: totals for every period present in `records`, regardless of
    /// the window. Records with unreadable competences are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::NegativeSalary`] if any record carries a
    /// negative salary.
    pub fn period_aggregates(
        &self,
        records: &[IncomeRecord],
    ) -> Result<Vec<PeriodAggregate>, ContributionError> {
        let parsed = Self::parse_periods(records);
        Ok(self.aggregate_periods(&parsed)?.into_values().collect())
    }

    fn parse_periods(records: &[IncomeRecord]) -> Vec<(Period, &IncomeRecord)> {
        records
            .iter()
            .filter_map(|record| match record.period().parse::<Period>() {
                Ok(period) => Some((period, record)),
                Err(error) => {
                    warn!(payer = record.payer_id(), %error, "discarding record");
                    None
                }
            })
            .collect()
    }

    fn aggregate_periods(
        &self,
        parsed: &[(Period, &IncomeRecord)],
    ) -> Result<BTreeMap<Period, PeriodAggregate>, ContributionError> {
        let mut totals: BTreeMap<Period, PeriodTotals<'_>> = BTreeMap::new();

        for (period, record) in parsed {
            let contribution = self
                .calculator
                .compute_contribution(record.salary(), *period)?;

            let entry = totals.entry(*period).or_default();
            entry.contribution += contribution;
            entry.records += 1;
            entry.payers.insert(record.payer_id());
        }

        Ok(totals
            .into_iter()
            .map(|(period, totals)| {
                let ceiling_contribution = self.calculator.compute_ceiling_contribution(period);
                let excess_contribution = non_negative(totals.contribution - ceiling_contribution);

                if excess_contribution > Decimal::ZERO {
                    debug!(
                        %period,
                        total = %totals.contribution,
                        ceiling = %ceiling_contribution,
                        excess = %excess_contribution,
                        "period above ceiling"
                    );
                }

                let aggregate = PeriodAggregate {
                    period,
                    total_contribution: totals.contribution,
                    ceiling_contribution,
                    excess_contribution,
                    records: totals.records,
                    payers: totals.payers.len(),
                };
                (period, aggregate)
            })
            .collect())
    }
}
