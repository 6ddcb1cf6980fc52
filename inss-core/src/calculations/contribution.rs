//! Progressive employee contribution for a single competence.
//!
//! The salary is first clamped to the table ceiling, then split across the
//! brackets in ascending order. Each bracket taxes only the slice of salary
//! that falls inside it, at its own marginal rate:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Resolve the table in force for the competence (none: contribution is 0) |
//! | 2    | Clamp the salary to the table ceiling |
//! | 3    | For each bracket, take `min(remaining, bracket width)` |
//! | 4    | Accrue `portion × rate`, subtract the portion from the remainder |
//! | 5    | Stop once nothing remains; round the sum to the currency unit |
//!
//! # Example
//!
//! ```
//! use inss_core::{ContributionCalculator, Period, TableRegistry};
//! use rust_decimal_macros::dec;
//!
//! let calculator = ContributionCalculator::new(TableRegistry::statutory());
//! let january_2024 = Period::new(2024, 1).unwrap();
//!
//! // 1412.00 × 7.5% + 1254.68 × 9% + 1333.35 × 12%
//! let contribution = calculator
//!     .compute_contribution(dec!(4000.03), january_2024)
//!     .unwrap();
//! assert_eq!(contribution, dec!(378.82));
//!
//! assert_eq!(calculator.compute_ceiling_contribution(january_2024), dec!(908.86));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::round_currency;
use crate::models::{Period, RateTable};
use crate::registry::TableRegistry;

/// Errors raised by contribution calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContributionError {
    /// Salaries are never negative; a negative input is a caller bug.
    #[error("salary must be non-negative, got {0}")]
    NegativeSalary(Decimal),
}

/// Computes contributions against the tables of a [`TableRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator<'a> {
    registry: &'a TableRegistry,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(registry: &'a TableRegistry) -> Self {
        Self { registry }
    }

    /// Contribution owed on `salary` for `period`.
    ///
    /// Competences not covered by any table contribute zero.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::NegativeSalary`] if `salary` is below zero.
    pub fn compute_contribution(
        &self,
        salary: Decimal,
        period: Period,
    ) -> Result<Decimal, ContributionError> {
        if salary < Decimal::ZERO {
            return Err(ContributionError::NegativeSalary(salary));
        }

        let Some(table) = self.registry.lookup(period) else {
            return Ok(Decimal::ZERO);
        };

        Ok(Self::apply_brackets(table, salary))
    }

    /// Largest contribution payable in `period`: the contribution on the
    /// table ceiling. Zero when no table covers the period.
    pub fn compute_ceiling_contribution(
        &self,
        period: Period,
    ) -> Decimal {
        self.registry
            .lookup(period)
            .map(|table| Self::apply_brackets(table, table.ceiling()))
            .unwrap_or(Decimal::ZERO)
    }

    /// Ceiling of the table in force for `period`, if any.
    pub fn ceiling(
        &self,
        period: Period,
    ) -> Option<Decimal> {
        self.registry.lookup(period).map(RateTable::ceiling)
    }

    fn apply_brackets(
        table: &RateTable,
        salary: Decimal,
    ) -> Decimal {
        let mut remaining = salary.min(table.ceiling());
        let mut contribution = Decimal::ZERO;

        for bracket in table.brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let portion = remaining.min(bracket.width());
            contribution += portion * bracket.rate;
            remaining -= portion;

            trace!(
                effective_from = %table.effective_from(),
                %portion,
                rate = %bracket.rate,
                "bracket applied"
            );
        }

        round_currency(contribution)
    }
}
