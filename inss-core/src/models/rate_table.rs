use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Period;

/// Smallest amount of the statement currency (one centavo).
///
/// Bracket boundaries are inclusive and one unit apart, so the width of every
/// bracket after the first is `max - min + CURRENCY_UNIT`.
pub const CURRENCY_UNIT: Decimal = dec!(0.01);

/// Violations of the rate-table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("table {0} has no brackets")]
    Empty(Period),

    #[error("table {effective_from}: first bracket starts at {min}, expected 0")]
    FirstBracketNotZero { effective_from: Period, min: Decimal },

    #[error("table {effective_from}: bracket {index} has max {max} below min {min}")]
    InvertedBracket {
        effective_from: Period,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("table {effective_from}: bracket {index} starts at {min}, expected {expected}")]
    NotContiguous {
        effective_from: Period,
        index: usize,
        min: Decimal,
        expected: Decimal,
    },

    #[error("table {effective_from}: bracket {index} rate {rate} outside (0, 1]")]
    InvalidRate {
        effective_from: Period,
        index: usize,
        rate: Decimal,
    },

    #[error("more than one table takes effect in {0}")]
    DuplicateEffectiveDate(Period),
}

/// A salary band taxed at a single marginal rate. `min` and `max` are both
/// inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub min: Decimal,
    pub max: Decimal,
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(
        min: Decimal,
        max: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { min, max, rate }
    }

    /// Amount of salary this bracket absorbs when fully used.
    pub fn width(&self) -> Decimal {
        if self.min.is_zero() {
            self.max
        } else {
            self.max - self.min + CURRENCY_UNIT
        }
    }
}

/// Progressive contribution table in force from `effective_from` until the
/// next table takes over.
///
/// ```
/// use inss_core::{Bracket, Period, RateTable};
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::new(
///     Period::new(2024, 1).unwrap(),
///     vec![
///         Bracket::new(dec!(0.00), dec!(1412.00), dec!(0.075)),
///         Bracket::new(dec!(1412.01), dec!(2666.68), dec!(0.09)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(table.ceiling(), dec!(2666.68));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    effective_from: Period,
    brackets: Vec<Bracket>,
    ceiling: Decimal,
}

impl RateTable {
    /// Builds a table, checking that brackets start at zero, are contiguous
    /// to the currency unit, and carry rates in (0, 1].
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found, scanning brackets in order.
    pub fn new(
        effective_from: Period,
        brackets: Vec<Bracket>,
    ) -> Result<Self, RateTableError> {
        let table = Self::from_trusted(effective_from, brackets);
        table.validate()?;
        Ok(table)
    }

    /// Builds a table from literal statutory data. Validity is covered by the
    /// registry tests rather than checked at runtime.
    pub(crate) fn from_trusted(
        effective_from: Period,
        brackets: Vec<Bracket>,
    ) -> Self {
        let ceiling = brackets.last().map(|b| b.max).unwrap_or(Decimal::ZERO);
        Self {
            effective_from,
            brackets,
            ceiling,
        }
    }

    pub fn effective_from(&self) -> Period {
        self.effective_from
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Highest salary subject to contribution; the top bracket's `max`.
    pub fn ceiling(&self) -> Decimal {
        self.ceiling
    }

    /// Checks every table invariant.
    pub fn validate(&self) -> Result<(), RateTableError> {
        let effective_from = self.effective_from;
        let first = self
            .brackets
            .first()
            .ok_or(RateTableError::Empty(effective_from))?;

        if !first.min.is_zero() {
            return Err(RateTableError::FirstBracketNotZero {
                effective_from,
                min: first.min,
            });
        }

        let mut expected_min = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.min != expected_min {
                return Err(RateTableError::NotContiguous {
                    effective_from,
                    index,
                    min: bracket.min,
                    expected: expected_min,
                });
            }
            if bracket.max < bracket.min {
                return Err(RateTableError::InvertedBracket {
                    effective_from,
                    index,
                    min: bracket.min,
                    max: bracket.max,
                });
            }
            if bracket.rate <= Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(RateTableError::InvalidRate {
                    effective_from,
                    index,
                    rate: bracket.rate,
                });
            }
            expected_min = bracket.max + CURRENCY_UNIT;
        }

        Ok(())
    }
}
