//! Versioned contribution tables and the effective-date lookup over them.
//!
//! A [`TableRegistry`] holds tables sorted by their effective month. The table
//! applicable to a competence is the latest one whose effective month is not
//! after it; competences older than the first table have no table at all.

mod statutory;

use std::sync::LazyLock;

use tracing::debug;

use crate::models::{Period, RateTable, RateTableError};

static STATUTORY: LazyLock<TableRegistry> = LazyLock::new(statutory::registry);

/// Immutable, sorted collection of [`RateTable`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegistry {
    tables: Vec<RateTable>,
}

impl TableRegistry {
    /// Builds a registry from tables in any order.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError::DuplicateEffectiveDate`] when two tables take
    /// effect in the same month, or the first invariant violation found in any
    /// table.
    pub fn new(mut tables: Vec<RateTable>) -> Result<Self, RateTableError> {
        for table in &tables {
            table.validate()?;
        }

        tables.sort_by_key(RateTable::effective_from);

        if let Some(pair) = tables
            .windows(2)
            .find(|pair| pair[0].effective_from() == pair[1].effective_from())
        {
            return Err(RateTableError::DuplicateEffectiveDate(
                pair[0].effective_from(),
            ));
        }

        Ok(Self { tables })
    }

    /// The published tables, shared for the life of the process.
    ///
    /// ```
    /// use inss_core::{Period, TableRegistry};
    /// use rust_decimal_macros::dec;
    ///
    /// let registry = TableRegistry::statutory();
    /// let table = registry.lookup(Period::new(2023, 3).unwrap()).unwrap();
    ///
    /// assert_eq!(table.effective_from(), Period::new(2023, 1).unwrap());
    /// assert_eq!(table.ceiling(), dec!(7507.49));
    /// ```
    pub fn statutory() -> &'static TableRegistry {
        &STATUTORY
    }

    /// Table in force during `period`, or `None` when `period` predates every
    /// registered table.
    pub fn lookup(
        &self,
        period: Period,
    ) -> Option<&RateTable> {
        let idx = self
            .tables
            .partition_point(|table| table.effective_from() <= period);

        let table = idx.checked_sub(1).map(|i| &self.tables[i]);
        if table.is_none() {
            debug!(%period, "no rate table covers period");
        }
        table
    }

    /// Tables in ascending effective order.
    pub fn tables(&self) -> &[RateTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
