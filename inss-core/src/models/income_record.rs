use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One salary line lifted from a statement. Immutable once created.
///
/// `period` is kept as the raw `MM/YYYY` token found in the document; the
/// aggregator parses it and discards records whose token is not a real month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    period: String,
    payer_id: String,
    salary: Decimal,
}

impl IncomeRecord {
    pub fn new(
        period: impl Into<String>,
        payer_id: impl Into<String>,
        salary: Decimal,
    ) -> Self {
        Self {
            period: period.into(),
            payer_id: payer_id.into(),
            salary,
        }
    }

    /// Competence token as printed, e.g. `03/2024`.
    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn payer_id(&self) -> &str {
        &self.payer_id
    }

    pub fn salary(&self) -> Decimal {
        self.salary
    }
}
