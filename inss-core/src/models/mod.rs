mod analysis_result;
mod income_record;
mod period;
mod rate_table;

pub use analysis_result::{AnalysisOutcome, AnalysisResult, PeriodAggregate, PeriodRange};
pub use income_record::IncomeRecord;
pub use period::{Period, PeriodParseError};
pub use rate_table::{Bracket, CURRENCY_UNIT, RateTable, RateTableError};
