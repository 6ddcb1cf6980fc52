//! Contribution arithmetic over the versioned rate tables.
//!
//! [`ContributionCalculator`] resolves the table for a competence through a
//! [`crate::TableRegistry`] and applies its brackets progressively.

pub mod common;
pub mod contribution;

pub use contribution::{ContributionCalculator, ContributionError};
