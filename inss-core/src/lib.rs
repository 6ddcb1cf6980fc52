pub mod analysis;
pub mod calculations;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod registry;

pub use analysis::{Aggregator, DEFAULT_WINDOW_YEARS};
pub use calculations::{ContributionCalculator, ContributionError};
pub use extraction::{Extraction, ExtractionWarning, Extractor};
pub use models::*;
pub use pipeline::{PipelineReport, analyze_text};
pub use registry::TableRegistry;
