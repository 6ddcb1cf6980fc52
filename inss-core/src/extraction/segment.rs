//! Splitting a statement into per-payer blocks.
//!
//! The split is the only part of extraction tied to the statement template.
//! Alternative layouts plug in through [`Segmenter`] without touching the
//! line grammar or the contribution math.

/// Heading that opens every payer block in the statement.
pub const STATEMENT_SEGMENT_MARKER: &str = "Código Emp.";

/// Cuts document text into candidate payer blocks, in document order.
pub trait Segmenter {
    fn segments<'t>(
        &self,
        text: &'t str,
    ) -> Vec<&'t str>;
}

/// Splits on every occurrence of a fixed heading and trims each piece.
/// Blank pieces are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSegmenter {
    marker: String,
}

impl MarkerSegmenter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerSegmenter {
    fn default() -> Self {
        Self::new(STATEMENT_SEGMENT_MARKER)
    }
}

impl Segmenter for MarkerSegmenter {
    fn segments<'t>(
        &self,
        text: &'t str,
    ) -> Vec<&'t str> {
        if self.marker.is_empty() {
            return vec![text.trim()];
        }
        text.split(self.marker.as_str())
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}
