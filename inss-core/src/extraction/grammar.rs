//! Line grammar of the contribution statement.
//!
//! Two block layouts exist. Ordinary employer blocks list one competence and
//! amount per line and name the payer once, in the block heading. Blocks of
//! grouped contractors/cooperatives carry the payer on every line:
//!
//! ```text
//! 01/2024  12.345.678/0001-90  98.765.432  PRESTADOR  2.000,00
//! ```
//!
//! Amounts are captured as raw tokens; deciding whether a token is a valid
//! amount is left to the caller so malformed lines can be reported.

use std::sync::LazyLock;

use regex::Regex;

/// Tax identifier: a bare base (`12.345.678`) or with branch and check
/// digits (`12.345.678/0001-90`).
pub const TAX_ID_PATTERN: &str = r"\d{2}\.\d{3}\.\d{3}(?:/\d{4}-\d{2})?";

/// Phrase identifying a grouped contractors/cooperatives block.
pub const GROUPED_CONTRACTORS_MARKER: &str = "AGRUPAMENTO DE CONTRATANTES/COOPERATIVAS";

// Must not start inside a longer number, so a CPF (`123.456.789-00`) in the
// block heading is never read as a payer.
static TAX_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:^|[^\d.])(?P<id>{TAX_ID_PATTERN})\b")).expect("valid regex")
});

static SIMPLE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<period>\d{2}/\d{4})\s+(?P<amount>\S+)[ \t]*$").expect("valid regex")
});

static GROUPED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^(?P<period>\d{{2}}/\d{{4}})\s+(?P<payer>{TAX_ID_PATTERN})(?:\s+{TAX_ID_PATTERN})?\s+.*?\s+(?P<amount>\S+)[ \t]*$"
    ))
    .expect("valid regex")
});

/// Structural variant of a payer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentLayout {
    Simple,
    GroupedContractors,
}

impl SegmentLayout {
    pub fn detect(segment: &str) -> Self {
        if segment.contains(GROUPED_CONTRACTORS_MARKER) {
            Self::GroupedContractors
        } else {
            Self::Simple
        }
    }
}

/// One competence line matched by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'t> {
    pub period: &'t str,
    /// Payer printed on the line itself; only grouped blocks have one.
    pub payer_id: Option<&'t str>,
    pub amount: &'t str,
}

/// First tax identifier appearing anywhere in `segment`.
pub fn first_tax_id(segment: &str) -> Option<&str> {
    TAX_ID_RE
        .captures(segment)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Competence lines of an ordinary block, in document order.
pub fn simple_lines(segment: &str) -> impl Iterator<Item = LineMatch<'_>> {
    SIMPLE_LINE_RE.captures_iter(segment).filter_map(|caps| {
        Some(LineMatch {
            period: caps.name("period")?.as_str(),
            payer_id: None,
            amount: caps.name("amount")?.as_str(),
        })
    })
}

/// Competence lines of a grouped contractors block, in document order.
/// Only the first tax identifier on each line is kept.
pub fn grouped_lines(segment: &str) -> impl Iterator<Item = LineMatch<'_>> {
    GROUPED_LINE_RE.captures_iter(segment).filter_map(|caps| {
        Some(LineMatch {
            period: caps.name("period")?.as_str(),
            payer_id: Some(caps.name("payer")?.as_str()),
            amount: caps.name("amount")?.as_str(),
        })
    })
}
