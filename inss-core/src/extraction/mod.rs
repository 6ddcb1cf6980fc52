//! Turning statement text into [`IncomeRecord`]s.
//!
//! Extraction runs in three steps: the text is cut into payer blocks by a
//! [`Segmenter`], each block's layout is detected, and the matching line
//! grammar yields one record per competence line. Lines whose amount cannot
//! be read are skipped and reported as [`ExtractionWarning`]s; they never
//! abort the document.
//!
//! # Example
//!
//! ```
//! use inss_core::Extractor;
//! use rust_decimal_macros::dec;
//!
//! let text = "\
//! Código Emp. 1 12.345.678/0001-90 ACME LTDA
//! 03/2024   1.500,00
//! 04/2024   abc
//! ";
//!
//! let extraction = Extractor::new().extract(text);
//!
//! assert_eq!(extraction.records.len(), 1);
//! assert_eq!(extraction.records[0].period(), "03/2024");
//! assert_eq!(extraction.records[0].payer_id(), "12.345.678/0001-90");
//! assert_eq!(extraction.records[0].salary(), dec!(1500.00));
//! assert_eq!(extraction.warnings.len(), 1);
//! ```

pub mod amount;
pub mod grammar;
pub mod segment;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::IncomeRecord;
use amount::parse_locale_amount;
use grammar::{LineMatch, SegmentLayout};
pub use segment::{MarkerSegmenter, STATEMENT_SEGMENT_MARKER, Segmenter};

/// Recoverable problems found while reading a statement. Each one costs at
/// most one record.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    #[error("block {segment}: competence {period} has unreadable amount '{token}'")]
    MalformedAmount {
        segment: usize,
        period: String,
        token: String,
    },

    #[error("block {segment}: competence {period} has negative amount {amount}")]
    NegativeAmount {
        segment: usize,
        period: String,
        amount: Decimal,
    },

    #[error("block {segment}: {lines} competence line(s) but no payer identifier")]
    MissingPayer { segment: usize, lines: usize },
}

/// Records read from a document together with the warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub records: Vec<IncomeRecord>,
    pub warnings: Vec<ExtractionWarning>,
    pub segments: usize,
}

impl Extraction {
    /// True when the document yielded no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Statement reader, parameterised by how the document is split into blocks.
#[derive(Debug, Clone, Default)]
pub struct Extractor<S = MarkerSegmenter> {
    segmenter: S,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Segmenter> Extractor<S> {
    pub fn with_segmenter(segmenter: S) -> Self {
        Self { segmenter }
    }

    /// Reads every record in `text`, preserving document order.
    pub fn extract(
        &self,
        text: &str,
    ) -> Extraction {
        let text = text.replace("\r\n", "\n");
        let segments = self.segmenter.segments(&text);

        let mut extraction = Extraction {
            segments: segments.len(),
            ..Extraction::default()
        };

        for (index, segment) in segments.into_iter().enumerate() {
            let layout = SegmentLayout::detect(segment);
            let before = extraction.records.len();

            match layout {
                SegmentLayout::GroupedContractors => {
                    for line in grammar::grouped_lines(segment) {
                        Self::push_line(&mut extraction, index, line, None);
                    }
                }
                SegmentLayout::Simple => {
                    let lines: Vec<LineMatch<'_>> = grammar::simple_lines(segment).collect();
                    if lines.is_empty() {
                        continue;
                    }
                    let Some(payer_id) = grammar::first_tax_id(segment) else {
                        let warning = ExtractionWarning::MissingPayer {
                            segment: index,
                            lines: lines.len(),
                        };
                        warn!(%warning, "skipping block");
                        extraction.warnings.push(warning);
                        continue;
                    };
                    for line in lines {
                        Self::push_line(&mut extraction, index, line, Some(payer_id));
                    }
                }
            }

            debug!(
                segment = index,
                ?layout,
                records = extraction.records.len() - before,
                "block extracted"
            );
        }

        debug!(
            segments = extraction.segments,
            records = extraction.records.len(),
            warnings = extraction.warnings.len(),
            "document extracted"
        );

        extraction
    }

    fn push_line(
        extraction: &mut Extraction,
        segment: usize,
        line: LineMatch<'_>,
        block_payer: Option<&str>,
    ) {
        let Some(payer_id) = line.payer_id.or(block_payer) else {
            return;
        };

        let salary = match parse_locale_amount(line.amount) {
            Ok(salary) => salary,
            Err(error) => {
                warn!(segment, period = line.period, %error, "skipping line");
                extraction.warnings.push(ExtractionWarning::MalformedAmount {
                    segment,
                    period: line.period.to_string(),
                    token: line.amount.to_string(),
                });
                return;
            }
        };

        if salary < Decimal::ZERO {
            let warning = ExtractionWarning::NegativeAmount {
                segment,
                period: line.period.to_string(),
                amount: salary,
            };
            warn!(%warning, "skipping line");
            extraction.warnings.push(warning);
            return;
        }

        extraction
            .records
            .push(IncomeRecord::new(line.period, payer_id, salary));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SIMPLE_STATEMENT: &str = "\
CNIS - Extrato Previdenciário
NIT: 123.45678.90-1
Código Emp. 1 12.345.678/0001-90 ACME COMERCIO LTDA
Competência Remuneração
01/2024 3.000,00
02/2024 3.100,50
Código Emp. 2 98.765.432/0001-10 BETA SERVICOS SA
Competência Remuneração
01/2024 7.786,02
";

    const GROUPED_STATEMENT: &str = "\
Código Emp. 3 AGRUPAMENTO DE CONTRATANTES/COOPERATIVAS
Competência Contrat. Cooperativa Remuneração
01/2024 11.111.111/0001-11 22.222.222 CONTRIBUINTE INDIVIDUAL 1.000,00
02/2024 33.333.333 CONTRIBUINTE INDIVIDUAL 2.000,00
";

    // =========================================================================
    // simple layout tests
    // =========================================================================

    #[test]
    fn simple_segment_yields_one_record() {
        let extraction = Extractor::new().extract("Código Emp. 12.345.678\n03/2024   1.500,00");

        assert_eq!(
            extraction.records,
            vec![IncomeRecord::new("03/2024", "12.345.678", dec!(1500.00))]
        );
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn simple_blocks_use_their_own_payer() {
        let extraction = Extractor::new().extract(SIMPLE_STATEMENT);

        assert_eq!(
            extraction.records,
            vec![
                IncomeRecord::new("01/2024", "12.345.678/0001-90", dec!(3000.00)),
                IncomeRecord::new("02/2024", "12.345.678/0001-90", dec!(3100.50)),
                IncomeRecord::new("01/2024", "98.765.432/0001-10", dec!(7786.02)),
            ]
        );
        assert_eq!(extraction.segments, 3);
    }

    #[test]
    fn malformed_amount_is_skipped_with_warning() {
        let text = "Código Emp. 12.345.678\n03/2024 abc\n04/2024 1.000,00";

        let extraction = Extractor::new().extract(text);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].period(), "04/2024");
        assert_eq!(
            extraction.warnings,
            vec![ExtractionWarning::MalformedAmount {
                segment: 0,
                period: "03/2024".to_string(),
                token: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn negative_amount_is_skipped_with_warning() {
        let extraction = Extractor::new().extract("Código Emp. 12.345.678\n03/2024 -10,00");

        assert!(extraction.is_empty());
        assert!(matches!(
            extraction.warnings.as_slice(),
            [ExtractionWarning::NegativeAmount { .. }]
        ));
    }

    #[test]
    fn block_without_payer_is_reported() {
        let extraction = Extractor::new().extract("Código Emp. sem identificador\n03/2024 1.000,00");

        assert!(extraction.is_empty());
        assert_eq!(
            extraction.warnings,
            vec![ExtractionWarning::MissingPayer {
                segment: 0,
                lines: 1,
            }]
        );
    }

    #[test]
    fn personal_id_in_heading_is_not_the_payer() {
        let text = "Código Emp. CPF 123.456.789-00 98.765.432/0001-10 BETA\n03/2024 1.000,00";

        let extraction = Extractor::new().extract(text);

        assert_eq!(extraction.records[0].payer_id(), "98.765.432/0001-10");
    }

    #[test]
    fn header_without_lines_is_silent() {
        let extraction = Extractor::new().extract("CNIS\nNome: FULANO\nCódigo Emp. 12.345.678\n");

        assert!(extraction.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let extraction = Extractor::new().extract("Código Emp. 12.345.678\r\n05/2023 2.000,00\r\n");

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].salary(), dec!(2000.00));
    }

    // =========================================================================
    // grouped layout tests
    // =========================================================================

    #[test]
    fn grouped_block_takes_payer_from_each_line() {
        let extraction = Extractor::new().extract(GROUPED_STATEMENT);

        assert_eq!(
            extraction.records,
            vec![
                IncomeRecord::new("01/2024", "11.111.111/0001-11", dec!(1000.00)),
                IncomeRecord::new("02/2024", "33.333.333", dec!(2000.00)),
            ]
        );
    }

    #[test]
    fn mixed_document_preserves_source_order() {
        let text = format!("{SIMPLE_STATEMENT}{GROUPED_STATEMENT}");

        let extraction = Extractor::new().extract(&text);

        let payers: Vec<_> = extraction
            .records
            .iter()
            .map(|r| r.payer_id())
            .collect();
        assert_eq!(
            payers,
            vec![
                "12.345.678/0001-90",
                "12.345.678/0001-90",
                "98.765.432/0001-10",
                "11.111.111/0001-11",
                "33.333.333",
            ]
        );
    }

    // =========================================================================
    // segmentation tests
    // =========================================================================

    struct BlankLineSegmenter;

    impl Segmenter for BlankLineSegmenter {
        fn segments<'t>(
            &self,
            text: &'t str,
        ) -> Vec<&'t str> {
            text.split("\n\n").collect()
        }
    }

    #[test]
    fn custom_segmenter_drives_block_split() {
        let text = "12.345.678\n01/2024 1.000,00\n\n98.765.432\n01/2024 2.000,00";

        let extraction = Extractor::with_segmenter(BlankLineSegmenter).extract(text);

        assert_eq!(extraction.segments, 2);
        assert_eq!(extraction.records[1].payer_id(), "98.765.432");
    }

    #[test]
    fn empty_text_has_nothing() {
        let extraction = Extractor::new().extract("");

        assert!(extraction.is_empty());
        assert_eq!(extraction.segments, 0);
    }
}
