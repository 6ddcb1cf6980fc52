use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a statement amount cannot be read as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

impl ParseAmountError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Converts a Brazilian-formatted amount (`.` thousands, `,` decimals) into
/// the canonical form `Decimal` parses.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace('.', "").replace(',', ".")
}

/// Parses an amount written as `1.234,56`.
///
/// ```
/// use inss_core::extraction::amount::parse_locale_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_locale_amount("1.500,00").unwrap(), dec!(1500.00));
/// assert!(parse_locale_amount("abc").is_err());
/// ```
pub fn parse_locale_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    normalize_amount_input(s)
        .parse()
        .map_err(|source| ParseAmountError {
            input: s.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_thousands_and_decimal_comma() {
        assert_eq!(parse_locale_amount("1.234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_locale_amount("12.345.678,90").unwrap(), dec!(12345678.90));
    }

    #[test]
    fn parses_amount_without_thousands() {
        assert_eq!(parse_locale_amount("987,65").unwrap(), dec!(987.65));
    }

    #[test]
    fn parses_whole_amount() {
        assert_eq!(parse_locale_amount("1.412").unwrap(), dec!(1412));
    }

    #[test]
    fn keeps_centavo_scale() {
        assert_eq!(parse_locale_amount("1.500,00").unwrap().scale(), 2);
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_locale_amount("  2.000,10 ").unwrap(), dec!(2000.10));
    }

    #[test]
    fn rejects_letters() {
        let err = parse_locale_amount("abc").unwrap_err();

        assert_eq!(err.input(), "abc");
    }

    #[test]
    fn rejects_repeated_decimal_commas() {
        assert!(parse_locale_amount("1,000,00").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_locale_amount("").is_err());
        assert!(parse_locale_amount(".").is_err());
    }
}
