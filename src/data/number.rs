use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// Decimal separator handling
// ---------------------------------------------------------------------------

/// Which character separates the integer and fractional parts of numbers
/// in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DecimalSeparator {
    /// Accept both `.` and `,`; the right-most one is the decimal point.
    #[default]
    Auto,
    Dot,
    Comma,
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalSeparator::Auto => write!(f, "auto"),
            DecimalSeparator::Dot => write!(f, "dot"),
            DecimalSeparator::Comma => write!(f, "comma"),
        }
    }
}

/// Parse a decimal number written with the given separator.
///
/// Returns `Ok(None)` for blank cells. The non-decimal separator is
/// treated as a thousands separator and dropped, so `1.234,5` with
/// [`DecimalSeparator::Comma`] is `1234.5`.
pub fn parse_decimal(raw: &str, sep: DecimalSeparator) -> Result<Option<f64>> {
    let s = raw.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return Ok(None);
    }

    let normalized = match resolve(s, sep) {
        DecimalSeparator::Comma => s.replace('.', "").replace(',', "."),
        _ => s.replace(',', ""),
    };

    match normalized.parse::<f64>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => bail!("'{raw}' is not a number"),
    }
}

/// Decide the effective separator for one cell under `Auto`.
fn resolve(s: &str, sep: DecimalSeparator) -> DecimalSeparator {
    if sep != DecimalSeparator::Auto {
        return sep;
    }
    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => DecimalSeparator::Comma,
        (Some(_), _) => DecimalSeparator::Dot,
        // A lone comma: "5,12" – decimal comma, unless it is clearly a
        // thousands group like "1,234,567".
        (None, Some(_)) if s.matches(',').count() == 1 => DecimalSeparator::Comma,
        _ => DecimalSeparator::Dot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_none() {
        assert_eq!(parse_decimal("  ", DecimalSeparator::Auto).unwrap(), None);
    }

    #[test]
    fn dot_and_comma_in_auto_mode() {
        let auto = DecimalSeparator::Auto;
        assert_eq!(parse_decimal("5.123", auto).unwrap(), Some(5.123));
        assert_eq!(parse_decimal("5,123", auto).unwrap(), Some(5.123));
        assert_eq!(parse_decimal("1.234,5", auto).unwrap(), Some(1234.5));
        assert_eq!(parse_decimal("1,234.5", auto).unwrap(), Some(1234.5));
        assert_eq!(parse_decimal("1,234,567", auto).unwrap(), Some(1234567.0));
    }

    #[test]
    fn explicit_separators() {
        assert_eq!(
            parse_decimal("12,75", DecimalSeparator::Comma).unwrap(),
            Some(12.75)
        );
        assert_eq!(
            parse_decimal("1,275.5", DecimalSeparator::Dot).unwrap(),
            Some(1275.5)
        );
    }

    #[test]
    fn percent_suffix_is_accepted() {
        assert_eq!(
            parse_decimal("5.99%", DecimalSeparator::Auto).unwrap(),
            Some(5.99)
        );
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_decimal("n/d", DecimalSeparator::Auto).is_err());
    }
}
