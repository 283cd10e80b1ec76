use std::path::PathBuf;

use clap::Parser;

use crate::data::number::DecimalSeparator;

/// Savings-rate and company financials dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "ecuanomia", version, about)]
pub struct Cli {
    /// Rate table (CSV, TSV or JSON records)
    #[arg(long, default_value = "tasas_2024_forward.csv")]
    pub rates: PathBuf,

    /// Company financial statements table
    #[arg(long, default_value = "Ecuanomia - test.csv")]
    pub companies: PathBuf,

    /// Reporting period shown in the rates view (YYYY-MM)
    #[arg(long, default_value = "2025-09")]
    pub period: String,

    /// Decimal separator used in the rate table
    #[arg(long, value_enum, default_value_t = DecimalSeparator::Auto)]
    pub decimal: DecimalSeparator,

    /// Decimal separator used in the company table
    #[arg(long, value_enum, default_value_t = DecimalSeparator::Comma)]
    pub company_decimal: DecimalSeparator,
}

impl Default for Cli {
    fn default() -> Self {
        Cli::parse_from(["ecuanomia"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::default();
        assert_eq!(cli.period, "2025-09");
        assert_eq!(cli.decimal, DecimalSeparator::Auto);
        assert_eq!(cli.company_decimal, DecimalSeparator::Comma);
        assert_eq!(cli.rates, PathBuf::from("tasas_2024_forward.csv"));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "ecuanomia",
            "--rates",
            "data/tasas.json",
            "--period",
            "2025-08",
            "--decimal",
            "comma",
        ]);
        assert_eq!(cli.rates, PathBuf::from("data/tasas.json"));
        assert_eq!(cli.period, "2025-08");
        assert_eq!(cli.decimal, DecimalSeparator::Comma);
    }
}
