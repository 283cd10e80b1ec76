use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::loader::{normalize_header, sniff_delimiter};
use super::model::CellValue;
use super::number::{DecimalSeparator, parse_decimal};

// ---------------------------------------------------------------------------
// Metrics of a company financial statement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Revenue,
    NetIncome,
    GrossMargin,
    NetMargin,
    CostOfSales,
    RevenueGrowth,
    CostGrowth,
    SharePrice,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Revenue,
        Metric::NetIncome,
        Metric::GrossMargin,
        Metric::NetMargin,
        Metric::CostOfSales,
        Metric::RevenueGrowth,
        Metric::CostGrowth,
        Metric::SharePrice,
    ];

    /// Column name in the source file; also used as legend label.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Revenue => "Ingresos",
            Metric::NetIncome => "Utilidad Neta",
            Metric::GrossMargin => "Margen Bruto %",
            Metric::NetMargin => "Margen Neto %",
            Metric::CostOfSales => "Costo de Ventas",
            Metric::RevenueGrowth => "Crecimiento de Anual de Ingresos %",
            Metric::CostGrowth => "Crecimiento de Costos %",
            Metric::SharePrice => "Precio Acción",
        }
    }
}

pub const COMPANY_COLUMN: &str = "Empresa";
pub const YEAR_COLUMN: &str = "Año";

// ---------------------------------------------------------------------------
// CompanyDataset
// ---------------------------------------------------------------------------

/// One company-year of financial statements.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub company: String,
    pub year: i32,
    /// Only the metrics with a value in this row.
    pub values: BTreeMap<Metric, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyDataset {
    pub records: Vec<CompanyRecord>,
    /// Metrics whose column exists in the source.
    pub metrics: BTreeSet<Metric>,
}

impl CompanyDataset {
    /// Distinct company names in first-seen order.
    pub fn companies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for rec in &self.records {
            if !out.contains(&rec.company.as_str()) {
                out.push(&rec.company);
            }
        }
        out
    }

    /// `(year, value)` points of one metric for one company, by year.
    pub fn points(&self, company: &str, metric: Metric) -> Vec<[f64; 2]> {
        let mut pts: Vec<[f64; 2]> = self
            .records
            .iter()
            .filter(|r| r.company == company)
            .filter_map(|r| r.values.get(&metric).map(|&v| [f64::from(r.year), v]))
            .collect();
        pts.sort_by(|a, b| a[0].total_cmp(&b[0]));
        pts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bars,
    Lines,
}

/// How the y axis of a chart is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YRange {
    Auto,
    /// `[0, 1.10 × max]` of the given metric.
    FromZero(Metric),
    /// `[min − 40 %, max + 5 %]` of the given metric.
    Padded(Metric),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub kind: ChartKind,
    pub metrics: &'static [Metric],
    pub y_range: YRange,
}

/// The company page, top to bottom.
pub const CHARTS: [ChartSpec; 6] = [
    ChartSpec {
        title: "Ingresos (en millones de dólares)",
        kind: ChartKind::Bars,
        metrics: &[Metric::Revenue],
        y_range: YRange::Auto,
    },
    ChartSpec {
        title: "Utilidad Neta (en millones de dólares)",
        kind: ChartKind::Bars,
        metrics: &[Metric::NetIncome],
        y_range: YRange::Auto,
    },
    ChartSpec {
        title: "Utilidad (%)",
        kind: ChartKind::Lines,
        metrics: &[Metric::GrossMargin, Metric::NetMargin],
        y_range: YRange::FromZero(Metric::GrossMargin),
    },
    ChartSpec {
        title: "Costos (en millones de dólares)",
        kind: ChartKind::Bars,
        metrics: &[Metric::CostOfSales],
        y_range: YRange::Auto,
    },
    ChartSpec {
        title: "Cambio Anual de Ingresos y Costos",
        kind: ChartKind::Lines,
        metrics: &[Metric::RevenueGrowth, Metric::CostGrowth],
        y_range: YRange::Auto,
    },
    ChartSpec {
        title: "Precio de Acción ($)",
        kind: ChartKind::Lines,
        metrics: &[Metric::SharePrice],
        y_range: YRange::Padded(Metric::SharePrice),
    },
];

impl ChartSpec {
    /// Fixed y bounds for `company`, `None` to let the plot auto-fit.
    pub fn y_bounds(&self, dataset: &CompanyDataset, company: &str) -> Option<(f64, f64)> {
        match self.y_range {
            YRange::Auto => None,
            YRange::FromZero(metric) => from_zero_range(&metric_values(dataset, company, metric)),
            YRange::Padded(metric) => padded_range(&metric_values(dataset, company, metric)),
        }
    }
}

fn metric_values(dataset: &CompanyDataset, company: &str, metric: Metric) -> Vec<f64> {
    dataset
        .points(company, metric)
        .into_iter()
        .map(|[_, v]| v)
        .collect()
}

/// `[0, 1.10 × max]`; `None` for an empty series.
pub fn from_zero_range(values: &[f64]) -> Option<(f64, f64)> {
    let max = values.iter().copied().reduce(f64::max)?;
    Some((0.0, max * 1.10))
}

/// `[min − 0.4·min, max + 0.05·max]`; `None` for an empty series.
pub fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some((min - min * 0.4, max + max * 0.05))
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load a company financials table. The company and year columns are
/// required; metric columns are optional.
pub fn load_companies(path: &Path, decimal: DecimalSeparator) -> Result<CompanyDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let dataset = parse_companies(&text, decimal)?;
    log::info!(
        "Loaded {} company rows ({} companies) from {}",
        dataset.len(),
        dataset.companies().len(),
        path.display()
    );
    Ok(dataset)
}

pub(crate) fn parse_companies(text: &str, decimal: DecimalSeparator) -> Result<CompanyDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_header)
        .collect();
    let position = |name: &str| headers.iter().position(|h| *h == normalize_header(name));

    let company_idx = position(COMPANY_COLUMN)
        .with_context(|| format!("CSV missing '{COMPANY_COLUMN}' column"))?;
    let year_idx = position(YEAR_COLUMN)
        .with_context(|| format!("CSV missing '{YEAR_COLUMN}' column"))?;
    let metric_idx: Vec<(Metric, usize)> = Metric::ALL
        .into_iter()
        .filter_map(|m| position(m.column()).map(|i| (m, i)))
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let line = row_no + 2;
        let record = result.with_context(|| format!("CSV line {line}"))?;
        let company = record.get(company_idx).unwrap_or("").trim();
        if company.is_empty() {
            log::warn!("CSV line {line}: no company name, skipped");
            continue;
        }

        let raw_year = record.get(year_idx).unwrap_or("");
        let year = match CellValue::guess(raw_year) {
            CellValue::Integer(y) => i32::try_from(y)
                .with_context(|| format!("CSV line {line}: year {y} out of range"))?,
            _ => bail!("CSV line {line}: '{raw_year}' is not a year"),
        };

        let mut values = BTreeMap::new();
        for &(metric, idx) in &metric_idx {
            let raw = record.get(idx).unwrap_or("");
            let value = parse_decimal(raw, decimal)
                .with_context(|| format!("CSV line {line}, column '{}'", metric.column()))?;
            if let Some(v) = value {
                values.insert(metric, v);
            }
        }

        records.push(CompanyRecord {
            company: company.to_string(),
            year,
            values,
        });
    }

    Ok(CompanyDataset {
        records,
        metrics: metric_idx.into_iter().map(|(m, _)| m).collect(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = "\
Empresa;Año;Ingresos;Utilidad Neta;Margen Bruto %;Margen Neto %;Precio Acción
Holcim;2022;480,5;60,1;35,0;12,5;95,0
Holcim;2021;450,0;55,2;40,0;12,3;80,0
Favorita;2021;2.100,0;120,0;25,0;5,7;
";

    #[test]
    fn parses_decimal_comma_table() {
        let ds = parse_companies(SAMPLE, DecimalSeparator::Comma).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.companies(), vec!["Holcim", "Favorita"]);
        assert!(ds.metrics.contains(&Metric::SharePrice));
        assert!(!ds.metrics.contains(&Metric::CostOfSales));
        assert_eq!(ds.records[2].values.get(&Metric::Revenue), Some(&2100.0));
        assert_eq!(ds.records[2].values.get(&Metric::SharePrice), None);
    }

    #[test]
    fn points_are_sorted_by_year() {
        let ds = parse_companies(SAMPLE, DecimalSeparator::Comma).unwrap();
        assert_eq!(
            ds.points("Holcim", Metric::Revenue),
            vec![[2021.0, 450.0], [2022.0, 480.5]]
        );
        assert!(ds.points("Favorita", Metric::SharePrice).is_empty());
    }

    #[test]
    fn chart_ranges() {
        let ds = parse_companies(SAMPLE, DecimalSeparator::Comma).unwrap();
        let margins = &CHARTS[2];
        let (lo, hi) = margins.y_bounds(&ds, "Holcim").unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 44.0).abs() < 1e-9);

        let price = &CHARTS[5];
        let (lo, hi) = price.y_bounds(&ds, "Holcim").unwrap();
        assert!((lo - 48.0).abs() < 1e-9);
        assert!((hi - 99.75).abs() < 1e-9);
        assert_eq!(price.y_bounds(&ds, "Favorita"), None);
        assert_eq!(CHARTS[0].y_bounds(&ds, "Holcim"), None);
    }

    #[test]
    fn company_and_year_are_required() {
        let err = parse_companies("Ingresos\n1,0\n", DecimalSeparator::Comma).unwrap_err();
        assert!(err.to_string().contains("Empresa"));
    }

    #[test]
    fn bad_year_is_reported() {
        let err = parse_companies("Empresa;Año\nX;dos mil\n", DecimalSeparator::Comma).unwrap_err();
        assert!(err.to_string().contains("is not a year"));
        assert!(err.to_string().contains("CSV line 2"));
    }

    #[test]
    fn whole_float_year_is_accepted_and_huge_year_rejected() {
        let ds = parse_companies("Empresa;Año;Ingresos
X;2024.0;1,0
", DecimalSeparator::Comma)
            .unwrap();
        assert_eq!(ds.records[0].year, 2024);

        let err = parse_companies("Empresa;Año
X;1e12
", DecimalSeparator::Comma).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
