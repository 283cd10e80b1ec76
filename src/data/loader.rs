use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{
    CellValue, Columns, ENTITY_COLUMN, PERIOD_COLUMN, RATE_COLUMN, RATING_COLUMN, RateDataset,
    RateRecord, TERM_COLUMN,
};
use super::number::{DecimalSeparator, parse_decimal};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rate table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text, delimiter sniffed from the header
/// * `.tsv`          – tab separated text
/// * `.json`         – `[{ "mes": "2025-09", "razon_social": ..., ... }, ...]`
///
/// Columns the file lacks are recorded in [`RateDataset::columns`]; only
/// an unreadable file or an unparsable rate aborts the load.
pub fn load_rates(path: &Path, decimal: DecimalSeparator) -> Result<RateDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_csv(path, None, decimal)?,
        "tsv" => load_csv(path, Some(b'\t'), decimal)?,
        "json" => load_json(path, decimal)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let missing = dataset.columns.missing();
    if !missing.is_empty() {
        log::warn!("{}: missing columns {missing:?}", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of each logical column in the source, if present.
#[derive(Debug, Default)]
struct ColumnIndex {
    period: Option<usize>,
    entity: Option<usize>,
    rating: Option<usize>,
    term: Option<usize>,
    rate: Option<usize>,
}

impl ColumnIndex {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let find = |name: &str| {
            let wanted = normalize_header(name);
            headers
                .iter()
                .position(|h| normalize_header(h.as_ref()) == wanted)
        };
        ColumnIndex {
            period: find(PERIOD_COLUMN),
            entity: find(ENTITY_COLUMN),
            rating: find(RATING_COLUMN),
            term: find(TERM_COLUMN),
            rate: find(RATE_COLUMN),
        }
    }

    fn columns(&self) -> Columns {
        Columns {
            period: self.period.is_some(),
            entity: self.entity.is_some(),
            rating: self.rating.is_some(),
            term: self.term.is_some(),
            rate: self.rate.is_some(),
        }
    }
}

/// Header comparison key: trimmed, lower-case, accents folded, BOM removed.
pub(crate) fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}')
        .trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Pick `;` or tab when the header line uses them instead of commas.
pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(',') {
        b','
    } else if header.contains(';') {
        b';'
    } else if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one offer per row.
/// Extra columns are ignored.
fn load_csv(path: &Path, delimiter: Option<u8>, decimal: DecimalSeparator) -> Result<RateDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_csv(&text, delimiter, decimal)
}

pub(crate) fn parse_csv(
    text: &str,
    delimiter: Option<u8>,
    decimal: DecimalSeparator,
) -> Result<RateDataset> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(text));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        bail!("CSV file has no header row");
    }

    let index = ColumnIndex::resolve(&headers);
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // File line, counting the header as line 1.
        let line = row_no + 2;
        let record = result.with_context(|| format!("CSV line {line}"))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let rate = parse_decimal(cell(index.rate), decimal)
            .with_context(|| format!("CSV line {line}, column '{RATE_COLUMN}'"))?;

        records.push(RateRecord {
            period: non_empty(cell(index.period)),
            entity: non_empty(cell(index.entity)),
            rating: non_empty(cell(index.rating)),
            term: CellValue::guess(cell(index.term)),
            rate,
        });
    }

    Ok(RateDataset::new(records, index.columns()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented dataframe dump):
///
/// ```json
/// [
///   {
///     "mes": "2025-09",
///     "razon_social": "Banco A",
///     "ULTIMA_CALIFICACIÓN": "AAA",
///     "plazo": 30,
///     "tasa_pasiva_efectiva": 5.12
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path, decimal: DecimalSeparator) -> Result<RateDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text, decimal)
}

pub(crate) fn parse_json(text: &str, decimal: DecimalSeparator) -> Result<RateDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut keys: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    let index = ColumnIndex::resolve(&keys);

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|k| obj.get(&keys[k]))
                .map(json_to_cell)
                .unwrap_or(CellValue::Null)
        };

        let rate = match cell(index.rate) {
            CellValue::Integer(v) => Some(v as f64),
            CellValue::Float(v) => Some(v),
            CellValue::String(s) => parse_decimal(&s, decimal)
                .with_context(|| format!("Row {i}, field '{RATE_COLUMN}'"))?,
            CellValue::Null => None,
        };

        records.push(RateRecord {
            period: cell(index.period).as_text(),
            entity: cell(index.entity).as_text(),
            rating: cell(index.rating).as_text(),
            term: cell(index.term),
            rate,
        });
    }

    Ok(RateDataset::new(records, index.columns()))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => non_empty(s).map_or(CellValue::Null, CellValue::String),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::number(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}
