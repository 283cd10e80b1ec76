use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a dynamically-typed cell (used for the term column)
// ---------------------------------------------------------------------------

/// A loosely-typed cell value mirroring what a dataframe would infer.
/// Terms are usually whole days but some sources use text buckets, so the
/// type has to be `Ord` across variants to produce a stable option list.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so CellValue can be sorted and deduplicated --

// Equality follows `Ord`: `Integer(30) == Float(30.0)`.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use CellValue::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            // Numbers compare by value regardless of integer/float storage.
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (String(_), _) => Ordering::Greater,
            (_, String(_)) => Ordering::Less,
        }
    }
}

// Both numeric variants hash the f64 bits they are compared by.
impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            CellValue::String(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            CellValue::Integer(i) => {
                1u8.hash(state);
                (*i as f64).to_bits().hash(state);
            }
            CellValue::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
            CellValue::Null => 0u8.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell: empty → Null, then integer,
    /// float and finally string.
    pub fn guess(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::number(f);
        }
        CellValue::String(s.to_string())
    }

    /// Numeric cell: NaN is a missing value and whole numbers are stored
    /// as `Integer`, so `30` and `30.0` end up as the same term.
    pub fn number(f: f64) -> Self {
        if f.is_nan() {
            CellValue::Null
        } else if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            CellValue::Integer(f as i64)
        } else {
            CellValue::Float(f)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text representation used when the value has to become a string
    /// (period column, entity names read from JSON numbers, ...).
    /// `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RateRecord – one row of the rate table
// ---------------------------------------------------------------------------

/// A single savings-rate offer.
///
/// Every field is optional because a source file may omit a column or
/// leave a cell blank; the pipeline degrades per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    /// Reporting period, e.g. `"2025-09"`.
    pub period: Option<String>,
    /// Name of the financial entity.
    pub entity: Option<String>,
    /// Latest credit rating of the entity.
    pub rating: Option<String>,
    /// Term of the offer, usually days.
    pub term: CellValue,
    /// Effective annual rate, as a percentage.
    pub rate: Option<f64>,
}

// ---------------------------------------------------------------------------
// Columns – which logical columns the source actually had
// ---------------------------------------------------------------------------

/// Presence flags for the logical columns of a rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub period: bool,
    pub entity: bool,
    pub rating: bool,
    pub term: bool,
    pub rate: bool,
}

impl Columns {
    pub const ALL: Columns = Columns {
        period: true,
        entity: true,
        rating: true,
        term: true,
        rate: true,
    };

    /// Source column names of the logical columns that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.period {
            out.push(PERIOD_COLUMN);
        }
        if !self.entity {
            out.push(ENTITY_COLUMN);
        }
        if !self.rating {
            out.push(RATING_COLUMN);
        }
        if !self.term {
            out.push(TERM_COLUMN);
        }
        if !self.rate {
            out.push(RATE_COLUMN);
        }
        out
    }
}

impl Default for Columns {
    fn default() -> Self {
        Columns::ALL
    }
}

pub const PERIOD_COLUMN: &str = "mes";
pub const ENTITY_COLUMN: &str = "razon_social";
pub const RATING_COLUMN: &str = "ULTIMA_CALIFICACIÓN";
pub const TERM_COLUMN: &str = "plazo";
pub const RATE_COLUMN: &str = "tasa_pasiva_efectiva";

// ---------------------------------------------------------------------------
// RateDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded rate table. Immutable once built; the UI holds it behind
/// an `Arc` and hands `&RateDataset` to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RateDataset {
    /// All rows in file order.
    pub records: Vec<RateRecord>,
    /// Which logical columns the source contained.
    pub columns: Columns,
}

impl RateDataset {
    pub fn new(records: Vec<RateRecord>, columns: Columns) -> Self {
        RateDataset { records, columns }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct reporting periods present in the table.
    pub fn periods(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.period.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_infers_types() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess(" 30 "), CellValue::Integer(30));
        assert_eq!(CellValue::guess("1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::guess("31-60"), CellValue::String("31-60".into()));
    }

    #[test]
    fn whole_floats_and_nan_are_normalised() {
        assert!(matches!(CellValue::guess("30.0"), CellValue::Integer(30)));
        assert!(matches!(CellValue::guess("NaN"), CellValue::Null));
        assert!(matches!(CellValue::number(f64::NAN), CellValue::Null));
        assert!(matches!(CellValue::number(1e30), CellValue::Float(_)));
    }

    #[test]
    fn equality_and_hash_agree_with_order() {
        use std::collections::HashSet;

        let int = CellValue::Integer(30);
        let float = CellValue::Float(30.0);
        assert_eq!(int.cmp(&float), std::cmp::Ordering::Equal);
        assert_eq!(int, float);
        assert_ne!(CellValue::Integer(0), CellValue::Null);
        assert_ne!(CellValue::Integer(30), CellValue::String("30".into()));

        let set: HashSet<CellValue> = [int.clone(), float.clone()].into_iter().collect();
        assert_eq!(set.len(), 1);
        let tree: BTreeSet<CellValue> = [int, float].into_iter().collect();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn numbers_order_by_value_across_storage() {
        let mut values = vec![
            CellValue::String("otro".into()),
            CellValue::Integer(180),
            CellValue::Float(45.5),
            CellValue::Integer(30),
            CellValue::Null,
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(30),
                CellValue::Float(45.5),
                CellValue::Integer(180),
                CellValue::String("otro".into()),
            ]
        );
    }

    #[test]
    fn periods_are_distinct_and_sorted() {
        let rec = |p: &str| RateRecord {
            period: Some(p.to_string()),
            entity: None,
            rating: None,
            term: CellValue::Null,
            rate: None,
        };
        let ds = RateDataset::new(
            vec![rec("2025-09"), rec("2025-07"), rec("2025-09")],
            Columns::ALL,
        );
        assert_eq!(ds.periods(), vec!["2025-07", "2025-09"]);
    }

    #[test]
    fn missing_lists_source_names() {
        let cols = Columns {
            rating: false,
            rate: false,
            ..Columns::ALL
        };
        assert_eq!(cols.missing(), vec![RATING_COLUMN, RATE_COLUMN]);
    }
}
