use std::cmp::Ordering;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::format::{percent, round2};
use super::model::{CellValue, Columns, RateDataset};
use super::options::rating_rank;

// ---------------------------------------------------------------------------
// Display columns
// ---------------------------------------------------------------------------

/// Columns of the offers table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayColumn {
    Entity,
    Rating,
    Term,
    Rate,
}

impl DisplayColumn {
    pub const ALL: [DisplayColumn; 4] = [
        DisplayColumn::Entity,
        DisplayColumn::Rating,
        DisplayColumn::Term,
        DisplayColumn::Rate,
    ];

    /// Human-facing header.
    pub fn label(self) -> &'static str {
        match self {
            DisplayColumn::Entity => "Entidad",
            DisplayColumn::Rating => "Calificación",
            DisplayColumn::Term => "Plazo",
            DisplayColumn::Rate => "Tasa pasiva",
        }
    }

    /// The display columns whose source column exists.
    pub fn present(columns: &Columns) -> Vec<DisplayColumn> {
        DisplayColumn::ALL
            .into_iter()
            .filter(|c| match c {
                DisplayColumn::Entity => columns.entity,
                DisplayColumn::Rating => columns.rating,
                DisplayColumn::Term => columns.term,
                DisplayColumn::Rate => columns.rate,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Display rows
// ---------------------------------------------------------------------------

/// One row of the offers table.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// Position of the source row in the dataset.
    pub index: usize,
    pub entity: Option<String>,
    pub rating: Option<String>,
    pub term: CellValue,
    /// Rate rounded to two decimals; this is what the table sorts on.
    pub rate: Option<f64>,
    /// `rate` rendered as `"5.99%"`.
    pub rate_text: Option<String>,
}

impl DisplayRow {
    /// Text of one cell, `None` when the value is missing.
    pub fn cell(&self, column: DisplayColumn) -> Option<String> {
        match column {
            DisplayColumn::Entity => self.entity.clone(),
            DisplayColumn::Rating => self.rating.clone(),
            DisplayColumn::Term => self.term.as_text(),
            DisplayColumn::Rate => self.rate_text.clone(),
        }
    }
}

/// Project the rows at `indices` into display rows, in the given order.
pub fn project(dataset: &RateDataset, indices: &[usize]) -> Vec<DisplayRow> {
    indices
        .iter()
        .map(|&i| {
            let r = &dataset.records[i];
            let rate = r.rate.filter(|v| !v.is_nan()).map(round2);
            DisplayRow {
                index: i,
                entity: r.entity.clone(),
                rating: r.rating.clone(),
                term: r.term.clone(),
                rate,
                rate_text: rate.map(percent),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Table ordering. The default is rate, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: DisplayColumn,
    pub descending: bool,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey {
            column: DisplayColumn::Rate,
            descending: true,
        }
    }
}

impl SortKey {
    /// Key after clicking `column`'s header: same column flips direction,
    /// a new column starts ascending (rates start descending).
    pub fn toggled(self, column: DisplayColumn) -> Self {
        if self.column == column {
            SortKey {
                column,
                descending: !self.descending,
            }
        } else {
            SortKey {
                column,
                descending: column == DisplayColumn::Rate,
            }
        }
    }
}

/// Stable sort: equal keys keep their original row order and missing
/// values go last in both directions.
pub fn sort_rows(rows: &mut [DisplayRow], key: SortKey) {
    rows.sort_by(|a, b| {
        let ord = match key.column {
            DisplayColumn::Entity => cmp_missing_last(&a.entity, &b.entity, key.descending, |x, y| {
                x.to_lowercase().cmp(&y.to_lowercase())
            }),
            DisplayColumn::Rating => cmp_missing_last(&a.rating, &b.rating, key.descending, |x, y| {
                let rank = |r: &String| rating_rank(r).unwrap_or(usize::MAX);
                rank(x).cmp(&rank(y)).then_with(|| x.cmp(y))
            }),
            DisplayColumn::Term => {
                let a_term = (!a.term.is_null()).then_some(&a.term);
                let b_term = (!b.term.is_null()).then_some(&b.term);
                cmp_missing_last(&a_term, &b_term, key.descending, |x, y| x.cmp(y))
            }
            DisplayColumn::Rate => {
                cmp_missing_last(&a.rate, &b.rate, key.descending, |x, y| x.total_cmp(y))
            }
        };
        ord.then_with(|| a.index.cmp(&b.index))
    });
}

fn cmp_missing_last<T>(
    a: &Option<T>,
    b: &Option<T>,
    descending: bool,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = cmp(x, y);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write `rows` with the human-facing labels as header.
pub fn write_csv<W: Write>(out: W, columns: &[DisplayColumn], rows: &[DisplayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(columns.iter().map(|c| c.label()))
        .context("writing CSV header")?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|&c| row.cell(c).unwrap_or_default()))
            .with_context(|| format!("writing row for dataset index {}", row.index))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export the displayed table to a file.
pub fn export_csv(path: &Path, columns: &[DisplayColumn], rows: &[DisplayRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, columns, rows)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::RateRecord;

    fn dataset() -> RateDataset {
        let rec = |entity: &str, rating: Option<&str>, term: CellValue, rate: Option<f64>| RateRecord {
            period: Some("2025-09".into()),
            entity: Some(entity.into()),
            rating: rating.map(String::from),
            term,
            rate,
        };
        RateDataset::new(
            vec![
                rec("Banco A", Some("AA"), CellValue::Integer(90), Some(5.001)),
                rec("Banco B", Some("AAA"), CellValue::Integer(30), Some(6.5)),
                rec("Banco C", None, CellValue::Null, None),
                rec("Banco D", Some("SC"), CellValue::Integer(30), Some(4.998)),
            ],
            Columns::ALL,
        )
    }

    fn entities(rows: &[DisplayRow]) -> Vec<&str> {
        rows.iter().map(|r| r.entity.as_deref().unwrap_or("")).collect()
    }

    #[test]
    fn default_order_is_rate_descending_with_ties_in_row_order() {
        let ds = dataset();
        let mut rows = project(&ds, &[0, 1, 2, 3]);
        sort_rows(&mut rows, SortKey::default());
        // 5.001 and 4.998 both round to 5.00 and keep their order.
        assert_eq!(entities(&rows), vec!["Banco B", "Banco A", "Banco D", "Banco C"]);
        assert_eq!(rows[0].rate_text.as_deref(), Some("6.50%"));
        assert_eq!(rows[1].rate_text.as_deref(), Some("5.00%"));
    }

    #[test]
    fn rating_sorts_by_scale_with_missing_last() {
        let ds = dataset();
        let mut rows = project(&ds, &[0, 1, 2, 3]);
        sort_rows(
            &mut rows,
            SortKey {
                column: DisplayColumn::Rating,
                descending: false,
            },
        );
        assert_eq!(entities(&rows), vec!["Banco B", "Banco A", "Banco D", "Banco C"]);
    }

    #[test]
    fn term_descending_keeps_nulls_last() {
        let ds = dataset();
        let mut rows = project(&ds, &[0, 1, 2, 3]);
        sort_rows(
            &mut rows,
            SortKey {
                column: DisplayColumn::Term,
                descending: true,
            },
        );
        assert_eq!(entities(&rows), vec!["Banco A", "Banco B", "Banco D", "Banco C"]);
    }

    #[test]
    fn header_click_toggles() {
        let key = SortKey::default().toggled(DisplayColumn::Rate);
        assert!(!key.descending);
        let key = key.toggled(DisplayColumn::Entity);
        assert_eq!(key.column, DisplayColumn::Entity);
        assert!(!key.descending);
    }

    #[test]
    fn present_columns_follow_dataset() {
        let cols = Columns {
            rating: false,
            ..Columns::ALL
        };
        assert_eq!(
            DisplayColumn::present(&cols),
            vec![DisplayColumn::Entity, DisplayColumn::Term, DisplayColumn::Rate]
        );
    }

    #[test]
    fn csv_export_uses_labels() {
        let ds = dataset();
        let rows = project(&ds, &[1, 2]);
        let mut buf = Vec::new();
        write_csv(&mut buf, &DisplayColumn::ALL, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Entidad,Calificación,Plazo,Tasa pasiva\nBanco B,AAA,30,6.50%\nBanco C,,,\n"
        );
    }
}
