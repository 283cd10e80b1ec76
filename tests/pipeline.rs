use std::path::Path;

use ecuanomia::data::company::{Metric, load_companies};
use ecuanomia::data::display::DisplayColumn;
use ecuanomia::data::error::PipelineError;
use ecuanomia::data::filter::{FilterCriteria, Selection};
use ecuanomia::data::format::rate_kpi;
use ecuanomia::data::loader::load_rates;
use ecuanomia::data::model::{CellValue, RateDataset};
use ecuanomia::data::number::DecimalSeparator;
use ecuanomia::data::options::options_for_period;
use ecuanomia::data::pipeline::apply;
use pretty_assertions::assert_eq;

const PERIOD: &str = "2025-09";

fn load(name: &str) -> RateDataset {
    load_rates(&Path::new("tests/data").join(name), DecimalSeparator::Auto)
        .expect("Failed to load test data")
}

fn search(text: &str) -> FilterCriteria {
    FilterCriteria {
        search: text.to_string(),
        ..Default::default()
    }
}

#[test]
fn unfiltered_period_summary_and_order() {
    let ds = load("tasas.csv");
    let view = apply(&ds, PERIOD, &FilterCriteria::default()).unwrap();

    assert_eq!(view.rows.len(), 3);
    let summary = view.summary.clone().unwrap();
    assert!((summary.mean_rate.unwrap() - 5.203333).abs() < 1e-5);
    assert_eq!(summary.max_rate, Some(5.987));
    assert_eq!(summary.min_rate, Some(4.5));
    assert_eq!(summary.entity_count, Some(2));
    assert_eq!(rate_kpi(summary.mean_rate), "5.20%");

    let shown: Vec<(String, String)> = view
        .display
        .iter()
        .map(|r| {
            (
                r.cell(DisplayColumn::Entity).unwrap(),
                r.cell(DisplayColumn::Rate).unwrap(),
            )
        })
        .collect();
    assert_eq!(
        shown,
        vec![
            ("EntityB".to_string(), "5.99%".to_string()),
            ("EntityA".to_string(), "5.12%".to_string()),
            ("EntityA".to_string(), "4.50%".to_string()),
        ]
    );
}

#[test]
fn lowercase_search_matches_entity() {
    let ds = load("tasas.csv");
    let view = apply(&ds, PERIOD, &search("entitya")).unwrap();

    assert_eq!(view.rows.len(), 2);
    assert!(view
        .records(&ds)
        .all(|r| r.entity.as_deref() == Some("EntityA")));
    assert_eq!(view.summary.unwrap().entity_count, Some(1));
}

#[test]
fn unknown_rating_is_empty_not_an_error() {
    let ds = load("tasas.csv");
    let criteria = FilterCriteria {
        rating: Selection::Only("ZZZ".into()),
        ..Default::default()
    };
    let view = apply(&ds, PERIOD, &criteria).unwrap();

    assert!(view.is_empty());
    assert!(view.summary.is_none());
    assert_eq!(view.period_rows, 3);
}

#[test]
fn missing_period_stops_before_filtering() {
    let ds = load("tasas.csv");
    match apply(&ds, "2030-01", &search("entitya")) {
        Err(PipelineError::NoDataForPeriod { period, available }) => {
            assert_eq!(period, "2030-01");
            assert_eq!(available, vec!["2025-08".to_string(), "2025-09".to_string()]);
        }
        other => panic!("expected NoDataForPeriod, got {other:?}"),
    }
}

#[test]
fn adding_predicates_never_grows_the_result() {
    let ds = load("tasas_decimal_coma.csv");
    let options = options_for_period(&ds, PERIOD);

    for text in ["", "banco", "PICHINCHA", "coop", "zzz"] {
        for rating in &options.ratings {
            for term in &options.terms {
                let base = apply(&ds, PERIOD, &search(text)).unwrap().rows.len();
                let with_rating = FilterCriteria {
                    search: text.to_string(),
                    rating: rating.clone(),
                    term: Selection::All,
                };
                let n_rating = apply(&ds, PERIOD, &with_rating).unwrap().rows.len();
                let with_both = FilterCriteria {
                    term: term.clone(),
                    ..with_rating
                };
                let n_both = apply(&ds, PERIOD, &with_both).unwrap().rows.len();

                assert!(n_rating <= base);
                assert!(n_both <= n_rating);
            }
        }
    }
}

#[test]
fn display_is_sorted_and_stable() {
    let ds = load("tasas_decimal_coma.csv");
    let view = apply(&ds, PERIOD, &FilterCriteria::default()).unwrap();

    for pair in view.display.windows(2) {
        match (pair[0].rate, pair[1].rate) {
            (Some(a), Some(b)) => {
                assert!(a >= b);
                if a == b {
                    assert!(pair[0].index < pair[1].index);
                }
            }
            (Some(_), None) | (None, None) => {}
            (None, Some(_)) => panic!("missing rate sorted before a present one"),
        }
    }
    // Two offers at 8,00 keep file order: Andalucía before Amazonas.
    let tied: Vec<&str> = view
        .display
        .iter()
        .filter(|r| r.rate == Some(8.0))
        .filter_map(|r| r.entity.as_deref())
        .collect();
    assert_eq!(tied, vec!["Cooperativa Andalucía", "Banco Amazonas"]);
}

#[test]
fn distinct_entities_never_exceed_rows() {
    let ds = load("tasas_decimal_coma.csv");
    let view = apply(&ds, PERIOD, &FilterCriteria::default()).unwrap();
    let summary = view.summary.unwrap();

    // One row has no entity name, so the count is strictly smaller.
    assert_eq!(view.rows.len(), 7);
    assert_eq!(summary.entity_count, Some(6));
    assert_eq!(summary.max_rate, Some(9.99));
}

#[test]
fn option_lists_for_period() {
    let ds = load("tasas_decimal_coma.csv");
    let options = options_for_period(&ds, PERIOD);

    let ratings: Vec<String> = options.ratings.iter().map(|r| r.to_string()).collect();
    assert_eq!(ratings, vec!["Todos", "AAA", "AA+", "A", "A-", "BB", "SC"]);

    assert_eq!(
        options.terms,
        vec![
            Selection::All,
            Selection::Only(CellValue::Integer(30)),
            Selection::Only(CellValue::Integer(90)),
            Selection::Only(CellValue::Integer(180)),
            Selection::Only(CellValue::Integer(361)),
        ]
    );
}

#[test]
fn company_table_loads_with_decimal_comma() {
    let ds = load_companies(Path::new("tests/data/empresas.csv"), DecimalSeparator::Comma)
        .expect("Failed to load company data");

    assert_eq!(ds.companies(), vec!["Holcim Ecuador", "Corporación Favorita"]);
    assert_eq!(
        ds.points("Corporación Favorita", Metric::CostOfSales),
        vec![[2022.0, 1684.3]]
    );
    assert_eq!(ds.metrics.len(), Metric::ALL.len());
}
