//! Number formatting for the presentation boundary.

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `1234.5` → `"1,234.50"`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Summary rate: `"5.20%"`, `"N/A"` when absent.
pub fn rate_kpi(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", thousands(v, 2)),
        _ => "N/A".to_string(),
    }
}

/// Entity count with thousands separators.
pub fn count_kpi(value: Option<usize>) -> String {
    match value {
        Some(n) => thousands(n as f64, 0),
        None => "N/A".to_string(),
    }
}

/// Table cell for a rate: two decimals and a percent sign, `"5.99%"`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", round2(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_integer_part() {
        assert_eq!(thousands(0.0, 2), "0.00");
        assert_eq!(thousands(5.2033, 2), "5.20");
        assert_eq!(thousands(1234.5, 2), "1,234.50");
        assert_eq!(thousands(1234567.0, 0), "1,234,567");
        assert_eq!(thousands(-98765.432, 1), "-98,765.4");
        assert_eq!(thousands(-0.001, 2), "0.00");
        assert_eq!(thousands(f64::NAN, 2), "N/A");
    }

    #[test]
    fn kpis() {
        assert_eq!(rate_kpi(Some(5.987)), "5.99%");
        assert_eq!(rate_kpi(None), "N/A");
        assert_eq!(count_kpi(Some(1500)), "1,500");
        assert_eq!(count_kpi(None), "N/A");
    }

    #[test]
    fn percent_round_trips_through_its_prefix() {
        for v in [5.123, 5.987, 4.5, 0.004, 12.345678, 100.0] {
            let text = percent(v);
            assert!(text.ends_with('%'));
            let parsed: f64 = text.trim_end_matches('%').parse().unwrap();
            assert!((parsed - round2(v)).abs() < 1e-9, "{v} -> {text}");
        }
    }
}
