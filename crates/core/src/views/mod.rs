//! View models for the two renderers.
//!
//! The live screen and the widget lay the same [`PortfolioSnapshot`] out
//! differently; neither knows about the other. Drawing is left to the
//! platform; these types carry the text and geometry it needs.
//!
//! [`PortfolioSnapshot`]: crate::models::snapshot::PortfolioSnapshot

pub mod live_screen;
pub mod widget;

use chrono::{DateTime, Utc};

/// `1234.5` → `$1,234.50`, `-245.85` → `-$245.85`.
pub fn format_usd(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (int_part, frac_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// Scale values into `0.0..=1.0` between the series min and max.
///
/// A flat series maps to all zeros rather than dividing by zero.
pub fn normalize_series(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let scale = if range > 0.0 { range } else { 1.0 };
    values.iter().map(|v| (v - min) / scale).collect()
}

/// Short relative label such as "5 min ago".
pub fn relative_time_label(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - since).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{} min ago", s / 60),
        s if s < 86_400 => format!("{} hr ago", s / 3_600),
        s if s < 2 * 86_400 => "1 day ago".to_string(),
        s => format!("{} days ago", s / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn usd_grouping() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(21815.99), "$21,815.99");
        assert_eq!(format_usd(1_234_567.8), "$1,234,567.80");
        assert_eq!(format_usd(-245.85), "-$245.85");
        assert_eq!(format_usd(-0.001), "$0.00");
    }

    #[test]
    fn normalize_flat_and_ranged() {
        assert_eq!(normalize_series(&[5.0, 5.0]), vec![0.0, 0.0]);
        assert_eq!(normalize_series(&[1.0, 3.0, 2.0]), vec![0.0, 1.0, 0.5]);
        assert!(normalize_series(&[]).is_empty());
    }

    #[test]
    fn relative_labels() {
        let now = Utc::now();
        assert_eq!(relative_time_label(now, now), "just now");
        assert_eq!(relative_time_label(now + Duration::minutes(3), now), "just now");
        assert_eq!(relative_time_label(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(relative_time_label(now - Duration::hours(2), now), "2 hr ago");
        assert_eq!(relative_time_label(now - Duration::hours(30), now), "1 day ago");
        assert_eq!(relative_time_label(now - Duration::days(3), now), "3 days ago");
    }
}
