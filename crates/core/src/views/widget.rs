use chrono::{DateTime, Utc};

use crate::timeline::TimelineEntry;

use super::{format_usd, normalize_series, relative_time_label};

/// Home-screen widget sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetFamily {
    Small,
    Medium,
    Large,
}

/// Line chart in unit coordinates: x and y both run `0.0..=1.0`, y up.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub points: Vec<(f64, f64)>,

    /// Height of the dashed reference line at the latest value.
    pub baseline: Option<f64>,
}

impl ChartGeometry {
    pub fn from_values(values: &[f64]) -> Self {
        let normalized = normalize_series(values);
        let step = if normalized.len() > 1 {
            1.0 / (normalized.len() - 1) as f64
        } else {
            0.0
        };
        let points = normalized
            .iter()
            .enumerate()
            .map(|(i, y)| (i as f64 * step, *y))
            .collect();
        Self {
            points,
            baseline: normalized.last().copied(),
        }
    }
}

/// Everything the widget draws for one timeline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub family: WidgetFamily,
    /// Large widgets carry a heading.
    pub title: Option<String>,
    pub headline: String,
    pub change_text: String,
    pub is_positive: bool,
    pub chart: ChartGeometry,
    pub updated_label: String,
    /// Large widgets also show the absolute update time.
    pub last_updated: Option<String>,
}

impl WidgetView {
    pub fn render(entry: &TimelineEntry, family: WidgetFamily, now: DateTime<Utc>) -> Self {
        let data = &entry.data;
        let change_text = match family {
            WidgetFamily::Small => format!("{:.2}%", data.daily_change_percent),
            WidgetFamily::Medium | WidgetFamily::Large => format!(
                "{} ({:.2}%)",
                format_usd(data.daily_change),
                data.daily_change_percent
            ),
        };
        let values: Vec<f64> = data.history.iter().map(|p| p.value).collect();
        let large = family == WidgetFamily::Large;

        Self {
            family,
            title: large.then(|| "Portfolio".to_string()),
            headline: format_usd(data.current_value),
            change_text,
            is_positive: data.is_positive(),
            chart: ChartGeometry::from_values(&values),
            updated_label: relative_time_label(entry.date, now),
            last_updated: large.then(|| format!("Last updated: {}", entry.date.format("%H:%M"))),
        }
    }
}
