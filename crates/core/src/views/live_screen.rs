use chrono::{DateTime, Local, TimeZone};

use crate::models::quote::Quote;
use crate::models::snapshot::PortfolioSnapshot;

/// One labelled point on the live chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// `HH:MM` in the viewer's time zone.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistRow {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub is_positive: bool,
}

/// The in-app portfolio screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveScreenView {
    pub balance: String,
    pub change_text: String,
    pub is_positive: bool,
    pub chart: Vec<ChartPoint>,
    pub watchlist: Vec<WatchlistRow>,
}

impl LiveScreenView {
    /// Render with chart labels in the local time zone.
    pub fn render(snapshot: &PortfolioSnapshot, watchlist: &[Quote]) -> Self {
        Self::render_in(snapshot, watchlist, &Local)
    }

    pub fn render_in<Tz: TimeZone>(
        snapshot: &PortfolioSnapshot,
        watchlist: &[Quote],
        tz: &Tz,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let sign = if snapshot.is_positive() { "+" } else { "" };
        let chart = snapshot
            .history
            .iter()
            .map(|p| ChartPoint {
                label: local_label(&p.timestamp.with_timezone(tz)),
                value: p.value,
            })
            .collect();

        Self {
            balance: format!("${:.2}", snapshot.current_value),
            change_text: format!(
                "{sign}{:.2} ({:.2}%)",
                snapshot.daily_change, snapshot.daily_change_percent
            ),
            is_positive: snapshot.is_positive(),
            chart,
            watchlist: watchlist.iter().map(watchlist_row).collect(),
        }
    }
}

fn local_label<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%H:%M").to_string()
}

fn watchlist_row(quote: &Quote) -> WatchlistRow {
    let is_positive = quote.change > 0.0;
    let sign = if is_positive { "+" } else { "" };
    WatchlistRow {
        symbol: quote.symbol.clone(),
        name: quote.name.clone(),
        price: format!("${:.2}", quote.price),
        change: format!("{sign}{:.2}%", quote.change),
        is_positive,
    }
}
