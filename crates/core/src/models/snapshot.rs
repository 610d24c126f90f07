use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shown by the widget when `currentValue` has never been written.
pub const DEFAULT_CURRENT_VALUE: f64 = 21815.99;

/// Shown by the widget when `dailyChange` has never been written.
pub const DEFAULT_DAILY_CHANGE: f64 = 245.85;

/// Shown by the widget when `dailyChangePercent` has never been written.
pub const DEFAULT_DAILY_CHANGE_PERCENT: f64 = 1.14;

/// Number of points in the generated fallback history.
pub const SAMPLE_HISTORY_POINTS: usize = 20;

/// Bumped whenever the stored layout changes incompatibly.
pub const SNAPSHOT_SCHEMA_VERSION: i64 = 1;

/// One value in the history window.
///
/// Serialized as `{"timestamp": "2024-01-01T00:00:00.000Z", "value": 24000.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl HistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// The portfolio state shared between the live app and the widget.
///
/// Both renderers consume this type as-is. The app overwrites it on every
/// simulated tick; the widget only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub current_value: f64,

    /// Signed absolute change since the first (opening) history value.
    pub daily_change: f64,

    /// Signed percent change since the opening value. Readers trust the
    /// stored number and never recompute it.
    pub daily_change_percent: f64,

    /// Chronological, oldest first. Timestamps are not guaranteed unique.
    pub history: Vec<HistoryPoint>,
}

impl PortfolioSnapshot {
    /// Build a snapshot, deriving the daily change from the opening value
    /// `history[0]`.
    ///
    /// With an empty history or a zero opening value there is nothing to
    /// compare against, so both change fields are zero.
    pub fn from_history(current_value: f64, history: Vec<HistoryPoint>) -> Self {
        let (daily_change, daily_change_percent) = match history.first() {
            Some(open) if open.value != 0.0 => {
                let change = current_value - open.value;
                (change, change / open.value * 100.0)
            }
            _ => (0.0, 0.0),
        };
        Self {
            current_value,
            daily_change,
            daily_change_percent,
            history,
        }
    }

    /// Value of the first history point, if any.
    pub fn opening_value(&self) -> Option<f64> {
        self.history.first().map(|p| p.value)
    }

    pub fn is_positive(&self) -> bool {
        self.daily_change >= 0.0
    }

    /// The placeholder model: hardcoded scalars plus a `points`-long sample
    /// history ending at `now`.
    pub fn placeholder<R: Rng + ?Sized>(now: DateTime<Utc>, points: usize, rng: &mut R) -> Self {
        Self {
            current_value: DEFAULT_CURRENT_VALUE,
            daily_change: DEFAULT_DAILY_CHANGE,
            daily_change_percent: DEFAULT_DAILY_CHANGE_PERCENT,
            history: sample_history(now, points, rng),
        }
    }
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self::placeholder(Utc::now(), SAMPLE_HISTORY_POINTS, &mut rand::thread_rng())
    }
}

/// Generate the fallback history: hourly points over the last day, a gentle
/// upward slope with ±50 of noise.
///
/// The shape is fixed (count, spacing, ordering); only the noise varies.
pub fn sample_history<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    points: usize,
    rng: &mut R,
) -> Vec<HistoryPoint> {
    let base_time = now.trunc_subsecs(3) - Duration::hours(24);
    (0..points.max(1))
        .map(|i| {
            let value = 20_000.0 + i as f64 * 10.0 + rng.gen_range(-50.0..=50.0);
            HistoryPoint::new(base_time + Duration::hours(i as i64), value)
        })
        .collect()
}
