use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

use crate::errors::DecodeError;
use crate::keys;
use crate::models::snapshot::{
    sample_history, HistoryPoint, PortfolioSnapshot, DEFAULT_CURRENT_VALUE, DEFAULT_DAILY_CHANGE,
    DEFAULT_DAILY_CHANGE_PERCENT, SAMPLE_HISTORY_POINTS, SNAPSHOT_SCHEMA_VERSION,
};
use crate::models::timestamp;
use crate::storage::{SharedStore, StoreValue};

/// Widget-side half of the sync contract.
///
/// `read` never fails: every missing, mistyped or undecodable value is
/// replaced by its default, and each field falls back on its own. The reader
/// holds no mutable state, so hosts may call it concurrently.
pub struct SnapshotReader {
    store: Arc<dyn SharedStore>,
    scope: String,
    sample_points: usize,
}

/// Record shape on the wire, before timestamps are checked.
#[derive(Deserialize)]
struct RawHistoryPoint {
    timestamp: String,
    value: f64,
}

impl SnapshotReader {
    pub fn new(store: Arc<dyn SharedStore>, scope: impl Into<String>) -> Self {
        Self {
            store,
            scope: scope.into(),
            sample_points: SAMPLE_HISTORY_POINTS,
        }
    }

    /// Override how many points the fallback history has.
    pub fn with_sample_points(mut self, points: usize) -> Self {
        self.sample_points = points.max(1);
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn sample_points(&self) -> usize {
        self.sample_points
    }

    /// Assemble the current snapshot from the store.
    pub fn read(&self) -> PortfolioSnapshot {
        self.read_at(Utc::now())
    }

    /// Same as [`read`](Self::read), with any fallback history ending at `now`.
    pub fn read_at(&self, now: DateTime<Utc>) -> PortfolioSnapshot {
        self.read_at_with_rng(now, &mut rand::thread_rng())
    }

    /// Same as [`read`](Self::read), drawing fallback noise from `rng`.
    pub fn read_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> PortfolioSnapshot {
        self.read_at_with_rng(Utc::now(), rng)
    }

    pub fn read_at_with_rng<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> PortfolioSnapshot {
        self.check_schema_version();

        let current_value = self.read_double(keys::CURRENT_VALUE, DEFAULT_CURRENT_VALUE);
        let daily_change = self.read_double(keys::DAILY_CHANGE, DEFAULT_DAILY_CHANGE);
        let daily_change_percent =
            self.read_double(keys::DAILY_CHANGE_PERCENT, DEFAULT_DAILY_CHANGE_PERCENT);

        let history = self
            .read_history()
            .unwrap_or_else(|| sample_history(now, self.sample_points, rng));

        PortfolioSnapshot {
            current_value,
            daily_change,
            daily_change_percent,
            history,
        }
    }

    /// Fetch a key, treating store errors exactly like an absent key.
    fn lookup(&self, key: &str) -> Option<StoreValue> {
        match self.store.get(&self.scope, key) {
            Ok(value) => value,
            Err(e) => {
                warn!(scope = %self.scope, key, error = %e, "shared store read failed");
                None
            }
        }
    }

    fn read_double(&self, key: &str, default: f64) -> f64 {
        self.lookup(key)
            .and_then(|v| v.as_double())
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    fn read_history(&self) -> Option<Vec<HistoryPoint>> {
        let value = self.lookup(keys::HISTORY_DATA)?;
        let Some(payload) = value.as_data() else {
            warn!(found = value.type_name(), "historyData has the wrong type");
            return None;
        };
        match decode_history(payload) {
            Ok(history) => Some(history),
            Err(e) => {
                warn!(
                    error = %e,
                    raw = %String::from_utf8_lossy(payload),
                    "failed to decode history data"
                );
                None
            }
        }
    }

    fn check_schema_version(&self) {
        if let Some(version) = self.lookup(keys::SCHEMA_VERSION).and_then(|v| v.as_int()) {
            if version > SNAPSHOT_SCHEMA_VERSION {
                warn!(
                    stored = version,
                    supported = SNAPSHOT_SCHEMA_VERSION,
                    "snapshot written by a newer schema"
                );
            }
        }
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("scope", &self.scope)
            .field("sample_points", &self.sample_points)
            .finish()
    }
}

/// Decode a stored `historyData` blob.
///
/// All-or-nothing: a single record with a bad timestamp fails the whole
/// payload. An empty array is also rejected, since the widget needs at
/// least one point to draw.
pub fn decode_history(payload: &[u8]) -> Result<Vec<HistoryPoint>, DecodeError> {
    let raw: Vec<RawHistoryPoint> = serde_json::from_slice(payload)?;
    if raw.is_empty() {
        return Err(DecodeError::Malformed("history array is empty".into()));
    }

    raw.into_iter()
        .enumerate()
        .map(|(index, point)| {
            let ts = timestamp::parse_strict(&point.timestamp).ok_or_else(|| {
                DecodeError::InvalidTimestamp {
                    index,
                    value: point.timestamp.clone(),
                }
            })?;
            Ok(HistoryPoint::new(ts, point.value))
        })
        .collect()
}
