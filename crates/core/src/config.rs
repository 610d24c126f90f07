use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::timeline::REFRESH_INTERVAL_MINUTES;

/// Largest accepted live history window.
pub const MAX_HISTORY_WINDOW: usize = 10_000;

/// Largest accepted fallback history length.
pub const MAX_SAMPLE_POINTS: usize = 10_000;

/// Longest accepted tick period (one hour).
pub const MAX_TICK_PERIOD_MS: u64 = 3_600_000;

/// Settings shared by the app side and the widget side.
///
/// Both processes must agree on `app_group` and `widget_kind`, otherwise the
/// widget reads an empty container and falls back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Shared-container scope both processes read and write (e.g. "group.bacon.data").
    pub app_group: String,

    /// Timeline kind the writer asks the widget host to reload.
    pub widget_kind: String,

    /// Upper bound on how long a timeline entry stays on screen.
    pub refresh_interval_minutes: i64,

    /// Number of points kept in the live history window.
    pub history_window: usize,

    /// Period of the simulated price tick.
    pub tick_period_ms: u64,

    /// Starting value of the simulated portfolio.
    pub base_portfolio_value: f64,

    /// Number of generated points in the fallback history.
    pub sample_points: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            app_group: "group.bacon.data".to_string(),
            widget_kind: "PortfolioWidget".to_string(),
            refresh_interval_minutes: REFRESH_INTERVAL_MINUTES,
            history_window: 24,
            tick_period_ms: 3000,
            base_portfolio_value: 84521.63,
            sample_points: crate::models::snapshot::SAMPLE_HISTORY_POINTS,
        }
    }
}

impl SyncConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let config: SyncConfig = serde_json::from_str(raw)
            .map_err(|e| CoreError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.app_group.trim().is_empty() {
            return Err(CoreError::InvalidConfig("app_group must not be empty".into()));
        }
        if self.widget_kind.trim().is_empty() {
            return Err(CoreError::InvalidConfig("widget_kind must not be empty".into()));
        }
        if !(1..=REFRESH_INTERVAL_MINUTES).contains(&self.refresh_interval_minutes) {
            return Err(CoreError::InvalidConfig(format!(
                "refresh_interval_minutes must be between 1 and {REFRESH_INTERVAL_MINUTES}, got {}",
                self.refresh_interval_minutes
            )));
        }
        if !(1..=MAX_HISTORY_WINDOW).contains(&self.history_window) {
            return Err(CoreError::InvalidConfig(format!(
                "history_window must be between 1 and {MAX_HISTORY_WINDOW}, got {}",
                self.history_window
            )));
        }
        if !(1..=MAX_TICK_PERIOD_MS).contains(&self.tick_period_ms) {
            return Err(CoreError::InvalidConfig(format!(
                "tick_period_ms must be between 1 and {MAX_TICK_PERIOD_MS}, got {}",
                self.tick_period_ms
            )));
        }
        if !self.base_portfolio_value.is_finite() || self.base_portfolio_value <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "base_portfolio_value must be finite and positive, got {}",
                self.base_portfolio_value
            )));
        }
        if !(1..=MAX_SAMPLE_POINTS).contains(&self.sample_points) {
            return Err(CoreError::InvalidConfig(format!(
                "sample_points must be between 1 and {MAX_SAMPLE_POINTS}, got {}",
                self.sample_points
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.refresh_interval_minutes)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
