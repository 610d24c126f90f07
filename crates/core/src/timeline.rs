//! Widget-host scheduling: which model the widget shows and for how long.
//!
//! The host drives everything. It asks for a placeholder before any data
//! exists, a one-off snapshot for previews, or a timeline. A timeline holds
//! one entry stamped "now" and a `next_refresh` no later than
//! [`REFRESH_INTERVAL_MINUTES`] away; a reload signal from the app cuts that short.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::bridge::WidgetReloader;
use crate::errors::CoreError;
use crate::models::snapshot::PortfolioSnapshot;
use crate::reader::SnapshotReader;

/// Maximum lifetime of a timeline entry without an explicit reload.
pub const REFRESH_INTERVAL_MINUTES: i64 = 15;

/// The three request kinds a widget host issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineRequest {
    Placeholder,
    Snapshot,
    Timeline,
}

/// One rendered state handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub data: PortfolioSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,

    /// The host must not re-request a timeline before this instant unless a
    /// reload signal arrives.
    pub next_refresh: DateTime<Utc>,
}

impl Timeline {
    pub fn latest(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_refresh
    }
}

/// Answers host requests from the shared store.
pub struct PortfolioTimelineProvider {
    reader: SnapshotReader,
    refresh_interval: Duration,
}

impl PortfolioTimelineProvider {
    pub fn new(reader: SnapshotReader) -> Self {
        Self {
            reader,
            refresh_interval: Duration::minutes(REFRESH_INTERVAL_MINUTES),
        }
    }

    /// Override the refresh bound. Clamped to `0..=REFRESH_INTERVAL_MINUTES`.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval =
            interval.clamp(Duration::zero(), Duration::minutes(REFRESH_INTERVAL_MINUTES));
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Static default model. Never touches the store.
    pub fn placeholder(&self, now: DateTime<Utc>) -> TimelineEntry {
        TimelineEntry {
            date: now,
            data: PortfolioSnapshot::placeholder(
                now,
                self.reader.sample_points(),
                &mut rand::thread_rng(),
            ),
        }
    }

    /// One read, returned immediately.
    pub fn snapshot(&self, now: DateTime<Utc>) -> TimelineEntry {
        TimelineEntry {
            date: now,
            data: self.reader.read_at(now),
        }
    }

    /// One read, valid until `now + refresh_interval`.
    pub fn timeline(&self, now: DateTime<Utc>) -> Timeline {
        Timeline {
            entries: vec![self.snapshot(now)],
            next_refresh: self.next_refresh(now),
        }
    }

    /// `now + refresh_interval`, saturating at the latest representable instant.
    fn next_refresh(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.refresh_interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Dispatch a host request. Placeholder and snapshot requests produce a
    /// timeline with a single entry and the usual refresh bound.
    pub fn handle(&self, request: TimelineRequest, now: DateTime<Utc>) -> Timeline {
        match request {
            TimelineRequest::Placeholder => Timeline {
                entries: vec![self.placeholder(now)],
                next_refresh: self.next_refresh(now),
            },
            TimelineRequest::Snapshot => Timeline {
                entries: vec![self.snapshot(now)],
                next_refresh: self.next_refresh(now),
            },
            TimelineRequest::Timeline => self.timeline(now),
        }
    }
}

#[derive(Debug, Default)]
struct HostState {
    current: Option<Timeline>,
    reload_requested: bool,
}

/// In-process model of the widget host.
///
/// Keeps the last timeline and re-requests one when none is cached, when the
/// app signalled a reload for this kind, or when `next_refresh` has passed,
/// whichever happens first.
pub struct TimelineHost {
    kind: String,
    provider: PortfolioTimelineProvider,
    state: Mutex<HostState>,
}

impl TimelineHost {
    pub fn new(kind: impl Into<String>, provider: PortfolioTimelineProvider) -> Arc<Self> {
        Arc::new(Self {
            kind: kind.into(),
            provider,
            state: Mutex::new(HostState::default()),
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn provider(&self) -> &PortfolioTimelineProvider {
        &self.provider
    }

    pub fn reload_pending(&self) -> bool {
        self.lock_state().reload_requested
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        let state = self.lock_state();
        match &state.current {
            None => true,
            Some(timeline) => state.reload_requested || timeline.is_stale(now),
        }
    }

    /// The entry the widget should show at `now`, refreshing if due.
    pub fn current_entry(&self, now: DateTime<Utc>) -> TimelineEntry {
        let mut state = self.lock_state();
        let due = match &state.current {
            None => true,
            Some(timeline) => state.reload_requested || timeline.is_stale(now),
        };
        if due {
            debug!(kind = %self.kind, reload = state.reload_requested, "requesting timeline");
            state.current = Some(self.provider.timeline(now));
            state.reload_requested = false;
        }
        match state.current.as_ref().and_then(Timeline::latest) {
            Some(entry) => entry.clone(),
            None => self.provider.placeholder(now),
        }
    }

    /// The timeline currently on screen, if any.
    pub fn current_timeline(&self) -> Option<Timeline> {
        self.lock_state().current.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HostState> {
        // State is plain data; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WidgetReloader for TimelineHost {
    fn reload_timelines(&self, kind: Option<&str>) -> Result<(), CoreError> {
        match kind {
            Some(kind) if kind != self.kind => {
                debug!(requested = kind, host = %self.kind, "reload for another widget kind ignored");
            }
            _ => self.lock_state().reload_requested = true,
        }
        Ok(())
    }
}

impl std::fmt::Debug for TimelineHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineHost")
            .field("kind", &self.kind)
            .field("reload_pending", &self.reload_pending())
            .finish()
    }
}
