// ═══════════════════════════════════════════════════════════════════
// Timeline Tests — PortfolioTimelineProvider, TimelineHost
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use portfolio_widget_core::bridge::WidgetReloader;
use portfolio_widget_core::errors::CoreError;
use portfolio_widget_core::keys;
use portfolio_widget_core::models::snapshot::{
    HistoryPoint, PortfolioSnapshot, DEFAULT_CURRENT_VALUE,
};
use portfolio_widget_core::reader::SnapshotReader;
use portfolio_widget_core::storage::memory::MemoryStore;
use portfolio_widget_core::storage::{SharedStore, StoreOp, StoreValue};
use portfolio_widget_core::timeline::{
    PortfolioTimelineProvider, TimelineHost, TimelineRequest, REFRESH_INTERVAL_MINUTES,
};
use portfolio_widget_core::writer::SnapshotWriter;

const GROUP: &str = "group.bacon.data";
const KIND: &str = "PortfolioWidget";

/// Counts reads so placeholder requests can be shown not to touch the store.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
}

impl SharedStore for CountingStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<StoreValue>, CoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(scope, key)
    }

    fn commit(&self, scope: &str, ops: Vec<StoreOp>) -> Result<(), CoreError> {
        self.inner.commit(scope, ops)
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

fn snapshot(value: f64) -> PortfolioSnapshot {
    PortfolioSnapshot::from_history(value, vec![HistoryPoint::new(now(), value - 100.0)])
}

fn provider(store: Arc<dyn SharedStore>) -> PortfolioTimelineProvider {
    PortfolioTimelineProvider::new(SnapshotReader::new(store, GROUP))
}

// ═══════════════════════════════════════════════════════════════════
// Provider
// ═══════════════════════════════════════════════════════════════════

mod provider {
    use super::*;

    #[test]
    fn placeholder_never_reads_the_store() {
        let store = Arc::new(CountingStore::default());
        let p = provider(store.clone());
        let entry = p.placeholder(now());
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
        assert_eq!(entry.date, now());
        assert_eq!(entry.data.current_value, DEFAULT_CURRENT_VALUE);
        assert_eq!(entry.data.history.len(), 20);
    }

    #[test]
    fn snapshot_reads_once() {
        let store = Arc::new(CountingStore::default());
        store.inner.set(GROUP, keys::CURRENT_VALUE, StoreValue::Double(5.0)).unwrap();
        let p = provider(store.clone());
        let entry = p.snapshot(now());
        assert_eq!(entry.data.current_value, 5.0);
        // One pass over the store: schema version, three scalars, history.
        assert_eq!(store.gets.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn timeline_has_one_entry_and_fifteen_minute_bound() {
        let store = Arc::new(MemoryStore::new());
        let p = provider(store);
        let timeline = p.timeline(now());
        assert_eq!(timeline.entries.len(), 1);
        assert_eq!(timeline.entries[0].date, now());
        assert_eq!(REFRESH_INTERVAL_MINUTES, 15);
        assert_eq!(timeline.next_refresh, now() + Duration::minutes(15));
        assert!(!timeline.is_stale(now() + Duration::minutes(14)));
        assert!(timeline.is_stale(now() + Duration::minutes(15)));
    }

    #[test]
    fn custom_interval() {
        let p = provider(Arc::new(MemoryStore::new())).with_refresh_interval(Duration::minutes(5));
        assert_eq!(p.refresh_interval(), Duration::minutes(5));
        assert_eq!(p.timeline(now()).next_refresh, now() + Duration::minutes(5));
    }

    #[test]
    fn custom_interval_never_exceeds_fifteen_minutes() {
        let p = provider(Arc::new(MemoryStore::new()))
            .with_refresh_interval(Duration::minutes(1_000_000_000));
        assert_eq!(p.refresh_interval(), Duration::minutes(15));
        assert_eq!(p.timeline(now()).next_refresh, now() + Duration::minutes(15));

        let p = provider(Arc::new(MemoryStore::new())).with_refresh_interval(Duration::minutes(-5));
        assert_eq!(p.refresh_interval(), Duration::zero());
    }

    #[test]
    fn refresh_bound_saturates_at_the_end_of_time() {
        let p = provider(Arc::new(MemoryStore::new()));
        let late = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        for request in [
            TimelineRequest::Placeholder,
            TimelineRequest::Snapshot,
            TimelineRequest::Timeline,
        ] {
            let timeline = p.handle(request, late);
            assert_eq!(timeline.next_refresh, DateTime::<Utc>::MAX_UTC);
            assert_eq!(timeline.entries[0].date, late);
        }
    }

    #[test]
    fn placeholder_uses_reader_sample_size_and_request_time() {
        let store = Arc::new(CountingStore::default());
        let p = PortfolioTimelineProvider::new(
            SnapshotReader::new(store.clone(), GROUP).with_sample_points(6),
        );
        let entry = p.placeholder(now());
        assert_eq!(entry.data.history.len(), 6);
        assert_eq!(entry.data.history[0].timestamp, now() - Duration::hours(24));
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn snapshot_fallback_history_follows_request_time() {
        let p = provider(Arc::new(MemoryStore::new()));
        let entry = p.snapshot(now());
        assert_eq!(entry.data.history.len(), 20);
        assert_eq!(entry.data.history[0].timestamp, now() - Duration::hours(24));
        assert_eq!(entry.data.history[19].timestamp, now() - Duration::hours(5));
    }

    #[test]
    fn handle_dispatches_each_request_kind() {
        let store = Arc::new(CountingStore::default());
        let p = provider(store.clone());

        let placeholder = p.handle(TimelineRequest::Placeholder, now());
        assert_eq!(placeholder.entries.len(), 1);
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);

        let snap = p.handle(TimelineRequest::Snapshot, now());
        assert_eq!(snap.entries.len(), 1);
        let after_snapshot = store.gets.load(Ordering::SeqCst);
        assert!(after_snapshot > 0);

        let timeline = p.handle(TimelineRequest::Timeline, now());
        assert_eq!(timeline.next_refresh, now() + Duration::minutes(15));
        assert!(store.gets.load(Ordering::SeqCst) > after_snapshot);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Host
// ═══════════════════════════════════════════════════════════════════

mod host {
    use super::*;

    fn wired() -> (Arc<TimelineHost>, SnapshotWriter) {
        let store: Arc<dyn SharedStore> = Arc::new(MemoryStore::new());
        let host = TimelineHost::new(KIND, provider(store.clone()));
        let writer = SnapshotWriter::new(store, host.clone(), GROUP, Some(KIND.into()));
        (host, writer)
    }

    #[test]
    fn first_request_builds_timeline() {
        let (host, _writer) = wired();
        assert!(host.needs_refresh(now()));
        assert!(host.current_timeline().is_none());
        let entry = host.current_entry(now());
        assert_eq!(entry.date, now());
        assert!(!host.needs_refresh(now()));
        assert_eq!(host.kind(), KIND);
    }

    #[test]
    fn entry_is_reused_until_interval_passes() {
        let (host, _writer) = wired();
        host.current_entry(now());

        let later = now() + Duration::minutes(10);
        assert!(!host.needs_refresh(later));
        assert_eq!(host.current_entry(later).date, now());

        let stale = now() + Duration::minutes(15);
        assert!(host.needs_refresh(stale));
        assert_eq!(host.current_entry(stale).date, stale);
    }

    #[test]
    fn reload_signal_refreshes_before_interval() {
        let (host, writer) = wired();
        let first = host.current_entry(now());
        assert_eq!(first.data.current_value, DEFAULT_CURRENT_VALUE);

        writer.write(&snapshot(30_000.0)).unwrap();
        assert!(host.reload_pending());

        let soon = now() + Duration::minutes(1);
        assert!(host.needs_refresh(soon));
        let entry = host.current_entry(soon);
        assert_eq!(entry.date, soon);
        assert_eq!(entry.data.current_value, 30_000.0);
        assert!(!host.reload_pending());

        let timeline = host.current_timeline().unwrap();
        assert_eq!(timeline.next_refresh, soon + Duration::minutes(15));
    }

    #[test]
    fn reload_for_all_kinds_applies() {
        let (host, _writer) = wired();
        host.current_entry(now());
        host.reload_timelines(None).unwrap();
        assert!(host.reload_pending());
    }

    #[test]
    fn reload_for_other_kind_is_ignored() {
        let (host, _writer) = wired();
        host.current_entry(now());
        host.reload_timelines(Some("SomethingElse")).unwrap();
        assert!(!host.reload_pending());
        assert!(!host.needs_refresh(now()));
    }
}
