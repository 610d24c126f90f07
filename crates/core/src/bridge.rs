//! The app-facing bridge surface over the shared store.
//!
//! These calls mirror what a native module exposes to the app's UI layer:
//! loose per-key writes that report success as a `bool` and never raise.
//! [`crate::writer::SnapshotWriter`] is the typed, atomic path; the bridge is
//! for ad-hoc values and for callers that already hold JSON objects.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::CoreError;
use crate::storage::{SharedStore, StoreValue, STANDARD_SCOPE};

/// Anything that can ask the widget host to recompute its timelines.
pub trait WidgetReloader: Send + Sync {
    /// Reload timelines of `kind`, or every timeline when `kind` is `None`.
    fn reload_timelines(&self, kind: Option<&str>) -> Result<(), CoreError>;
}

/// Native-module style access to the shared store and the widget host.
#[derive(Clone)]
pub struct WidgetBridge {
    store: Arc<dyn SharedStore>,
    reloader: Arc<dyn WidgetReloader>,
}

impl WidgetBridge {
    pub fn new(store: Arc<dyn SharedStore>, reloader: Arc<dyn WidgetReloader>) -> Self {
        Self { store, reloader }
    }

    /// Store an array of objects as a JSON blob. Returns `false` on failure.
    pub fn set_array(&self, key: &str, data: &[Map<String, Value>], scope: Option<&str>) -> bool {
        write_json_blob(self.store.as_ref(), key, data, scope)
    }

    /// Store one object as a JSON blob. Returns `false` on failure.
    pub fn set_object(&self, key: &str, data: &Map<String, Value>, scope: Option<&str>) -> bool {
        write_json_blob(self.store.as_ref(), key, data, scope)
    }

    pub fn set_int(&self, key: &str, value: i64, scope: Option<&str>) {
        if let Err(e) = self.store.set(resolve(scope), key, StoreValue::Int(value)) {
            warn!(key, error = %e, "set_int failed");
        }
    }

    pub fn remove(&self, key: &str, scope: Option<&str>) {
        if let Err(e) = self.store.remove(resolve(scope), key) {
            warn!(key, error = %e, "remove failed");
        }
    }

    /// Async variant of [`set_array`](Self::set_array), run on the blocking
    /// pool so file-backed stores don't stall the caller's executor.
    pub async fn store_data(
        &self,
        key: &str,
        data: Vec<Map<String, Value>>,
        scope: Option<&str>,
    ) -> bool {
        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let scope = scope.map(str::to_string);
        tokio::task::spawn_blocking(move || {
            write_json_blob(store.as_ref(), &key, &data, scope.as_deref())
        })
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "store_data task failed");
            false
        })
    }

    /// Ask the widget host to reload `timeline`, or all timelines.
    /// Fire-and-forget: failures are logged, never returned.
    pub fn reload_widget(&self, timeline: Option<&str>) {
        if let Err(e) = self.reloader.reload_timelines(timeline) {
            warn!(timeline = ?timeline, error = %e, "widget reload request failed");
        }
    }
}

impl std::fmt::Debug for WidgetBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBridge").finish_non_exhaustive()
    }
}

fn resolve(scope: Option<&str>) -> &str {
    scope.unwrap_or(STANDARD_SCOPE)
}

fn write_json_blob<T: serde::Serialize + ?Sized>(
    store: &dyn SharedStore,
    key: &str,
    data: &T,
    scope: Option<&str>,
) -> bool {
    let bytes = match serde_json::to_vec(data) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(key, error = %e, "failed to encode JSON blob");
            return false;
        }
    };
    match store.set(resolve(scope), key, StoreValue::Data(bytes)) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "failed to store JSON blob");
            false
        }
    }
}
