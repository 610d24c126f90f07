use std::sync::Arc;

use tracing::{debug, warn};

use crate::bridge::WidgetReloader;
use crate::errors::CoreError;
use crate::keys;
use crate::models::snapshot::{HistoryPoint, PortfolioSnapshot, SNAPSHOT_SCHEMA_VERSION};
use crate::storage::{SharedStore, StoreOp, StoreValue};

/// App-side half of the sync contract: persists snapshots for the widget.
///
/// Flow: validate → encode history JSON → one atomic commit of every key →
/// ask the widget host to reload. Nothing reaches the store unless the whole
/// snapshot encoded, so a failed write leaves the previous snapshot in place.
pub struct SnapshotWriter {
    store: Arc<dyn SharedStore>,
    reloader: Arc<dyn WidgetReloader>,
    scope: String,
    /// `None` reloads every timeline.
    widget_kind: Option<String>,
}

impl SnapshotWriter {
    pub fn new(
        store: Arc<dyn SharedStore>,
        reloader: Arc<dyn WidgetReloader>,
        scope: impl Into<String>,
        widget_kind: Option<String>,
    ) -> Self {
        Self {
            store,
            reloader,
            scope: scope.into(),
            widget_kind,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Persist `snapshot` and signal the widget host.
    ///
    /// Returns `CoreError::Encode` if the snapshot cannot be represented on
    /// the wire, or a store error if the commit failed. A failed reload
    /// signal is logged and does not fail the write.
    pub fn write(&self, snapshot: &PortfolioSnapshot) -> Result<(), CoreError> {
        let ops = encode_snapshot(snapshot)?;
        self.store.commit(&self.scope, ops)?;
        debug!(
            scope = %self.scope,
            current_value = snapshot.current_value,
            points = snapshot.history.len(),
            "snapshot written"
        );

        if let Err(e) = self.reloader.reload_timelines(self.widget_kind.as_deref()) {
            warn!(kind = ?self.widget_kind, error = %e, "widget reload signal failed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SnapshotWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotWriter")
            .field("scope", &self.scope)
            .field("widget_kind", &self.widget_kind)
            .finish()
    }
}

/// Encode the history array exactly as it is stored under `historyData`.
pub fn encode_history(history: &[HistoryPoint]) -> Result<Vec<u8>, CoreError> {
    if history.is_empty() {
        return Err(CoreError::Encode("history must not be empty".into()));
    }
    if let Some((index, point)) = history
        .iter()
        .enumerate()
        .find(|(_, p)| !p.value.is_finite())
    {
        return Err(CoreError::Encode(format!(
            "history value at record {index} is not finite: {}",
            point.value
        )));
    }
    serde_json::to_vec(history)
        .map_err(|e| CoreError::Encode(format!("Failed to serialize history: {e}")))
}

/// Turn a snapshot into the batch of store writes that represent it.
pub(crate) fn encode_snapshot(snapshot: &PortfolioSnapshot) -> Result<Vec<StoreOp>, CoreError> {
    let scalars = [
        (keys::CURRENT_VALUE, snapshot.current_value),
        (keys::DAILY_CHANGE, snapshot.daily_change),
        (keys::DAILY_CHANGE_PERCENT, snapshot.daily_change_percent),
    ];
    if let Some((key, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
        return Err(CoreError::Encode(format!("{key} is not finite: {value}")));
    }

    let history = encode_history(&snapshot.history)?;

    let mut ops: Vec<StoreOp> = scalars
        .iter()
        .map(|(key, value)| StoreOp::set(*key, StoreValue::Double(*value)))
        .collect();
    ops.push(StoreOp::set(keys::HISTORY_DATA, StoreValue::Data(history)));
    ops.push(StoreOp::set(
        keys::SCHEMA_VERSION,
        StoreValue::Int(SNAPSHOT_SCHEMA_VERSION),
    ));
    Ok(ops)
}
