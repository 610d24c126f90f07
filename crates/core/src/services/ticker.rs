use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::MAX_TICK_PERIOD_MS;
use crate::models::snapshot::PortfolioSnapshot;
use crate::services::live_portfolio::LivePortfolio;
use crate::writer::SnapshotWriter;

/// Periodic price tick for the live screen.
///
/// The task owns the portfolio, so every mutation runs on one task turn at a
/// time. Each snapshot is written to the shared store and published on a
/// watch channel for the live view.
pub struct LiveTicker;

impl LiveTicker {
    /// Write the initial snapshot, then tick every `period` (first tick one
    /// period after start) until the returned handle is stopped or dropped.
    ///
    /// The initial write runs on the calling thread; every later write runs on
    /// the blocking pool. `period` is clamped to `1ms..=MAX_TICK_PERIOD_MS`.
    /// Must be called from within a tokio runtime.
    pub fn start<R>(
        mut portfolio: LivePortfolio<R>,
        writer: SnapshotWriter,
        period: Duration,
    ) -> TickerHandle
    where
        R: Rng + Send + 'static,
    {
        let period = period.clamp(
            Duration::from_millis(1),
            Duration::from_millis(MAX_TICK_PERIOD_MS),
        );
        let initial = portfolio.snapshot();
        if let Err(e) = writer.write(&initial) {
            warn!(error = %e, "initial snapshot write failed");
        }
        let (tx, rx) = watch::channel(initial);
        let writer = Arc::new(writer);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let snapshot = portfolio.tick(Utc::now());
                let job_writer = Arc::clone(&writer);
                let job_snapshot = snapshot.clone();
                match tokio::task::spawn_blocking(move || job_writer.write(&job_snapshot)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "snapshot write failed; previous snapshot kept"),
                    Err(e) => warn!(error = %e, "snapshot write task failed"),
                }
                tx.send_replace(snapshot);
            }
        });

        info!(period_ms = period.as_millis() as u64, "live ticker started");
        TickerHandle {
            task: Some(task),
            updates: rx,
        }
    }
}

/// Scoped ownership of the running tick task. Dropping it stops the task.
pub struct TickerHandle {
    task: Option<JoinHandle<()>>,
    updates: watch::Receiver<PortfolioSnapshot>,
}

impl TickerHandle {
    /// Receiver that always holds the latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PortfolioSnapshot> {
        self.updates.clone()
    }

    pub fn latest(&self) -> PortfolioSnapshot {
        self.updates.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and wait for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            info!("live ticker stopped");
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
