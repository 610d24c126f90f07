pub mod bridge;
pub mod config;
pub mod errors;
pub mod keys;
pub mod models;
pub mod reader;
pub mod services;
pub mod simulator;
pub mod storage;
pub mod timeline;
pub mod views;
pub mod writer;

use std::sync::Arc;

use chrono::Utc;

use bridge::{WidgetBridge, WidgetReloader};
use config::SyncConfig;
use errors::CoreError;
use reader::SnapshotReader;
use services::live_portfolio::LivePortfolio;
use services::ticker::{LiveTicker, TickerHandle};
use simulator::PriceSimulator;
use storage::SharedStore;
use timeline::{PortfolioTimelineProvider, TimelineHost};
use writer::SnapshotWriter;

/// Entry point wiring both sides of the widget sync to one shared store.
///
/// The app side gets a [`SnapshotWriter`] (or a running [`LiveTicker`]); the
/// widget side gets a [`SnapshotReader`] and a [`TimelineHost`]. The two
/// sides share nothing but the store and the config.
#[must_use]
pub struct WidgetSync {
    config: SyncConfig,
    store: Arc<dyn SharedStore>,
}

impl std::fmt::Debug for WidgetSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetSync")
            .field("app_group", &self.config.app_group)
            .field("widget_kind", &self.config.widget_kind)
            .finish()
    }
}

impl WidgetSync {
    /// Validate `config` and bind it to `store`.
    pub fn new(config: SyncConfig, store: Arc<dyn SharedStore>) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn SharedStore> {
        Arc::clone(&self.store)
    }

    // ── Widget side ─────────────────────────────────────────────────

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.store(), self.config.app_group.clone())
            .with_sample_points(self.config.sample_points)
    }

    pub fn timeline_provider(&self) -> PortfolioTimelineProvider {
        PortfolioTimelineProvider::new(self.reader())
            .with_refresh_interval(self.config.refresh_interval())
    }

    /// A widget host for the configured kind. Pass it to the app side as
    /// its reloader when both run in one process.
    pub fn timeline_host(&self) -> Arc<TimelineHost> {
        TimelineHost::new(self.config.widget_kind.clone(), self.timeline_provider())
    }

    // ── App side ────────────────────────────────────────────────────

    pub fn writer(&self, reloader: Arc<dyn WidgetReloader>) -> SnapshotWriter {
        SnapshotWriter::new(
            self.store(),
            reloader,
            self.config.app_group.clone(),
            Some(self.config.widget_kind.clone()),
        )
    }

    pub fn bridge(&self, reloader: Arc<dyn WidgetReloader>) -> WidgetBridge {
        WidgetBridge::new(self.store(), reloader)
    }

    /// Start the simulated live portfolio and mirror every tick into the
    /// store. Stops when the handle is dropped.
    pub fn start_live(&self, reloader: Arc<dyn WidgetReloader>) -> TickerHandle {
        let portfolio = LivePortfolio::new(&self.config, PriceSimulator::from_entropy(), Utc::now());
        LiveTicker::start(portfolio, self.writer(reloader), self.config.tick_period())
    }
}
