use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SyncConfig;
use crate::models::history::HistoryWindow;
use crate::models::quote::Quote;
use crate::models::snapshot::{HistoryPoint, PortfolioSnapshot};
use crate::simulator::PriceSimulator;

/// In-app portfolio state driven by the simulated price tick.
///
/// All mutation happens through [`tick`](Self::tick), one call at a time,
/// so the state needs no locking.
#[derive(Debug, Clone)]
pub struct LivePortfolio<R: Rng = StdRng> {
    portfolio_value: f64,
    history: HistoryWindow,
    watchlist: Vec<Quote>,
    simulator: PriceSimulator<R>,
}

impl<R: Rng> LivePortfolio<R> {
    /// Start at `config.base_portfolio_value` with a full window of
    /// generated history ending just before `now`.
    pub fn new(config: &SyncConfig, mut simulator: PriceSimulator<R>, now: DateTime<Utc>) -> Self {
        let seeded = simulator.historical_series(
            config.base_portfolio_value,
            config.history_window,
            now,
        );
        Self {
            portfolio_value: config.base_portfolio_value,
            history: HistoryWindow::from_points(config.history_window, seeded),
            watchlist: Quote::default_watchlist(),
            simulator,
        }
    }

    /// Start from explicit state.
    pub fn with_state(
        portfolio_value: f64,
        history: HistoryWindow,
        watchlist: Vec<Quote>,
        simulator: PriceSimulator<R>,
    ) -> Self {
        Self {
            portfolio_value,
            history,
            watchlist,
            simulator,
        }
    }

    /// One simulated tick: new value → state → window (drop oldest, push
    /// newest) → watchlist. Returns the snapshot to publish.
    pub fn tick(&mut self, now: DateTime<Utc>) -> PortfolioSnapshot {
        let value = self.simulator.next_price(self.portfolio_value);
        self.portfolio_value = value;
        self.history
            .push(HistoryPoint::new(now.trunc_subsecs(3), value));
        self.simulator.tick_quotes(&mut self.watchlist);
        self.snapshot()
    }

    /// Current state with the change measured from the window's opening value.
    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot::from_history(self.portfolio_value, self.history.to_vec())
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    pub fn history(&self) -> &HistoryWindow {
        &self.history
    }

    pub fn watchlist(&self) -> &[Quote] {
        &self.watchlist
    }
}
