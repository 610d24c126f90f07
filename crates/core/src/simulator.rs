use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::quote::Quote;
use crate::models::snapshot::HistoryPoint;

/// Largest move per tick, as a fraction of the current price (0.2%).
const MAX_TICK_CHANGE: f64 = 0.002;

/// Per-step noise of the seeded history.
const HISTORY_VOLATILITY: f64 = 0.05;

/// Per-step drift of the seeded history.
const HISTORY_TREND: f64 = 0.01;

/// Spacing of the seeded history.
const HISTORY_STEP_MINUTES: i64 = 30;

/// Random-walk price source for the live screen.
///
/// Generic over the RNG so tests can run it from a fixed seed.
#[derive(Debug, Clone)]
pub struct PriceSimulator<R: Rng = StdRng> {
    rng: R,
}

impl PriceSimulator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PriceSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Move `base` by at most ±0.1% and round to cents.
    pub fn next_price(&mut self, base: f64) -> f64 {
        let max_change = base * MAX_TICK_CHANGE;
        let change = (self.rng.gen::<f64>() - 0.5) * max_change;
        round_to(base + change, 2)
    }

    /// `points` values at 30-minute spacing, the last one 30 minutes before
    /// `now`, walking up from `base`.
    pub fn historical_series(
        &mut self,
        base: f64,
        points: usize,
        now: DateTime<Utc>,
    ) -> Vec<HistoryPoint> {
        let now = now.trunc_subsecs(3);
        let mut value = base;
        (0..points)
            .map(|index| {
                let steps_back = (points - index) as i64;
                let timestamp = now - Duration::minutes(steps_back * HISTORY_STEP_MINUTES);
                let noise = (self.rng.gen::<f64>() - 0.5) * 2.0 * HISTORY_VOLATILITY;
                value *= 1.0 + noise + HISTORY_TREND;
                HistoryPoint::new(timestamp, value)
            })
            .collect()
    }

    /// Move every quote and accumulate its percent change.
    pub fn tick_quotes(&mut self, quotes: &mut [Quote]) {
        for quote in quotes.iter_mut() {
            let new_price = self.next_price(quote.price);
            let price_change = if quote.price != 0.0 {
                (new_price - quote.price) / quote.price * 100.0
            } else {
                0.0
            };
            quote.price = new_price;
            quote.change = round_to(quote.change + price_change, 2);
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_cents() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(-2.344, 2), -2.34);
    }

    #[test]
    fn next_price_stays_within_band() {
        let mut sim = PriceSimulator::seeded(7);
        for _ in 0..1000 {
            let p = sim.next_price(10_000.0);
            assert!((p - 10_000.0).abs() <= 10.0 + 0.005, "moved too far: {p}");
        }
    }
}
