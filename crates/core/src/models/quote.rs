use serde::{Deserialize, Serialize};

/// A watchlist row on the live screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,

    /// Accumulated percent change, rounded to two decimals.
    pub change: f64,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: f64, change: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change,
        }
    }

    /// The watchlist the live screen starts with.
    pub fn default_watchlist() -> Vec<Quote> {
        vec![
            Quote::new("AAPL", "Apple Inc.", 178.32, 2.45),
            Quote::new("TSLA", "Tesla, Inc.", 238.45, -1.23),
            Quote::new("MSFT", "Microsoft Corporation", 338.11, 0.89),
        ]
    }
}
