pub mod live_portfolio;
pub mod ticker;
