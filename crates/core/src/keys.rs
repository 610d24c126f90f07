//! Key names inside the shared container. Both processes must agree on these.

pub const CURRENT_VALUE: &str = "currentValue";
pub const DAILY_CHANGE: &str = "dailyChange";
pub const DAILY_CHANGE_PERCENT: &str = "dailyChangePercent";
pub const HISTORY_DATA: &str = "historyData";
pub const SCHEMA_VERSION: &str = "schemaVersion";
