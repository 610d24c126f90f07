pub mod history;
pub mod quote;
pub mod snapshot;
pub mod timestamp;
