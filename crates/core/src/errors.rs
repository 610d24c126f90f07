use thiserror::Error;

/// Unified error type for the portfolio-widget-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Only the write path ever hands one of these to a caller; the widget read
/// path absorbs every failure and substitutes fallback data.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Snapshot encode / decode ────────────────────────────────────
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // ── Shared store ────────────────────────────────────────────────
    #[error("Shared store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Widget host ─────────────────────────────────────────────────
    #[error("Widget reload failed: {0}")]
    Reload(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a stored history blob could not be turned into `HistoryPoint`s.
///
/// Decoding is all-or-nothing: one bad record fails the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("history payload is malformed: {0}")]
    Malformed(String),

    #[error("invalid date format at record {index}: {value}")]
    InvalidTimestamp { index: usize, value: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Malformed(e.to_string())
    }
}
