// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError / DecodeError Display and From impls
// ═══════════════════════════════════════════════════════════════════

use portfolio_widget_core::errors::{CoreError, DecodeError};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn encode() {
        let err = CoreError::Encode("currentValue is not finite: NaN".into());
        assert_eq!(err.to_string(), "Encode error: currentValue is not finite: NaN");
    }

    #[test]
    fn decode_malformed() {
        let err = CoreError::Decode(DecodeError::Malformed("EOF".into()));
        assert_eq!(err.to_string(), "Decode error: history payload is malformed: EOF");
    }

    #[test]
    fn decode_timestamp() {
        let err = DecodeError::InvalidTimestamp {
            index: 3,
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "invalid date format at record 3: soon");
    }

    #[test]
    fn store_unavailable() {
        let err = CoreError::StoreUnavailable("scope name is empty".into());
        assert_eq!(err.to_string(), "Shared store unavailable: scope name is empty");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn reload() {
        let err = CoreError::Reload("host gone".into());
        assert_eq!(err.to_string(), "Widget reload failed: host gone");
    }

    #[test]
    fn invalid_config() {
        let err = CoreError::InvalidConfig("history_window must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: history_window must be at least 1"
        );
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("gone")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<f64>>("[1,").unwrap_err();
        let err: DecodeError = json_err.into();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn decode_into_core() {
        let err: CoreError = DecodeError::Malformed("x".into()).into();
        assert!(matches!(err, CoreError::Decode(DecodeError::Malformed(_))));
    }

    #[test]
    fn question_mark_propagates_decode() {
        fn decode() -> Result<(), CoreError> {
            Err(DecodeError::InvalidTimestamp {
                index: 0,
                value: String::new(),
            })?;
            Ok(())
        }
        assert!(matches!(decode(), Err(CoreError::Decode(_))));
    }
}
