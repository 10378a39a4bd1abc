// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use portfolio_rebalancer_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_blob_format() {
        let err = CoreError::InvalidBlobFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid blob format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported blob version: 99");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("buffer overflow".into());
        assert_eq!(err.to_string(), "Serialization error: buffer overflow");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn storage() {
        let err = CoreError::Storage("disk full".into());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn lookup() {
        let err = CoreError::Lookup {
            provider: "MockMarket".into(),
            message: "timeout".into(),
        };
        assert_eq!(err.to_string(), "Lookup error (MockMarket): timeout");
    }

    #[test]
    fn validation() {
        let err = CoreError::Validation("Enter a valid amount to invest".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Enter a valid amount to invest"
        );
    }

    #[test]
    fn asset_not_found() {
        let err = CoreError::AssetNotFound("PETR4".into());
        assert_eq!(err.to_string(), "Asset not found: PETR4");
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn only_validation_is_user_input() {
        assert!(CoreError::Validation("x".into()).is_validation());
        assert!(!CoreError::AssetNotFound("x".into()).is_validation());
        assert!(!CoreError::Storage("x".into()).is_validation());
    }
}

// ── From conversions ────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Storage(ref m) if m.contains("permission denied")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_bincode_error() {
        let bin_err = bincode::deserialize::<String>(&[0xff]).unwrap_err();
        let err: CoreError = bin_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse(json: &str) -> Result<Vec<u32>, CoreError> {
            Ok(serde_json::from_str(json)?)
        }
        assert_eq!(parse("[1,2]").unwrap(), vec![1, 2]);
        assert!(parse("{").is_err());
    }
}
