// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use gold_replay_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn http() {
        let err = CoreError::Http {
            status: 503,
            url: "https://example.com/table".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com/table");
    }

    #[test]
    fn no_data() {
        let err = CoreError::no_data("FRED");
        assert_eq!(err.to_string(), "No data returned by FRED");
    }

    #[test]
    fn no_provider() {
        assert_eq!(CoreError::NoProvider.to_string(), "No data source registered");
    }

    #[test]
    fn parse() {
        let err = CoreError::Parse("row 3: bad date".into());
        assert_eq!(err.to_string(), "Parse error: row 3: bad date");
    }

    #[test]
    fn file_not_found() {
        let err = CoreError::FileNotFound("gold_yahoo_gc_f.csv".into());
        assert_eq!(err.to_string(), "File not found: gold_yahoo_gc_f.csv");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn animation() {
        let err = CoreError::Animation("expected frame 2, got 5".into());
        assert_eq!(err.to_string(), "Animation error: expected frame 2, got 5");
    }

    #[test]
    fn render() {
        let err = CoreError::Render("font missing".into());
        assert_eq!(err.to_string(), "Render error: font missing");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("denied")));
    }

    #[test]
    fn from_serde_json_error_is_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn from_csv_error() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let csv_err = reader
            .records()
            .find_map(Result::err)
            .expect("ragged row should fail");
        let err: CoreError = csv_err.into();
        assert!(matches!(err, CoreError::Csv(_)));
    }

    #[test]
    fn errors_are_debug() {
        let err = CoreError::no_data("MacroTrends");
        let debug = format!("{err:?}");
        assert!(debug.contains("NoData"));
        assert!(debug.contains("MacroTrends"));
    }
}
