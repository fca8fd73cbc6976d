use thiserror::Error;

/// Unified error type for the entire gold-replay-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("No data returned by {source_name}")]
    NoData { source_name: String },

    #[error("No data source registered")]
    NoProvider,

    // ── Payload / Parsing ───────────────────────────────────────────
    #[error("Parse error: {0}")]
    Parse(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error: {0}")]
    Csv(String),

    // ── Animation / Rendering ───────────────────────────────────────
    #[error("Animation error: {0}")]
    Animation(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl CoreError {
    /// Shorthand for the empty-result error of a named source.
    pub fn no_data(source_name: impl Into<String>) -> Self {
        CoreError::NoData {
            source_name: source_name.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return CoreError::Http {
                status: status.as_u16(),
                url: e.url().map(redact_query).unwrap_or_default(),
            };
        }
        // reqwest errors embed the full URL; keep query strings out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

fn redact_query(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
