use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::price::{DateRange, PriceSeries};
use crate::models::settings::FetchSettings;

use super::fred::FredSource;
use super::macrotrends::MacroTrendsSource;
use super::traits::SeriesSource;
use super::yahoo_finance::YahooFinanceSource;

/// Outcome of running one source.
#[derive(Debug)]
pub struct FetchAttempt {
    pub source: String,
    pub filename: String,
    pub result: Result<PriceSeries, CoreError>,
}

impl FetchAttempt {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered list of gold-price sources.
///
/// Sources run strictly one after another in registration order.
/// Two policies are offered: run everything ([`fetch_all`](Self::fetch_all))
/// or stop at the first success ([`fetch_first`](Self::fetch_first)).
pub struct SourceRegistry {
    sources: Vec<Box<dyn SeriesSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry with FRED, Yahoo Finance and MacroTrends, in that order.
    pub fn new_with_defaults(settings: &FetchSettings) -> Self {
        let mut registry = Self::new();

        // FRED — best daily series back to 1968
        registry.register(Box::new(FredSource::new(settings)));

        // Yahoo Finance — futures, history may be limited
        match YahooFinanceSource::new(settings) {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => warn!(error = %e, "Yahoo Finance source unavailable"),
        }

        // MacroTrends — long annual/monthly history
        registry.register(Box::new(MacroTrendsSource::new(settings)));

        registry
    }

    /// Register a new source at the end of the order.
    pub fn register(&mut self, source: Box<dyn SeriesSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of all sources, in order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Run every source and collect one attempt per source, in order.
    pub async fn fetch_all(&self, range: &DateRange) -> Vec<FetchAttempt> {
        let mut attempts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            info!(source = source.name(), "fetching");
            let result = source.fetch(range).await;
            match &result {
                Ok(series) => info!(source = source.name(), rows = series.len(), "fetched"),
                Err(e) => warn!(source = source.name(), error = %e, "fetch failed"),
            }
            attempts.push(FetchAttempt {
                source: source.name().to_string(),
                filename: source.default_filename().to_string(),
                result,
            });
        }
        attempts
    }

    /// Try sources in order and return the first successful series.
    ///
    /// If every source fails, the last error is returned.
    pub async fn fetch_first(&self, range: &DateRange) -> Result<PriceSeries, CoreError> {
        let mut last_error = None;
        for source in &self.sources {
            match source.fetch(range).await {
                Ok(series) => return Ok(series),
                Err(e) => {
                    warn!(source = source.name(), error = %e, "fetch failed, trying next source");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
