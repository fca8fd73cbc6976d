use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::{DateRange, PriceSeries};

/// Trait abstraction for all gold-price history sources.
///
/// Each upstream (Yahoo Finance, FRED, MacroTrends) implements this trait
/// and normalizes its payload into a [`PriceSeries`]. Sources never depend
/// on one another, so a caller may run them in any order.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// File name the fetch driver saves this source's series under.
    fn default_filename(&self) -> &str;

    /// Fetch the full history in `range`, sorted ascending with one price per date.
    ///
    /// An empty result is `CoreError::NoData`, never an empty series.
    async fn fetch(&self, range: &DateRange) -> Result<PriceSeries, CoreError>;
}
