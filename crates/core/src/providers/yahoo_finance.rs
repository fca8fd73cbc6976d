use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api::Quote;

use crate::errors::CoreError;
use crate::models::price::{DateRange, PricePoint, PriceSeries};
use crate::models::settings::FetchSettings;
use super::traits::SeriesSource;

const SOURCE_NAME: &str = "Yahoo Finance";

/// Yahoo Finance quote-service source for daily futures prices.
///
/// - **Free**: No API key required.
/// - **Coverage**: `GC=F` (COMEX gold futures) goes back to 2000; older
///   starts simply return fewer rows.
/// - **Price field**: adjusted close, falling back to raw close.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public chart endpoint.
pub struct YahooFinanceSource {
    connector: yahoo_finance_api::YahooConnector,
    ticker: String,
    default_start: NaiveDate,
    filename: String,
}

impl YahooFinanceSource {
    pub fn new(settings: &FetchSettings) -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Network(format!("{SOURCE_NAME}: failed to create connector: {e}")))?;
        Ok(Self {
            connector,
            filename: Self::filename_for(&settings.ticker),
            ticker: settings.ticker.clone(),
            default_start: settings.ticker_start,
        })
    }

    /// `GC=F` → `gold_yahoo_gc_f.csv`
    pub fn filename_for(ticker: &str) -> String {
        let slug: String = ticker
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("gold_yahoo_{slug}.csv")
    }

    /// Pick the price of one quote: adjusted close when it is usable,
    /// otherwise the raw close.
    pub fn select_price(adjclose: f64, close: f64) -> f64 {
        if adjclose.is_finite() && adjclose > 0.0 {
            adjclose
        } else {
            close
        }
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month = time::Month::try_from(date.month() as u8)
            .map_err(|e| CoreError::Parse(format!("Invalid month in {date}: {e}")))?;

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| CoreError::Parse(format!("Invalid date {date}: {e}")))?
            .with_hms(0, 0, 0)
            .map_err(|e| CoreError::Parse(format!("Invalid time for {date}: {e}")))?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    fn quotes_to_points(quotes: &[Quote], from: NaiveDate, to: NaiveDate) -> Vec<PricePoint> {
        quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                (date >= from && date <= to)
                    .then(|| PricePoint::new(date, Self::select_price(q.adjclose, q.close)))
            })
            .collect()
    }
}

#[async_trait]
impl SeriesSource for YahooFinanceSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn default_filename(&self) -> &str {
        &self.filename
    }

    async fn fetch(&self, range: &DateRange) -> Result<PriceSeries, CoreError> {
        let (from, to) = range.resolve(self.default_start);
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        debug!(ticker = %self.ticker, %from, %to, "requesting quote history");

        let resp = self
            .connector
            .get_quote_history(&self.ticker, start, end)
            .await
            .map_err(|e| CoreError::Network(format!(
                "{SOURCE_NAME}: failed to fetch history for {}: {e}",
                self.ticker
            )))?;

        // The connector reports an empty chart as an error; both mean "no rows".
        let quotes = resp.quotes().map_err(|e| {
            debug!(ticker = %self.ticker, error = %e, "quote set unavailable");
            CoreError::no_data(SOURCE_NAME)
        })?;

        let points = Self::quotes_to_points(&quotes, from, to);
        if points.is_empty() {
            return Err(CoreError::no_data(SOURCE_NAME));
        }

        Ok(PriceSeries::from_points(SOURCE_NAME, points))
    }
}
