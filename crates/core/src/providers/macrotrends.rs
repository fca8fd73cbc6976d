use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{DateRange, PricePoint, PriceSeries};
use crate::models::settings::{FetchSettings, Granularity};
use super::traits::SeriesSource;

const BASE_URL: &str = "https://www.macrotrends.net/assets/php/timeseries_ajax.php";
const SOURCE_NAME: &str = "MacroTrends";

/// MacroTrends long-run gold table (annual or monthly, back to the 1900s).
///
/// The endpoint answers with a JSON array of `[date, price]` pairs where
/// both cells are usually strings. Prices that do not parse are kept as NaN.
/// The endpoint has no date filter, so the requested range is ignored and
/// the whole table is returned.
pub struct MacroTrendsSource {
    client: Client,
    granularity: Granularity,
    filename: String,
}

impl MacroTrendsSource {
    pub fn new(settings: &FetchSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        let granularity = settings.macrotrends_granularity;
        Self {
            client,
            granularity,
            filename: format!("gold_macrotrends_{granularity}.csv"),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Full request URL for a granularity.
    pub fn url_for(granularity: Granularity) -> String {
        format!("{BASE_URL}?type=gold-price&freq={}", granularity.as_query())
    }

    /// Parse the table payload into price points (unsorted, as received).
    pub fn parse_payload(payload: &Value) -> Result<Vec<PricePoint>, CoreError> {
        let rows = payload.as_array().ok_or_else(|| {
            CoreError::Parse(format!("{SOURCE_NAME}: payload is not an array"))
        })?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| match row.as_array().map(Vec::as_slice) {
                Some([date, price]) => Ok(PricePoint::new(
                    Self::parse_date(date, i)?,
                    Self::coerce_price(price),
                )),
                _ => Err(CoreError::Parse(format!(
                    "{SOURCE_NAME}: row {i} is not a [date, price] pair: {row}"
                ))),
            })
            .collect()
    }

    fn parse_date(value: &Value, row: usize) -> Result<NaiveDate, CoreError> {
        let raw = value.as_str().ok_or_else(|| {
            CoreError::Parse(format!("{SOURCE_NAME}: row {row}: date is not a string: {value}"))
        })?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
            CoreError::Parse(format!("{SOURCE_NAME}: row {row}: bad date '{raw}': {e}"))
        })
    }

    /// Numeric strings and JSON numbers become prices; anything else is NaN.
    pub fn coerce_price(value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }
}

#[async_trait]
impl SeriesSource for MacroTrendsSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn default_filename(&self) -> &str {
        &self.filename
    }

    async fn fetch(&self, _range: &DateRange) -> Result<PriceSeries, CoreError> {
        let url = Self::url_for(self.granularity);
        debug!(%url, "requesting MacroTrends table");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| CoreError::Parse(format!("{SOURCE_NAME}: payload is not JSON: {e}")))?;

        let points = Self::parse_payload(&payload)?;
        if points.is_empty() {
            return Err(CoreError::no_data(SOURCE_NAME));
        }

        Ok(PriceSeries::from_points(SOURCE_NAME, points))
    }
}
