use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{DateRange, PricePoint, PriceSeries};
use crate::models::settings::FetchSettings;
use super::traits::SeriesSource;

const BASE_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";
const SOURCE_NAME: &str = "FRED";

/// FRED's marker for a missing observation.
const MISSING_MARKER: &str = ".";

/// FRED (St. Louis Fed) economic-data source.
///
/// - **Free**: the graph CSV download needs no API key.
/// - **Common IDs**: `GOLDPMGBD228NLBM` (London PM fix, daily),
///   `GOLDAMGBD228NLBM` (London AM fix, daily). Both start in 1968.
///
/// The CSV carries two columns: the observation date and a value column
/// named after the series id, which is renamed to `price` here.
pub struct FredSource {
    client: Client,
    series_id: String,
    default_start: NaiveDate,
}

impl FredSource {
    pub fn new(settings: &FetchSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            series_id: settings.fred_series.clone(),
            default_start: settings.fred_start,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    /// Parse a `fredgraph.csv` body into price points.
    ///
    /// The header must have exactly two columns; the second is the value
    /// column whatever its name. `.` and empty cells become NaN.
    pub fn parse_csv(body: &str) -> Result<Vec<PricePoint>, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.len() != 2 {
            return Err(CoreError::Parse(format!(
                "{SOURCE_NAME}: expected 2 columns (date, value), got {}",
                headers.len()
            )));
        }

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let date_str = record.get(0).unwrap_or_default();
            let value_str = record.get(1).unwrap_or_default();

            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                CoreError::Parse(format!("{SOURCE_NAME}: row {}: bad date '{date_str}': {e}", row + 1))
            })?;

            let price = if value_str.is_empty() || value_str == MISSING_MARKER {
                f64::NAN
            } else {
                value_str.parse::<f64>().map_err(|e| {
                    CoreError::Parse(format!(
                        "{SOURCE_NAME}: row {}: bad value '{value_str}': {e}",
                        row + 1
                    ))
                })?
            };

            points.push(PricePoint::new(date, price));
        }

        Ok(points)
    }
}

#[async_trait]
impl SeriesSource for FredSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn default_filename(&self) -> &str {
        "gold_fred_pm.csv"
    }

    async fn fetch(&self, range: &DateRange) -> Result<PriceSeries, CoreError> {
        let (from, to) = range.resolve(self.default_start);
        let from_str = from.format("%Y-%m-%d").to_string();
        let to_str = to.format("%Y-%m-%d").to_string();

        debug!(series = %self.series_id, %from, %to, "requesting FRED series");

        let body = self
            .client
            .get(BASE_URL)
            .query(&[
                ("id", self.series_id.as_str()),
                ("cosd", from_str.as_str()),
                ("coed", to_str.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let points = Self::parse_csv(&body)?;
        if points.is_empty() {
            return Err(CoreError::no_data(SOURCE_NAME));
        }

        Ok(PriceSeries::from_points(SOURCE_NAME, points))
    }
}
