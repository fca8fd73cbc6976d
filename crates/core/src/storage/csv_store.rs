use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::info;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

pub const DATE_COLUMN: &str = "Date";
pub const PRICE_COLUMN: &str = "price";

/// Length of the timestamp prefix read from the date column.
const TIMESTAMP_PREFIX: usize = 19;

/// Save/load price series as two-column CSV files (`Date,price`).
///
/// No locking or atomic rename: the last writer wins.
pub struct SeriesStore;

impl SeriesStore {
    /// Write `series` to `path` and return the number of rows written.
    ///
    /// Dates are written as `YYYY-MM-DD`; NaN prices as an empty field.
    pub fn save(series: &PriceSeries, path: impl AsRef<Path>) -> Result<usize, CoreError> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([DATE_COLUMN, PRICE_COLUMN])?;

        for point in series.points() {
            let date = point.date.format("%Y-%m-%d").to_string();
            let price = if point.price.is_nan() {
                String::new()
            } else {
                point.price.to_string()
            };
            writer.write_record([date, price])?;
        }
        writer.flush()?;

        let rows = series.len();
        info!("Saved {rows} rows to {}", path.display());
        Ok(rows)
    }

    /// Read a series previously written by [`save`](Self::save) or any CSV
    /// with `Date` and `price` columns.
    ///
    /// A missing file is `FileNotFound`. Any unparseable row is a fatal
    /// `Parse` error naming the row; there is no row skipping.
    pub fn load(path: impl AsRef<Path>) -> Result<PriceSeries, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::FileNotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                CoreError::Parse(format!("{}: missing '{name}' column", path.display()))
            })
        };
        let date_idx = column(DATE_COLUMN)?;
        let price_idx = column(PRICE_COLUMN)?;

        let mut points = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Row numbers are 1-based and count the header.
            let line = i + 2;
            let date_str = record.get(date_idx).unwrap_or_default();
            let price_str = record.get(price_idx).unwrap_or_default();

            let date = parse_date_prefix(date_str).ok_or_else(|| {
                CoreError::Parse(format!("{} row {line}: bad date '{date_str}'", path.display()))
            })?;
            let price = parse_price(price_str).ok_or_else(|| {
                CoreError::Parse(format!("{} row {line}: bad price '{price_str}'", path.display()))
            })?;

            points.push(PricePoint::new(date, price));
        }

        let source = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(PriceSeries::from_points(source, points))
    }
}

/// Parse the date part of a timestamp-like cell from its first 19 characters.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and plain
/// `YYYY-MM-DD` (anything after the date, such as a UTC offset, is ignored).
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let prefix = raw.get(..TIMESTAMP_PREFIX).unwrap_or(raw);

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(prefix, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            let day = raw.get(..10).unwrap_or(raw);
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        })
}

/// Empty and `NaN` cells are missing values; anything else must be numeric.
fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}
