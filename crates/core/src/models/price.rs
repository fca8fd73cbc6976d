use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single price data point (date → price).
///
/// `price` may be NaN when a source reported a missing or non-numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Optional date window for a fetch. `None` on either side means
/// "let the source decide" (source default start / today).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Resolve both ends: a missing start falls back to `default_start`,
    /// a missing end to today's UTC date.
    pub fn resolve(&self, default_start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = self.start.unwrap_or(default_start);
        let end = self.end.unwrap_or_else(|| chrono::Utc::now().date_naive());
        (start, end)
    }
}

/// A date-indexed gold price history produced by exactly one source.
///
/// Invariant: points are strictly increasing by date (one price per date).
/// The only way to build one is [`PriceSeries::from_points`], which sorts
/// and de-duplicates, so a series can never be observed out of order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    source: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Normalize raw points into a series.
    ///
    /// Sorting is stable; when a date appears more than once the value that
    /// came last in `points` wins.
    pub fn from_points(source: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);

        let mut normalized: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match normalized.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => normalized.push(point),
            }
        }

        Self {
            source: source.into(),
            points: normalized,
        }
    }

    /// Name of the source that produced this series.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Index of the row whose date is closest to `date`.
    ///
    /// Ties between two equidistant rows resolve to the earlier row.
    /// Returns `None` only for an empty series.
    pub fn nearest_index(&self, date: NaiveDate) -> Option<usize> {
        // Binary search gives the insertion point; the nearest row is either
        // just before it or at it.
        let pos = self.points.partition_point(|p| p.date < date);
        let before = pos.checked_sub(1);
        let at = (pos < self.points.len()).then_some(pos);

        match (before, at) {
            (Some(b), Some(a)) => {
                let db = (date - self.points[b].date).num_days().abs();
                let da = (self.points[a].date - date).num_days().abs();
                Some(if db <= da { b } else { a })
            }
            (Some(b), None) => Some(b),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }
}
