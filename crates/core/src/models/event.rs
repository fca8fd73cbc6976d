use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identity of a historical event: its position in the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub usize);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// A fixed historical marker overlaid on the chart once the replay reaches it.
///
/// **Note**: events carry no plotted flag. Whether an event has already been
/// drawn is animation state, see `AnimationState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// Day the event happened
    pub date: NaiveDate,

    /// Text shown in the annotation box
    pub label: String,

    /// Vertical label offset as a fraction of the visible price range
    /// (negative places the label below the line).
    pub offset_fraction: f64,
}

impl HistoricalEvent {
    pub fn new(date: NaiveDate, label: impl Into<String>, offset_fraction: f64) -> Self {
        Self {
            date,
            label: label.into(),
            offset_fraction,
        }
    }
}

/// The static event table used by the replay.
pub fn default_events() -> Vec<HistoricalEvent> {
    const TABLE: [((i32, u32, u32), &str, f64); 6] = [
        ((2000, 3, 10), "Dot-com Bubble Bursts", -0.10),
        ((2001, 9, 11), "9/11 Attacks", -0.10),
        ((2008, 9, 15), "Financial Crisis", -0.15),
        ((2008, 11, 25), "QE1 Begins", -0.10),
        ((2011, 8, 1), "EU Debt Crisis", -0.15),
        ((2020, 3, 11), "COVID-19 Pandemic", -0.15),
    ];

    TABLE
        .iter()
        .filter_map(|&((y, m, d), label, offset)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| HistoricalEvent::new(date, label, offset))
        })
        .collect()
}
