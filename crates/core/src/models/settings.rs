use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Granularity of the MacroTrends table endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Annual,
    Monthly,
}

impl Granularity {
    /// Value of the `freq` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Granularity::Annual => "annual",
            Granularity::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Settings for the fetch flow. `Default` carries the in-code defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Quote-service ticker (Yahoo Finance)
    pub ticker: String,

    /// First day requested from the quote service when no start is given
    pub ticker_start: NaiveDate,

    /// Economic-data series id (FRED)
    pub fred_series: String,

    /// First day requested from FRED when no start is given
    pub fred_start: NaiveDate,

    pub macrotrends_granularity: Granularity,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            ticker: "GC=F".to_string(),
            ticker_start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            fred_series: "GOLDPMGBD228NLBM".to_string(),
            fred_start: NaiveDate::from_ymd_opt(1968, 1, 1).unwrap_or_default(),
            macrotrends_granularity: Granularity::Annual,
            timeout_secs: 15,
        }
    }
}

/// Settings for the replay. `Default` carries the in-code defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    /// Days added after the current date on the right edge of the x axis
    pub x_padding_days: i64,

    /// Fractional margin applied below the minimum and above the maximum
    pub y_margin: f64,

    pub width: u32,
    pub height: u32,

    /// Delay between encoded frames, in milliseconds
    pub frame_delay_ms: u32,

    /// Encode every n-th frame (the final frame is always encoded)
    pub frame_step: usize,

    pub title: String,
    pub up_color: (u8, u8, u8),
    pub down_color: (u8, u8, u8),
    pub title_color: (u8, u8, u8),
    pub price_color: (u8, u8, u8),
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            x_padding_days: 180,
            y_margin: 0.05,
            width: 1600,
            height: 900,
            frame_delay_ms: 20,
            frame_step: 1,
            title: "Gold Price: An Animated History".to_string(),
            up_color: (0x2E, 0xCC, 0x71),
            down_color: (0xE7, 0x4C, 0x3C),
            title_color: (0xD9, 0xFF, 0x00),
            price_color: (0xF6, 0xFF, 0x00),
        }
    }
}
