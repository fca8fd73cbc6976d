use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::EventId;

/// Direction of a price move, used to color segments and the return overlay.
/// A flat move counts as `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendColor {
    Up,
    Down,
}

impl TrendColor {
    /// Color for a move from `previous` to `current`. Ties favor `Up`.
    pub fn for_move(previous: f64, current: f64) -> Self {
        if current >= previous {
            TrendColor::Up
        } else {
            TrendColor::Down
        }
    }

    /// Color for a signed value (a return). Zero counts as `Up`.
    pub fn for_sign(value: f64) -> Self {
        if value >= 0.0 {
            TrendColor::Up
        } else {
            TrendColor::Down
        }
    }
}

/// A line segment between two adjacent rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: (NaiveDate, f64),
    pub to: (NaiveDate, f64),
    pub color: TrendColor,
}

/// Visible window of the chart for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub x_min: NaiveDate,
    pub x_max: NaiveDate,
    pub y_min: f64,
    pub y_max: f64,
}

/// A placed event label: box at `text_pos`, connector down to `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub event: EventId,
    pub label: String,
    pub anchor: (NaiveDate, f64),
    pub text_pos: (NaiveDate, f64),
}

/// The three text overlays in the chart corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlays {
    pub date_text: String,
    pub price_text: String,
    pub return_text: String,
    /// Cumulative return since frame 0, in percent
    pub return_pct: f64,
    pub return_color: TrendColor,
}

/// Everything a single call to `Animator::update` produced.
///
/// Segments and annotations are deltas: only what was added on this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub frame: usize,
    pub segment: Option<Segment>,
    pub bounds: AxisBounds,
    pub annotations: Vec<Annotation>,
    pub overlays: Overlays,
}
