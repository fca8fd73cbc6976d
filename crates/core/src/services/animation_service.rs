use std::collections::HashMap;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::chart::{Annotation, AxisBounds, FrameUpdate, Overlays, Segment, TrendColor};
use crate::models::event::{EventId, HistoricalEvent};
use crate::models::price::{PricePoint, PriceSeries};
use crate::models::settings::AnimationSettings;

/// Mutable context carried across frames.
///
/// Created before frame 0, advanced once per frame, dropped with the
/// [`Animator`] when the replay ends.
#[derive(Debug, Clone)]
pub struct AnimationState {
    next_frame: usize,
    /// Running (min, max) over finite prices seen so far
    extrema: Option<(f64, f64)>,
    plotted: HashMap<EventId, bool>,
}

impl AnimationState {
    pub fn new(event_count: usize) -> Self {
        Self {
            next_frame: 0,
            extrema: None,
            plotted: (0..event_count).map(|i| (EventId(i), false)).collect(),
        }
    }

    /// Index of the frame `update` expects next.
    pub fn next_frame(&self) -> usize {
        self.next_frame
    }

    pub fn extrema(&self) -> Option<(f64, f64)> {
        self.extrema
    }

    pub fn is_plotted(&self, id: EventId) -> bool {
        self.plotted.get(&id).copied().unwrap_or(false)
    }

    pub fn plotted_count(&self) -> usize {
        self.plotted.values().filter(|p| **p).count()
    }

    fn observe(&mut self, price: f64) {
        if !price.is_finite() {
            return;
        }
        self.extrema = Some(match self.extrema {
            Some((lo, hi)) => (lo.min(price), hi.max(price)),
            None => (price, price),
        });
    }
}

/// Frame-by-frame replay of one price series.
///
/// Each call to [`update`](Self::update) advances the cursor by one row and
/// returns what changed: the new segment, the axis window, any event labels
/// placed on this frame, and the text overlays. Frames must be fed in order
/// and the replay does not loop.
pub struct Animator {
    series: PriceSeries,
    events: Vec<HistoricalEvent>,
    settings: AnimationSettings,
    state: AnimationState,
}

impl Animator {
    pub fn new(
        series: PriceSeries,
        events: Vec<HistoricalEvent>,
        settings: AnimationSettings,
    ) -> Result<Self, CoreError> {
        if series.is_empty() {
            return Err(CoreError::no_data(series.source()));
        }
        let state = AnimationState::new(events.len());
        Ok(Self {
            series,
            events,
            settings,
            state,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_finished(&self) -> bool {
        self.state.next_frame >= self.series.len()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Advance the replay to `frame`.
    pub fn update(&mut self, frame: usize) -> Result<FrameUpdate, CoreError> {
        if self.is_finished() {
            return Err(CoreError::Animation(format!(
                "replay finished after {} frames, got frame {frame}",
                self.series.len()
            )));
        }
        if frame != self.state.next_frame {
            return Err(CoreError::Animation(format!(
                "expected frame {}, got {frame}",
                self.state.next_frame
            )));
        }

        let current = self.series.points()[frame].clone();
        let segment = frame
            .checked_sub(1)
            .and_then(|prev| Self::segment_between(&self.series.points()[prev], &current));

        self.state.observe(current.price);
        let bounds = self.bounds_at(&current);
        let annotations = self.place_events(&current);
        let overlays = self.overlays_at(&current);

        self.state.next_frame += 1;
        if frame % 500 == 0 {
            debug!(frame, date = %current.date, "replay progress");
        }

        Ok(FrameUpdate {
            frame,
            segment,
            bounds,
            annotations,
            overlays,
        })
    }

    /// Segment between two adjacent rows; `None` if either price is missing.
    fn segment_between(prev: &PricePoint, current: &PricePoint) -> Option<Segment> {
        if !prev.price.is_finite() || !current.price.is_finite() {
            return None;
        }
        Some(Segment {
            from: (prev.date, prev.price),
            to: (current.date, current.price),
            color: TrendColor::for_move(prev.price, current.price),
        })
    }

    fn bounds_at(&self, current: &PricePoint) -> AxisBounds {
        let x_min = self.series.first().map_or(current.date, |p| p.date);
        let x_max = current.date + chrono::Duration::days(self.settings.x_padding_days);

        // Margin scales with magnitude so negative extrema still widen outward.
        let margin = self.settings.y_margin;
        let (y_min, y_max) = match self.state.extrema {
            Some((lo, hi)) => (lo - margin * lo.abs(), hi + margin * hi.abs()),
            None => (0.0, 1.0),
        };

        AxisBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Place every event reached by the cursor that has not been drawn yet.
    fn place_events(&mut self, current: &PricePoint) -> Vec<Annotation> {
        let visible_range = self.state.extrema.map_or(0.0, |(lo, hi)| hi - lo);
        let mut placed = Vec::new();

        for (i, event) in self.events.iter().enumerate() {
            let id = EventId(i);
            if self.state.is_plotted(id) || event.date > current.date {
                continue;
            }
            let Some(row) = self
                .series
                .nearest_index(event.date)
                .and_then(|idx| self.series.get(idx))
            else {
                continue;
            };

            let offset = event.offset_fraction * visible_range;
            placed.push(Annotation {
                event: id,
                label: event.label.clone(),
                anchor: (event.date, row.price),
                text_pos: (event.date, row.price + offset),
            });
            self.state.plotted.insert(id, true);
            debug!(event = %event.label, date = %event.date, "event annotated");
        }

        placed
    }

    /// Return is measured against the first row. If that price is missing the
    /// return stays `NaN` for the whole replay and is drawn in the down color.
    fn overlays_at(&self, current: &PricePoint) -> Overlays {
        let start = self.series.first().map_or(f64::NAN, |p| p.price);
        let return_pct = (current.price - start) / start * 100.0;

        Overlays {
            date_text: format!("Date: {}", current.date.format("%Y-%m-%d")),
            price_text: format!("Price: {}", format_currency(current.price)),
            return_text: format!("Total Return: {return_pct:+.2}%"),
            return_pct,
            return_color: TrendColor::for_sign(return_pct),
        }
    }
}

/// `1234.5` → `$1,234.50`; negative values keep their sign in front.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}
