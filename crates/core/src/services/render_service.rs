use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::errors::CoreError;
use crate::models::chart::{Annotation, FrameUpdate, Segment, TrendColor};
use crate::models::settings::AnimationSettings;
use crate::services::animation_service::Animator;

/// Retained display list: every segment and label drawn so far.
///
/// `Animator` only reports what changed on a frame; renderers that redraw
/// from scratch (like the GIF encoder) replay the whole scene each frame.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    segments: Vec<Segment>,
    annotations: Vec<Annotation>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's deltas into the scene.
    pub fn apply(&mut self, update: &FrameUpdate) {
        if let Some(segment) = &update.segment {
            self.segments.push(segment.clone());
        }
        self.annotations.extend(update.annotations.iter().cloned());
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Sink for replay frames. Called once per frame, in order.
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, update: &FrameUpdate) -> Result<(), CoreError>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Totals of a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub frames: usize,
    pub segments: usize,
    pub annotations: usize,
}

/// Drive `animator` from frame 0 to the last row, rendering each frame.
///
/// Each frame runs to completion before the next starts; the replay stops
/// after the final frame and does not repeat.
pub fn play<R: FrameRenderer + ?Sized>(
    animator: &mut Animator,
    renderer: &mut R,
) -> Result<PlaybackSummary, CoreError> {
    let mut scene = Scene::new();
    let frames = animator.frame_count();

    for frame in 0..frames {
        let update = animator.update(frame)?;
        scene.apply(&update);
        renderer.render(&scene, &update)?;
    }
    renderer.finish()?;

    Ok(PlaybackSummary {
        frames,
        segments: scene.segments().len(),
        annotations: scene.annotations().len(),
    })
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

const GRID: RGBColor = RGBColor(0x55, 0x55, 0x55);
const FAINT_GRID: RGBColor = RGBColor(0x22, 0x22, 0x22);
const LABEL_BORDER: RGBColor = RGBColor(0x80, 0x80, 0x80);

/// Encodes the replay as an animated GIF with `plotters`.
///
/// Dark background, growing line colored by direction, event labels in
/// translucent boxes and date/price/return text in the upper-left corner.
pub struct GifRenderer {
    root: DrawingArea<BitMapBackend<'static>, Shift>,
    settings: AnimationSettings,
    total_frames: usize,
    encoded: usize,
}

impl GifRenderer {
    pub fn create(
        path: impl AsRef<Path>,
        settings: &AnimationSettings,
        total_frames: usize,
    ) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let backend = BitMapBackend::gif(
            path,
            (settings.width, settings.height),
            settings.frame_delay_ms,
        )
        .map_err(|e| CoreError::Render(format!("Failed to open {}: {e}", path.display())))?;

        Ok(Self {
            root: backend.into_drawing_area(),
            settings: settings.clone(),
            total_frames,
            encoded: 0,
        })
    }

    /// Number of frames written to the GIF so far.
    pub fn encoded_frames(&self) -> usize {
        self.encoded
    }

    fn should_encode(&self, frame: usize) -> bool {
        let step = self.settings.frame_step.max(1);
        frame % step == 0 || frame + 1 == self.total_frames
    }

    fn color(&self, trend: TrendColor) -> RGBColor {
        match trend {
            TrendColor::Up => rgb(self.settings.up_color),
            TrendColor::Down => rgb(self.settings.down_color),
        }
    }

    fn draw(&self, scene: &Scene, update: &FrameUpdate) -> Result<(), CoreError> {
        self.root
            .fill(&BLACK)
            .map_err(|e| CoreError::Render(format!("Failed to fill canvas: {e}")))?;

        let bounds = &update.bounds;
        // plotters needs a finite, non-empty y range.
        let (y_min, y_max) = match (bounds.y_min, bounds.y_max) {
            (lo, hi) if lo.is_finite() && hi.is_finite() && hi > lo => (lo, hi),
            (lo, hi) if lo.is_finite() && hi.is_finite() => (lo.min(hi) - 1.0, lo.max(hi) + 1.0),
            _ => (0.0, 1.0),
        };
        let x_range = at_midnight(bounds.x_min)..at_midnight(bounds.x_max);

        let title_style = ("sans-serif", 40)
            .into_font()
            .style(FontStyle::Bold)
            .color(&rgb(self.settings.title_color));

        let mut chart = ChartBuilder::on(&self.root)
            .caption(&self.settings.title, title_style)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| CoreError::Render(format!("Failed to build chart: {e}")))?;

        chart
            .configure_mesh()
            .bold_line_style(GRID.stroke_width(1))
            .light_line_style(FAINT_GRID.stroke_width(1))
            .axis_style(WHITE.stroke_width(1))
            .label_style(("sans-serif", 16).into_font().color(&WHITE))
            .axis_desc_style(("sans-serif", 20).into_font().color(&WHITE))
            .y_desc("Price (USD)")
            .x_label_formatter(&|t: &DateTime<Utc>| t.format("%Y").to_string())
            .y_label_formatter(&|v: &f64| format!("${v:.0}"))
            .draw()
            .map_err(|e| CoreError::Render(format!("Failed to draw mesh: {e}")))?;

        chart
            .draw_series(scene.segments().iter().map(|s| {
                PathElement::new(
                    vec![(at_midnight(s.from.0), s.from.1), (at_midnight(s.to.0), s.to.1)],
                    self.color(s.color).stroke_width(2),
                )
            }))
            .map_err(|e| CoreError::Render(format!("Failed to draw line: {e}")))?;

        for annotation in scene.annotations() {
            let (date, price) = annotation.anchor;
            let (_, label_price) = annotation.text_pos;
            if !price.is_finite() || !label_price.is_finite() {
                continue;
            }
            let x = at_midnight(date);

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, price), (x, label_price)],
                    WHITE.stroke_width(1),
                )))
                .map_err(|e| CoreError::Render(format!("Failed to draw connector: {e}")))?;

            // Rough text width for a 14px sans-serif label.
            let half_width = (annotation.label.chars().count() as i32 * 7) / 2 + 6;
            let corners = [(-half_width, -11), (half_width, 11)];
            let label_box = EmptyElement::at((x, label_price))
                + Rectangle::new(corners, BLACK.mix(0.7).filled())
                + Rectangle::new(corners, LABEL_BORDER.stroke_width(1))
                + Text::new(
                    annotation.label.clone(),
                    (-half_width + 6, -8),
                    ("sans-serif", 14).into_font().color(&WHITE),
                );

            chart
                .draw_series(std::iter::once(label_box))
                .map_err(|e| CoreError::Render(format!("Failed to draw label: {e}")))?;
        }

        self.draw_overlays(update)?;
        Ok(())
    }

    fn draw_overlays(&self, update: &FrameUpdate) -> Result<(), CoreError> {
        let (w, h) = self.root.dim_in_pixel();
        let left = (w as f64 * 0.08) as i32;
        let top = (h as f64 * 0.12) as i32;
        let overlays = &update.overlays;

        let lines = [
            (overlays.date_text.as_str(), 0, 28, WHITE),
            (overlays.price_text.as_str(), 40, 28, rgb(self.settings.price_color)),
            (overlays.return_text.as_str(), 80, 30, self.color(overlays.return_color)),
        ];

        for (text, dy, size, color) in lines {
            self.root
                .draw(&Text::new(
                    text,
                    (left, top + dy),
                    ("monospace", size).into_font().color(&color),
                ))
                .map_err(|e| CoreError::Render(format!("Failed to draw overlay: {e}")))?;
        }
        Ok(())
    }
}

impl FrameRenderer for GifRenderer {
    fn render(&mut self, scene: &Scene, update: &FrameUpdate) -> Result<(), CoreError> {
        if !self.should_encode(update.frame) {
            return Ok(());
        }
        self.draw(scene, update)?;
        self.root
            .present()
            .map_err(|e| CoreError::Render(format!("Failed to encode frame {}: {e}", update.frame)))?;
        self.encoded += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CoreError> {
        info!(frames = self.encoded, "animation encoded");
        Ok(())
    }
}
