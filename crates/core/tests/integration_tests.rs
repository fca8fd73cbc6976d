use async_trait::async_trait;
use chrono::NaiveDate;

use gold_replay_core::errors::CoreError;
use gold_replay_core::models::chart::FrameUpdate;
use gold_replay_core::models::event::{default_events, HistoricalEvent};
use gold_replay_core::models::price::{DateRange, PricePoint, PriceSeries};
use gold_replay_core::models::settings::{AnimationSettings, FetchSettings};
use gold_replay_core::providers::registry::SourceRegistry;
use gold_replay_core::providers::traits::SeriesSource;
use gold_replay_core::services::animation_service::Animator;
use gold_replay_core::services::fetch_service::{FetchOutcome, FetchService};
use gold_replay_core::services::render_service::{play, FrameRenderer, GifRenderer, Scene};
use gold_replay_core::storage::csv_store::SeriesStore;
use gold_replay_core::GoldReplay;

// ═══════════════════════════════════════════════════════════════════
// Mock quote source (for testing without real API calls)
// ═══════════════════════════════════════════════════════════════════

/// Weekly closes from 1999 to 2021, shuffled, with one duplicate date.
struct MockQuoteSource;

impl MockQuoteSource {
    fn points() -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(1999, 1, 4).unwrap();
        let mut points: Vec<PricePoint> = (0..1200)
            .map(|w| {
                let date = start + chrono::Duration::weeks(w);
                let price = 280.0 + w as f64 * 1.3 + ((w % 7) as f64 - 3.0) * 4.0;
                PricePoint::new(date, price)
            })
            .collect();
        points.reverse();
        points.push(PricePoint::new(start, 287.0));
        points
    }
}

#[async_trait]
impl SeriesSource for MockQuoteSource {
    fn name(&self) -> &str {
        "MockQuotes"
    }

    fn default_filename(&self) -> &str {
        "gold_yahoo_gc_f.csv"
    }

    async fn fetch(&self, _range: &DateRange) -> Result<PriceSeries, CoreError> {
        Ok(PriceSeries::from_points(self.name(), Self::points()))
    }
}

#[derive(Default)]
struct CountingRenderer {
    updates: Vec<FrameUpdate>,
}

impl FrameRenderer for CountingRenderer {
    fn render(&mut self, _scene: &Scene, update: &FrameUpdate) -> Result<(), CoreError> {
        self.updates.push(update.clone());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fetch → save → load → replay
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn fetch_save_load_and_replay() {
    let dir = tempfile::tempdir().unwrap();

    let mut registry = SourceRegistry::new();
    registry.register(Box::new(MockQuoteSource));
    let report = FetchService::new(registry)
        .run(&DateRange::default(), dir.path())
        .await;

    let path = match &report.entries[0].1 {
        FetchOutcome::Saved { rows, path } => {
            assert_eq!(*rows, 1200);
            path.clone()
        }
        other => panic!("Expected Saved, got: {other:?}"),
    };

    let series = SeriesStore::load(&path).unwrap();
    assert_eq!(series.len(), 1200);
    assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    // Duplicate start date: the value listed last wins.
    assert_eq!(series.first().unwrap().price, 287.0);

    let mut animator =
        Animator::new(series, default_events(), AnimationSettings::default()).unwrap();
    let mut renderer = CountingRenderer::default();
    let summary = play(&mut animator, &mut renderer).unwrap();

    assert_eq!(summary.frames, 1200);
    assert_eq!(summary.segments, 1199);
    // 1999..2021 covers every default event exactly once.
    assert_eq!(summary.annotations, default_events().len());
    assert_eq!(animator.state().plotted_count(), default_events().len());

    for update in &renderer.updates {
        for annotation in &update.annotations {
            let event = &default_events()[annotation.event.0];
            let frame_date = update.overlays.date_text.trim_start_matches("Date: ");
            let frame_date = NaiveDate::parse_from_str(frame_date, "%Y-%m-%d").unwrap();
            assert!(event.date <= frame_date, "{} placed early", event.label);
        }
    }
}

#[test]
fn animate_missing_input_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = GoldReplay::new(FetchSettings::default(), AnimationSettings::default());
    let output = dir.path().join("out.gif");

    let err = app
        .animate(&dir.path().join("gold_yahoo_gc_f.csv"), &output)
        .unwrap_err();

    assert!(matches!(err, CoreError::FileNotFound(_)));
    assert!(!output.exists());
}

#[test]
fn gif_renderer_opens_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("replay.gif");
    let renderer = GifRenderer::create(&output, &AnimationSettings::default(), 10).unwrap();
    assert_eq!(renderer.encoded_frames(), 0);
}

#[test]
fn gif_replay_encodes_every_step_and_last_frame() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("replay.gif");

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let points: Vec<PricePoint> = (0..11)
        .map(|i| {
            let price = if i == 4 { f64::NAN } else { 1500.0 + (i % 3) as f64 * 20.0 };
            PricePoint::new(start + chrono::Duration::days(i), price)
        })
        .collect();
    let events = vec![
        HistoricalEvent::new(start + chrono::Duration::days(2), "Early", -0.10),
        HistoricalEvent::new(start + chrono::Duration::days(8), "Late", -0.15),
    ];
    let settings = AnimationSettings {
        width: 400,
        height: 300,
        frame_step: 3,
        ..AnimationSettings::default()
    };

    let series = PriceSeries::from_points("gif", points);
    let mut animator = Animator::new(series, events, settings.clone()).unwrap();
    let mut renderer = GifRenderer::create(&output, &settings, animator.frame_count()).unwrap();
    let summary = play(&mut animator, &mut renderer).unwrap();

    assert_eq!(summary.frames, 11);
    // The NaN row at index 4 breaks the segments into and out of it.
    assert_eq!(summary.segments, 8);
    assert_eq!(summary.annotations, 2);
    // Frames 0, 3, 6, 9 by step, plus the final frame 10.
    assert_eq!(renderer.encoded_frames(), 5);

    drop(renderer);
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}
