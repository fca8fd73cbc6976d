pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::path::Path;

use errors::CoreError;
use models::event::default_events;
use models::price::DateRange;
use models::settings::{AnimationSettings, FetchSettings};
use providers::registry::SourceRegistry;
use services::animation_service::Animator;
use services::fetch_service::{FetchReport, FetchService};
use services::render_service::{play, GifRenderer, PlaybackSummary};
use storage::csv_store::SeriesStore;
use tracing::info;

/// Main entry point for the Gold Replay core library.
/// Holds the settings for both flows: fetch-and-save and animated replay.
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct GoldReplay {
    fetch_settings: FetchSettings,
    animation_settings: AnimationSettings,
}

impl GoldReplay {
    pub fn new(fetch_settings: FetchSettings, animation_settings: AnimationSettings) -> Self {
        Self {
            fetch_settings,
            animation_settings,
        }
    }

    pub fn fetch_settings(&self) -> &FetchSettings {
        &self.fetch_settings
    }

    pub fn animation_settings(&self) -> &AnimationSettings {
        &self.animation_settings
    }

    /// Fetch every default source in turn and save each success under `out_dir`.
    pub async fn fetch_to_dir(&self, range: &DateRange, out_dir: &Path) -> FetchReport {
        let registry = SourceRegistry::new_with_defaults(&self.fetch_settings);
        info!(sources = ?registry.source_names(), "starting fetch run");
        FetchService::new(registry).run(range, out_dir).await
    }

    /// Replay the series stored at `input` and encode it to a GIF at `output`.
    ///
    /// Fails with `FileNotFound` before any rendering if `input` is missing.
    pub fn animate(&self, input: &Path, output: &Path) -> Result<PlaybackSummary, CoreError> {
        let series = SeriesStore::load(input)?;
        info!(rows = series.len(), input = %input.display(), "loaded series");

        let mut animator =
            Animator::new(series, default_events(), self.animation_settings.clone())?;
        let mut renderer =
            GifRenderer::create(output, &self.animation_settings, animator.frame_count())?;

        let summary = play(&mut animator, &mut renderer)?;
        info!(
            frames = summary.frames,
            annotations = summary.annotations,
            output = %output.display(),
            "replay finished"
        );
        Ok(summary)
    }
}
