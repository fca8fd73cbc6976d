use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::price::DateRange;
use crate::providers::registry::SourceRegistry;
use crate::storage::csv_store::SeriesStore;

/// What happened to one source during a fetch run.
#[derive(Debug)]
pub enum FetchOutcome {
    Saved { rows: usize, path: PathBuf },
    Failed { error: CoreError },
}

/// Per-source results of [`FetchService::run`], in registry order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub entries: Vec<(String, FetchOutcome)>,
}

impl FetchReport {
    pub fn saved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, FetchOutcome::Saved { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.saved_count()
    }
}

/// Fetches every registered source and saves each success to its own file.
///
/// A failing source never stops the run; its error is logged and recorded
/// in the report, and the remaining sources are still attempted.
pub struct FetchService {
    registry: SourceRegistry,
}

impl FetchService {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Run all sources in order, writing successes under `out_dir`.
    pub async fn run(&self, range: &DateRange, out_dir: &Path) -> FetchReport {
        let mut report = FetchReport::default();

        for attempt in self.registry.fetch_all(range).await {
            let outcome = match attempt.result {
                Ok(series) if series.is_empty() => {
                    // Sources report emptiness as NoData already; never save an empty file.
                    FetchOutcome::Failed {
                        error: CoreError::no_data(&attempt.source),
                    }
                }
                Ok(series) => {
                    let path = out_dir.join(&attempt.filename);
                    match SeriesStore::save(&series, &path) {
                        Ok(rows) => FetchOutcome::Saved { rows, path },
                        Err(error) => FetchOutcome::Failed { error },
                    }
                }
                Err(error) => FetchOutcome::Failed { error },
            };

            match &outcome {
                FetchOutcome::Saved { rows, path } => {
                    info!(source = %attempt.source, rows, path = %path.display(), "source saved");
                }
                FetchOutcome::Failed { error } => {
                    warn!(source = %attempt.source, error = %error, "source skipped");
                }
            }
            report.entries.push((attempt.source, outcome));
        }

        report
    }
}
