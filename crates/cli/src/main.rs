mod cli;

use gold_replay_core::models::price::DateRange;
use gold_replay_core::models::settings::{AnimationSettings, FetchSettings, Granularity};
use gold_replay_core::services::fetch_service::FetchOutcome;
use gold_replay_core::GoldReplay;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{AnimateArgs, Command, FetchArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gold_replay_core=info,gold_replay_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli::parse() {
        Command::Fetch(args) => run_fetch(args).await,
        Command::Animate(args) => run_animate(args),
    }
}

async fn run_fetch(args: FetchArgs) -> anyhow::Result<()> {
    let mut settings = FetchSettings::default();
    if let Some(ticker) = args.ticker {
        settings.ticker = ticker;
    }
    if let Some(series) = args.fred_series {
        settings.fred_series = series;
    }
    if args.monthly {
        settings.macrotrends_granularity = Granularity::Monthly;
    }

    std::fs::create_dir_all(&args.out_dir)?;
    let app = GoldReplay::new(settings, AnimationSettings::default());
    let report = app
        .fetch_to_dir(&DateRange::new(args.start, args.end), &args.out_dir)
        .await;

    for (source, outcome) in &report.entries {
        match outcome {
            FetchOutcome::Saved { rows, path } => {
                info!("{source}: {rows} rows -> {}", path.display());
            }
            FetchOutcome::Failed { error } => error!("{source} fetch failed: {error}"),
        }
    }

    if report.saved_count() == 0 {
        anyhow::bail!("every source failed");
    }
    Ok(())
}

fn run_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let mut settings = AnimationSettings::default();
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(delay) = args.frame_delay {
        settings.frame_delay_ms = delay;
    }
    if let Some(step) = args.frame_step {
        settings.frame_step = step;
    }

    let app = GoldReplay::new(FetchSettings::default(), settings);
    let summary = app.animate(&args.input, &args.output)?;
    info!(
        "Rendered {} frames ({} events) to {}",
        summary.frames,
        summary.annotations,
        args.output.display()
    );
    Ok(())
}
