mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracksync_core::{
    config::LibraryKind, load_config, validate_config, BansheeLibrary, CleanupTracker, Classifier,
    DirectoryLibrary, FfmpegTranscoder, LibraryScan, MagicSniffer, PipelineError, Planner,
    SyncDriver, SyncPipeline, TargetResolver, TrackSource, Transcoder,
};

/// Exit code after SIGINT or SIGTERM.
const EXIT_INTERRUPTED: i32 = 130;

/// Mirror a music library onto a player, transcoding what it cannot play.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML)
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

enum Outcome {
    Finished,
    Interrupted,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let code = match run(&args).await {
        Ok(Outcome::Finished) => 0,
        Ok(Outcome::Interrupted) => EXIT_INTERRUPTED,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            1
        }
    };
    // Everything owned by run() is dropped by now, including the cleanup guard.
    std::process::exit(code);
}

async fn run(args: &Args) -> Result<Outcome> {
    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    // Temp files still tracked when this returns are deleted.
    let tracker = CleanupTracker::new();
    let _guard = tracker.guard();

    let target = TargetResolver::new()
        .resolve(&config.target)
        .await
        .context("Failed to resolve target")?;

    let source: Box<dyn TrackSource> = match config.library.kind {
        LibraryKind::Banshee => Box::new(BansheeLibrary::new(&config.library.database)),
        LibraryKind::Directory => Box::new(DirectoryLibrary::new(&config.source)),
    };
    info!("Reading tracks from {}", source.name());
    let entries = LibraryScan::new(&config.source, &config.exclude)
        .scan(source.as_ref())
        .context("Failed to read library")?;
    info!("{} tracks below {:?}", entries.len(), config.source);

    let transcoder = FfmpegTranscoder::new(config.transcoder_config());
    if let Err(e) = transcoder.validate().await {
        warn!("Encoder check failed: {}", e);
    }

    let classifier = Classifier::new(MagicSniffer::new(), config.capabilities());
    let planner = Planner::new(
        classifier,
        &target.music_root,
        &config.target.transcode.extension,
    );
    let pipeline = SyncPipeline::new(
        config.pipeline.clone(),
        Arc::new(transcoder),
        tracker.clone(),
    );
    let driver = SyncDriver::new(planner, pipeline);

    // The pipeline is drained even when interrupted, so nothing writes to the
    // temp dir or the target once this returns.
    let result = driver.run_until(entries, shutdown_signal()).await;

    if let Some(path) = &config.metrics.textfile {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("{:#}", e);
        }
    }

    match result {
        Ok(_) => Ok(Outcome::Finished),
        Err(PipelineError::Interrupted) => {
            warn!("Interrupted, cleaning up");
            Ok(Outcome::Interrupted)
        }
        Err(e) => Err(e).context("Sync failed"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
