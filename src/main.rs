use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ayah_reel::{
    composition::CompositionEngine,
    config::Config,
    error::{EncodeError, ReelError},
    media::{FfmpegEncoder, MediaEncoder, WorkPaths},
    quran::{QuranApiClient, SurahCatalog},
    session::{Session, ShutdownToken},
    text::FontResolver,
};

#[derive(Parser)]
#[command(
    name = "ayah-reel",
    version,
    about = "Continuously turn random Quranic verses into narrated videos",
    long_about = "Ayah-Reel picks a random verse, renders it with its translation onto a decorated frame, \
                  pairs the frame with the verse recitation and writes an MP4, repeating until Ctrl-C."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many videos have been attempted
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Seed for verse selection
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for finished videos
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(path) = cli.write_config {
        Config::default()
            .save_to_file(&path)
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        info!("Default configuration written to {:?}", path);
        return Ok(());
    }

    info!("Starting Ayah-Reel v{}", env!("CARGO_PKG_VERSION"));
    info!("Press Ctrl+C to stop the program safely.");

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    if cli.count.is_some() {
        config.session.max_verses = cli.count;
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e.user_message()))?;

    // Working directories
    WorkPaths::new(&config.paths)
        .ensure_dirs()
        .context("Could not create working directories")?;
    if let Some(assets) = config.fonts.download_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(assets).with_context(|| format!("Could not create {:?}", assets))?;
    }

    // Surah index is required
    let catalog = SurahCatalog::load(&config.catalog.path).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    info!("Loaded {} surahs from {:?}", catalog.len(), config.catalog.path);

    let http = reqwest::Client::builder()
        .user_agent(concat!("ayah-reel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Could not build HTTP client")?;

    let fonts = FontResolver::new(config.fonts.clone(), http.clone()).resolve().await;

    let encoder = FfmpegEncoder::new(config.encoder.clone());
    if !encoder.is_available().await {
        let unavailable = ReelError::from(EncodeError::Unavailable {
            program: config.encoder.ffmpeg.clone(),
        });
        warn!("{} Audio will not be enhanced and videos will fail to mux.", unavailable.user_message());
    }

    let source = QuranApiClient::with_client(http, &config.api);
    let engine = CompositionEngine::new(config.clone(), fonts, source, encoder);

    let shutdown = ShutdownToken::new();
    let _signal = shutdown.listen_for_ctrl_c();

    let report = Session::new(&catalog, &engine, shutdown)
        .with_pause(config.session.pause())
        .with_max_verses(config.session.max_verses)
        .with_seed(config.session.seed)
        .run()
        .await;

    info!(
        "Session finished: {} created, {} failed, in {}s",
        report.succeeded,
        report.failed(),
        report.elapsed().num_seconds()
    );
    Ok(())
}
