//! thumb-regen CLI
//!
//! Walks a wiki's page index and regenerates default-size portrait thumbnails.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thumb_regen::{
    error::Result,
    models::Config,
    pipeline,
    storage,
    utils::console,
    wiki::{HttpWikiClient, WikiClient},
};

/// thumb-regen - Default-size Thumbnail Regenerator
#[derive(Parser, Debug)]
#[command(
    name = "thumb-regen",
    version,
    about = "Regenerates default-size portrait thumbnails across a wiki"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "thumb-regen.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the page index and regenerate thumbnails
    Run {
        /// Resume the page index after this cursor
        #[arg(long)]
        after: Option<String>,

        /// Number of parallel page workers
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Re-examine figures stored by an earlier crawl, without rendering pages
    #[cfg(feature = "sqlite")]
    Rescan {
        /// SQLite database holding the `figure` table
        #[arg(long)]
        pages_db: Option<PathBuf>,

        /// Number of figures examined concurrently
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env()?;

    match cli.command.unwrap_or(Command::Run {
        after: None,
        workers: None,
    }) {
        Command::Run { after, workers } => {
            if let Some(after) = after {
                config.crawler.after = Some(after);
            }
            if let Some(workers) = workers {
                config.crawler.workers = workers;
            }
            config.validate()?;
            console::init(config.logging.show_progress);

            let wiki: Arc<dyn WikiClient> = Arc::new(HttpWikiClient::new(&config)?);
            let store = storage::open_store(&config.image_db_path()).await?;

            log::info!(
                "Crawling {} with {} workers{}",
                config.prefix(),
                config.crawler.workers,
                config
                    .crawler
                    .after
                    .as_deref()
                    .map(|a| format!(" after {a}"))
                    .unwrap_or_default()
            );

            let stats = pipeline::run_regen(&config, wiki, store).await?;
            log::info!(
                "Regenerated {} of {} figures",
                stats.regenerated,
                stats.figures
            );
        }

        #[cfg(feature = "sqlite")]
        Command::Rescan { pages_db, workers } => {
            if let Some(workers) = workers {
                config.crawler.workers = workers;
            }
            config.validate()?;
            console::init(config.logging.show_progress);

            let pages_db = pages_db.unwrap_or_else(|| config.pages_db_path());
            let archive = storage::FigureArchive::open(&pages_db).await?;
            let wiki: Arc<dyn WikiClient> = Arc::new(HttpWikiClient::new(&config)?);
            let store = storage::open_store(&config.image_db_path()).await?;

            log::info!("Rescanning {} from {}", config.prefix(), pages_db.display());

            let stats = pipeline::run_rescan(&config, &archive, wiki, store).await?;
            log::info!(
                "Regenerated {} of {} figures",
                stats.regenerated,
                stats.figures
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK for {}", config.prefix());
            log::info!("  API:       {}", config.api_url());
            log::info!("  Rendering: {}", config.render_url());
            log::info!("  Image db:  {}", config.image_db_path().display());
            log::info!("  Pages db:  {}", config.pages_db_path().display());
        }
    }

    log::info!("Done!");

    Ok(())
}
