//! Filmot command-line entry point
//!
//! Searches filmot.com subtitles and prints or saves the YouTube videos
//! found on the first N result pages.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use filmot_core::{
    ClientConfig, DEFAULT_TEMPLATE, FilmotScraper, OutputTemplate, ScraperConfig, render_all,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Find YouTube videos by their subtitles
///
/// Queries filmot.com, collects the ids of every video on the requested
/// result pages and renders them through an output template.
#[derive(Parser, Debug)]
#[command(name = "filmot")]
#[command(version)]
#[command(about = "Find YouTube videos by their subtitles", long_about = None)]
struct Cli {
    /// Search query
    #[arg(short, long)]
    query: String,

    /// File to write results to (results are logged when omitted)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Output items separator; `\n` and `\r` are turned into line breaks
    #[arg(short, long, default_value = ",")]
    separator: String,

    /// Number of result pages to process
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Logging level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info, ignore_case = true)]
    log: LogLevel,

    /// Output format; supports %(yt_url)s and %(video_id)s
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    format: String,

    /// Maximum number of pages fetched at the same time
    #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    concurrency: u32,

    /// Drop repeated video ids, keeping the first occurrence
    #[arg(short, long)]
    unique: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Notset,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn as_level(self) -> Level {
        match self {
            LogLevel::Notset => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log);

    run(cli).await
}

/// Sets up the tracing subscriber; `RUST_LOG` wins over `--log` when set
fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_level().as_str().to_lowercase();
        EnvFilter::new(format!("filmot={0},filmot_core={0},warn", level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Reject bad templates before any request goes out
    let template = OutputTemplate::parse(&cli.format).context("Invalid --format")?;

    let config = ScraperConfig {
        concurrency: cli.concurrency as usize,
        unique: cli.unique,
        ..ScraperConfig::default()
    };
    let scraper = FilmotScraper::with_config(ClientConfig::default(), config)
        .context("Failed to initialize scraper")?;

    let results = scraper.search(&cli.query, cli.pages).await?;

    if results.failed_pages() > 0 {
        tracing::warn!(
            "{} of {} page(s) could not be fetched",
            results.failed_pages(),
            cli.pages
        );
    }

    let joined = render_all(&results.video_ids, &template, &cli.separator);

    let Some(out) = cli.out else {
        tracing::info!("Results: {}", results.len());
        tracing::info!("{}", joined);
        return Ok(());
    };

    tracing::debug!("Results: {}", results.len());
    tracing::debug!("{}", joined);

    match write_output(&out, &joined) {
        Ok(path) => tracing::info!("Wrote {} result(s) to {}", results.len(), path.display()),
        Err(e) => {
            tracing::error!("Failed to write {}: {}", out.display(), e);
            tracing::info!("{}", joined);
        }
    }

    Ok(())
}

/// Writes the joined output verbatim and returns the absolute path written
fn write_output(path: &Path, contents: &str) -> io::Result<PathBuf> {
    let path = std::path::absolute(path)?;
    tracing::debug!("Writing '{}' file", path.display());
    std::fs::write(&path, contents)?;
    Ok(path)
}
