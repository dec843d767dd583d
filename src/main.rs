//! Command-line entry point for podcast-dl.

use clap::Parser;
use podcast_dl::{Config, PodcastDownloader};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "podcast-dl",
    version,
    about = "Download podcast episodes from a feed URL, oldest first"
)]
struct Cli {
    /// URL of the podcast RSS or Atom feed
    feed_url: String,

    /// Directory to save episodes (default: ./podcast_episodes/<podcast title>)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of concurrent downloads (minimum 1)
    #[arg(short = 'j', long, default_value_t = 3)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        feed_url: cli.feed_url,
        output_dir: cli.output,
        concurrency: cli.concurrency,
        ..Config::default()
    };

    let downloader = match PodcastDownloader::new(config) {
        Ok(downloader) => downloader,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match downloader.run().await {
        Ok(summary) => {
            println!("\n--- Download Summary ---");
            println!("Podcast: {}", summary.podcast_title);
            println!("Output Directory: {}", summary.output_dir.display());
            println!("Total episodes in feed: {}", summary.total_episodes);
            println!("Successfully downloaded (new): {}", summary.newly_downloaded);
            println!(
                "Already existed & complete (skipped): {}",
                summary.already_existed
            );
            println!("Failed/Skipped (no link/error): {}", summary.failed);
            println!("------------------------");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
