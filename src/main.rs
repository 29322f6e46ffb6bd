//! CLI entry point for the chomik-mirror tool.

use anyhow::Result;
use chomik_mirror::Pipeline;
use clap::Parser;
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs).
    // A missing URL exits non-zero with clap's usage message.
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!(
        url = %args.url,
        workers = args.workers,
        output = %args.output.display(),
        "mirror starting"
    );

    let pipeline = Pipeline::new(&args.url, &args.output, usize::from(args.workers));
    let stats = pipeline.run().await;

    info!(
        completed = stats.downloads.completed(),
        failed = stats.downloads.failed(),
        pages_visited = stats.crawl.pages_visited,
        pages_failed = stats.crawl.pages_failed,
        "mirror complete"
    );

    Ok(())
}
