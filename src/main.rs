use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use longform::batch::{self, Mode};
use longform::discovery::{self, DiscoveryConfig};
use longform::{Recognizer, RecognizerConfig};

#[derive(Parser, Debug)]
#[command(name = "longform")]
#[command(about = "Recognize and strip shortform defining patterns in text documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the groundings defined in each document as JSON lines
    Recognize(RunArgs),
    /// Write a copy of each document with defining patterns removed
    Strip(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Root directory to scan for documents
    root_dir: PathBuf,

    /// Recognizer config (shortform, window, exclude, grounding_map) as JSON
    #[arg(long)]
    config: PathBuf,

    /// File name pattern matched at any depth below the root
    #[arg(long, default_value = "*.txt")]
    pattern: String,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging keeps stdout free for JSON-lines results
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    let (mode, args) = match cli.command {
        Command::Recognize(args) => (Mode::Recognize, args),
        Command::Strip(args) => (Mode::Strip, args),
    };

    // WHY: validate root directory exists early to fail fast with clear error
    if !args.root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let config = RecognizerConfig::load(&args.config).await?;
    let recognizer = Arc::new(Recognizer::from_config(&config)?);
    info!(
        shortform = recognizer.shortform(),
        longforms = recognizer.index().len(),
        window = recognizer.window(),
        "Recognizer ready"
    );

    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
        pattern: args.pattern.clone(),
    };
    let discovered = discovery::collect_discovered_files(&args.root_dir, discovery_config).await?;
    let paths: Vec<PathBuf> = discovered
        .into_iter()
        .filter(|f| f.error.is_none())
        .map(|f| f.path)
        .collect();

    let stats = batch::process_documents(recognizer, paths, mode, args.fail_fast).await?;

    if mode == Mode::Recognize {
        for document in stats.iter().filter(|s| s.is_success()) {
            let line = serde_json::json!({
                "path": document.path,
                "groundings": document.groundings,
            });
            println!("{line}");
        }
    }

    let failed = stats.iter().filter(|s| !s.is_success()).count();
    eprintln!(
        "longform v{} - processed {} documents, {} failed",
        env!("CARGO_PKG_VERSION"),
        stats.len(),
        failed
    );

    if let Some(stats_out) = &args.stats_out {
        batch::write_stats(stats_out, &stats).await?;
        info!("Wrote run stats to {}", stats_out.display());
    }

    Ok(())
}
