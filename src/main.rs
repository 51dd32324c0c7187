use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use connect_four_minimax::adapter::{MoveRequest, MoveService};
use connect_four_minimax::ai::{MoveRecord, SearchHistory};
use connect_four_minimax::config::AppConfig;

/// Answer four-in-a-row move requests, one JSON object per line.
///
/// Each input line looks like `{"board": [[0,0,...], ...]}` with rows listed
/// top-down; each output line is `{"column": n}`.
#[derive(Parser)]
#[command(name = "connect-four-minimax", about = "Pick a column for a four-in-a-row position")]
struct Cli {
    /// Read requests from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Choose the depth from the board width
    #[arg(long)]
    adaptive_depth: bool,

    /// Log a search summary after the last request
    #[arg(long)]
    stats: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("connect_four_minimax=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    if cli.adaptive_depth {
        config.search.adaptive_depth = true;
    }
    config.validate().context("validating config overrides")?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let service = MoveService::from_config(&config);
    let mut history = SearchHistory::new();
    let mut stdout = io::stdout().lock();

    for line in reader.lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }

        let request = MoveRequest::from_json(&line).unwrap_or_else(|err| {
            warn!(error = %err, "unreadable request, treating it as a missing board");
            MoveRequest::default()
        });

        let started = Instant::now();
        let decision = service.decide(&request);
        if let Some(outcome) = &decision.outcome {
            history.record(MoveRecord::from_outcome(outcome, started.elapsed()));
            if let Some(record) = history.last() {
                debug!(
                    column = record.column,
                    nodes = record.nodes_expanded,
                    ms = record.elapsed.as_secs_f64() * 1000.0,
                    "request answered"
                );
            }
        }

        serde_json::to_writer(&mut stdout, &decision.response).context("writing response")?;
        writeln!(stdout).context("writing response")?;
        stdout.flush().context("flushing response")?;
    }

    if cli.stats && !history.is_empty() {
        info!(
            moves = history.total_moves(),
            total_nodes = history.total_nodes(),
            avg_nodes = history.average_nodes(history.len()),
            avg_pruned = history.average_pruned(history.len()),
            avg_ms = history.average_elapsed(history.len()).as_secs_f64() * 1000.0,
            "search summary"
        );
    }

    Ok(())
}
