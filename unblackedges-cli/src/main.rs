use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use unblackedges::pipeline::{self, Emit, PipelineConfig};
use unblackedges::{MarkStrategy, MarkerConfig};

/// Remove black edges from a scanned PBM page.
///
/// Black pixels joined to the page border through 4-adjacent black pixels are
/// cleared; the result is written to stdout as a plain PBM.
#[derive(Parser)]
#[command(name = "unblackedges", version)]
struct Args {
    /// Input bitmap (PBM, P1 or P4). Reads stdin when omitted.
    files: Vec<PathBuf>,

    /// How border connectivity is propagated
    #[arg(long, value_enum, default_value_t = Strategy::Relaxation)]
    strategy: Strategy,

    /// Write the black-edge mask instead of the cleaned image
    #[arg(long)]
    mask: bool,

    /// Print marking statistics as JSON on stderr
    #[arg(long)]
    stats: bool,

    /// Suppress the summary on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Relaxation,
    FloodFill,
}

impl From<Strategy> for MarkStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Relaxation => MarkStrategy::Relaxation,
            Strategy::FloodFill => MarkStrategy::FloodFill,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let path = pipeline::input_path(&args.files)?;
    let config = PipelineConfig {
        marker: MarkerConfig {
            strategy: args.strategy.into(),
        },
        emit: if args.mask { Emit::Mask } else { Emit::Cleaned },
    };

    let source = path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    let stdout = io::stdout().lock();
    let summary = pipeline::run(path, stdout, &config)
        .with_context(|| format!("failed to process {source}"))?;

    if !args.quiet {
        eprintln!(
            "{source}: {}x{}, {} black-edge pixels in {} passes",
            summary.width, summary.height, summary.marking.marked, summary.marking.passes
        );
    }
    if args.stats {
        let json = serde_json::to_string(&summary)?;
        writeln!(io::stderr(), "{json}")?;
    }
    log::debug!("finished {source}");

    Ok(())
}
