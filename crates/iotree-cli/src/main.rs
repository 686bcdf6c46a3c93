#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "iotree: tech-tree depth layering for input-output coefficient tables",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Path to a pipeline config TOML (threshold, cycle policy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the edge threshold from the config.
    #[arg(long, global = true)]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full pipeline and print the tiered layering",
        long_about = "Extract edges, resolve cycles per the configured policy, select the \
                      trunk, and print one tier of sectors per depth level.",
        after_help = "EXAMPLES:\n    # Layer a table with the default strict policy\n    iotree tiers table.csv\n\n    # Break cycles by removing the lightest edge\n    iotree tiers table.csv --config iotree.toml\n\n    # Emit machine-readable output\n    iotree tiers table.csv --json"
    )]
    Tiers(cmd::tiers::TiersArgs),

    #[command(
        about = "List the thresholded dependency edges",
        after_help = "EXAMPLES:\n    # List edges at the configured threshold\n    iotree edges table.csv\n\n    # Try a looser threshold\n    iotree edges table.csv --threshold 0.03"
    )]
    Edges(cmd::edges::EdgesArgs),

    #[command(
        about = "Report dependency cycles in the extracted graph",
        long_about = "Enumerate cycles without removing any edges, with candidate \
                      back-edges for authoring a named_removals list.",
        after_help = "EXAMPLES:\n    # Show cycles and their back-edges\n    iotree cycles table.csv\n\n    # Emit machine-readable output\n    iotree cycles table.csv --json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Print summary statistics for the extracted graph",
        after_help = "EXAMPLES:\n    # Show node/edge counts, density, cycles\n    iotree stats table.csv"
    )]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("IOTREE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "iotree=debug,info"
        } else {
            "iotree=info,warn"
        })
    });

    let format = env::var("IOTREE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json().with_ansi(false)).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Tiers(ref args) => {
            cmd::tiers::run_tiers(args, config_path, cli.threshold, output)
        }
        Commands::Edges(ref args) => {
            cmd::edges::run_edges(args, config_path, cli.threshold, output)
        }
        Commands::Cycles(ref args) => {
            cmd::cycles::run_cycles(args, config_path, cli.threshold, output)
        }
        Commands::Stats(ref args) => {
            cmd::stats::run_stats(args, config_path, cli.threshold, output)
        }
    }
}
