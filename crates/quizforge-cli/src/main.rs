//! quizforge CLI — the operator-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Deterministic abstract-reasoning question bank generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a question bank from a manifest
    Generate {
        /// Manifest TOML (default: config `manifest`, else the built-in standard manifest)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Override the manifest seed
        #[arg(long)]
        seed: Option<u32>,

        /// Bank file to write (default: config `data_dir`/`bank_file`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Append to the existing bank instead of replacing it
        #[arg(long)]
        merge: bool,

        /// Validate and summarize without writing
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate an existing bank
    Validate {
        /// Bank JSON file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Normalize explanation and text fields of one or more banks
    Repair {
        /// Bank JSON file (repeatable)
        #[arg(long, required = true)]
        bank: Vec<PathBuf>,

        /// Report needed fixes without writing; exit 1 if any
        #[arg(long)]
        check: bool,
    },

    /// Category and difficulty counts for a bank
    Stats {
        /// Bank JSON file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Weakness analysis of a study log
    Weakness {
        /// Study log JSON export
        #[arg(long)]
        log: PathBuf,

        /// Bank to draw a targeted drill from
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Drill size
        #[arg(long, default_value = "20")]
        count: usize,
    },

    /// Create starter config and the standard manifest
    Init,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quizforge_core=info,quizforge_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            manifest,
            seed,
            output,
            merge,
            dry_run,
            config,
        } => commands::generate::execute(manifest, seed, output, merge, dry_run, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Repair { bank, check } => commands::repair::execute(bank, check),
        Commands::Stats { bank } => commands::stats::execute(bank),
        Commands::Weakness { log, bank, count } => commands::weakness::execute(log, bank, count),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
