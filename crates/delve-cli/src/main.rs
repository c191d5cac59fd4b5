//! CLI harness for the Delve session progression engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::simulate::Strategy;

#[derive(Parser)]
#[command(
    name = "delve",
    about = "Delve: play and balance a turn-based dungeon crawl",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one session, taking scripted actions room by room
    Play {
        /// Actions to take in order (combat, search, flee). Once they run
        /// out, each room is played according to its category.
        actions: Vec<String>,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Abandon the session after this many actions
        #[arg(long)]
        abandon_after: Option<usize>,

        /// Reward table JSON file (default: built-in table)
        #[arg(short, long)]
        rewards: Option<PathBuf>,

        /// Room catalog JSON file (default: built-in rooms)
        #[arg(long)]
        rooms: Option<PathBuf>,

        /// Print the finished session and its action log as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play many sessions under a fixed strategy and summarize the results
    Simulate {
        /// Number of sessions to play
        #[arg(short = 'n', long, default_value = "1000")]
        runs: usize,

        /// How to pick an action in each room
        #[arg(long, value_enum, default_value = "room")]
        strategy: Strategy,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Reward table JSON file (default: built-in table)
        #[arg(short, long)]
        rewards: Option<PathBuf>,

        /// Room catalog JSON file (default: built-in rooms)
        #[arg(long)]
        rooms: Option<PathBuf>,
    },

    /// Show and check a reward table
    Rewards {
        /// Reward table JSON file (default: built-in table)
        file: Option<PathBuf>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            actions,
            seed,
            abandon_after,
            rewards,
            rooms,
            json,
        } => commands::play::run(commands::play::PlayOptions {
            actions,
            seed,
            abandon_after,
            rewards,
            rooms,
            json,
        }),
        Commands::Simulate {
            runs,
            strategy,
            seed,
            rewards,
            rooms,
        } => commands::simulate::run(runs, strategy, seed, rewards.as_deref(), rooms.as_deref()),
        Commands::Rewards { file, json } => commands::rewards::run(file.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
