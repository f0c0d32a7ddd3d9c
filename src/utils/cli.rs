use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::consts::START_FEN;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION") )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Turn on debug logging on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Mirror debug logs to a file under /tmp/krait_logs
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a position and report the best move found
    Analyze {
        /// FEN string of the position to search
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// Iterative deepening depth limit
        #[arg(short, long, default_value = "6")]
        depth: u8,
        /// Soft time budget in milliseconds, checked between depth passes
        #[arg(short, long)]
        time_ms: Option<u64>,
        /// TOML file overriding the default search configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play against the engine on the terminal, moves in UCI notation
    Play {
        /// FEN string for the starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// Engine search depth per move
        #[arg(short, long, default_value = "5")]
        depth: u8,
    },

    /// Search a fixed set of positions and report node counts
    Bench {
        /// Depth searched for every benchmark position
        #[arg(short, long, default_value = "5")]
        depth: u8,
    },
}
