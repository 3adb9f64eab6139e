//! Command-line interface for quadtac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quadtac - two-player networked 4x4 tic-tac-toe
#[derive(Parser, Debug)]
#[command(name = "quadtac")]
#[command(about = "Two-player networked 4x4 tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the shared state store server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory holding the record files
        #[arg(long, default_value = "quadtac_data")]
        data_dir: PathBuf,
    },

    /// Run the terminal game client
    Play {
        /// State store URL
        #[arg(long)]
        server_url: Option<String>,

        /// Display name for this player
        #[arg(short, long)]
        name: Option<String>,

        /// Path to client config file
        #[arg(short, long, default_value = "quadtac.toml")]
        config: PathBuf,
    },

    /// Reset all shared records to their defaults
    Reset {
        /// State store URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,
    },
}
