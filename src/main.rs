//! Quadtac - unified CLI
//!
//! Runs the shared state store, the terminal game client, or a one-shot
//! reset of the shared records.

use anyhow::Result;
use clap::Parser;
use quadtac::cli::{Cli, Command};
use quadtac::client::{HttpStore, SharedStore};
use quadtac::config::ClientConfig;
use quadtac::{store, tui};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            data_dir,
        } => {
            init_tracing();
            store::api::serve(&host, port, &data_dir).await
        }
        Command::Play {
            server_url,
            name,
            config,
        } => {
            let mut config = if config.exists() {
                ClientConfig::from_file(&config)?
            } else {
                ClientConfig::default()
            };
            if let Some(url) = server_url {
                config = config.with_server_url(url);
            }
            if let Some(name) = name {
                config = config.with_player_name(name);
            }
            tui::run(config).await
        }
        Command::Reset { server_url } => {
            init_tracing();
            let store = HttpStore::new(&server_url);
            store.reset_all().await?;
            info!(server_url = %server_url, "shared records reset to defaults");
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
