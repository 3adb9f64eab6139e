//! Terminal client for quadtac.

mod app;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Instant;
use tokio::time::Duration;
use tracing::{error, info};

use crate::client::HttpStore;
use crate::config::ClientConfig;
use crate::game::GameClient;
use app::{App, KeyOutcome};

/// Runs the terminal client against the configured store.
pub async fn run(config: ClientConfig) -> Result<()> {
    // Log to a file so tracing output does not fight the alternate screen.
    let log_file = std::fs::File::create("quadtac_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), player = %config.player_name(), "starting client");

    let store = HttpStore::new(config.server_url());
    let controller = GameClient::new(store).with_player_name(config.player_name());
    let mut app = App::new(controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app, config.poll_interval()).await;

    // Mirror the browser original's unload beacons before restoring the
    // terminal.
    app.shutdown().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "client loop error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Draw, read keys, and tick the controller on the poll interval.
async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    poll_interval: Duration,
) -> Result<()> {
    app.poll().await;
    let mut last_poll = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code).await == KeyOutcome::Exit
        {
            info!("exit requested");
            return Ok(());
        }

        if last_poll.elapsed() >= poll_interval {
            app.poll().await;
            last_poll = Instant::now();
        }
    }
}
