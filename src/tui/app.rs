//! Application state and input handling for the terminal client.

use crate::client::{HttpStore, StoreError};
use crate::game::{ClientView, ControlLabel, GameClient, MoveOutcome};
use crate::store::records::Cell;
use crossterm::event::KeyCode;
use tracing::{debug, warn};

/// Whether the main loop should keep running after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the client.
    Exit,
}

/// Main application state: the lifecycle controller plus cursor and the
/// latest view of the shared game.
pub struct App {
    controller: GameClient<HttpStore>,
    view: ClientView,
    cursor: Cell,
    notice: Option<String>,
}

impl App {
    /// Creates the application around a controller.
    pub fn new(controller: GameClient<HttpStore>) -> Self {
        Self {
            controller,
            view: ClientView::connecting(),
            cursor: Cell::raw(0),
            notice: None,
        }
    }

    /// The latest view of the shared game.
    pub fn view(&self) -> &ClientView {
        &self.view
    }

    /// The cell the cursor is on.
    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    /// The line to show in the status bar: a transient notice from the last
    /// action, or the controller's message for the current phase.
    pub fn status_line(&self) -> &str {
        self.notice.as_deref().unwrap_or(&self.view.message)
    }

    /// Runs one poll tick. Store failures are surfaced in the status line
    /// and leave the previous view untouched; the next tick retries reads.
    pub async fn poll(&mut self) {
        match self.controller.tick().await {
            Ok(view) => {
                self.notice = None;
                self.view = view;
            }
            Err(e) => {
                warn!(error = %e, "poll tick failed");
                self.notice = Some(format!("Store error: {e}"));
            }
        }
    }

    /// Handles a key press.
    pub async fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Exit,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Enter => self.claim_cursor_cell().await,
            KeyCode::Char(' ') => self.press_control().await,
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Resets the shared records on the way out, mirroring the browser
    /// original's unload beacons.
    pub async fn shutdown(&mut self) {
        self.controller.shutdown().await;
    }

    fn move_cursor(&mut self, row_delta: i8, col_delta: i8) {
        let row = (self.cursor.row() as i8 + row_delta).rem_euclid(4) as u8;
        let col = (self.cursor.col() as i8 + col_delta).rem_euclid(4) as u8;
        if let Some(cell) = Cell::new(row * 4 + col) {
            self.cursor = cell;
        }
    }

    async fn claim_cursor_cell(&mut self) {
        debug!(cell = %self.cursor, "cell pressed");
        match self.controller.play(self.cursor).await {
            Ok(MoveOutcome::Rejected(rejection)) => {
                self.notice = Some(rejection.to_string());
            }
            Ok(_) => self.refresh().await,
            Err(e) => self.store_error(e),
        }
    }

    async fn press_control(&mut self) {
        if !self.view.control.enabled {
            return;
        }
        debug!(label = %self.view.control.label, "control pressed");
        let result = match self.view.control.label {
            ControlLabel::Flip => match self.controller.flip().await {
                Ok(None) => {
                    self.notice = Some("Both players have already flipped.".to_string());
                    return;
                }
                Ok(Some(_)) => Ok(()),
                Err(e) => Err(e),
            },
            ControlLabel::Start => self.controller.start().await,
            ControlLabel::Clear => self.controller.clear().await,
        };
        match result {
            Ok(()) => self.refresh().await,
            Err(e) => self.store_error(e),
        }
    }

    /// Re-polls right away so the action's effect shows without waiting a
    /// full interval.
    async fn refresh(&mut self) {
        self.poll().await;
    }

    fn store_error(&mut self, e: StoreError) {
        warn!(error = %e, "store operation failed");
        self.notice = Some(format!("Store error: {e}"));
    }
}
