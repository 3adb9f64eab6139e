//! Per-client game lifecycle controller.
//!
//! Each client owns one [`GameClient`]: an explicit session context holding
//! the store handle, the locally claimed coin slot, and the assigned seat.
//! A fixed-interval poll drives [`GameClient::tick`], which re-evaluates the
//! shared state machine (coin flip → ready → playing → game over → replay or
//! reset) from freshly fetched records and returns a [`ClientView`] for the
//! rendering surface. The store is the only channel between the two clients,
//! so convergence is only guaranteed within one polling interval.

use crate::client::{SharedStore, StoreError};
use crate::game::moves::{self, MoveError};
use crate::game::outcome::{self, WinningLine};
use crate::game::seat::{self, FlipResolution};
use crate::store::records::{
    Cell, CoinFace, CoinSlot, GameStateRecord, GameStatus, PlayerIcon, PlayerRecord, Seat, Winner,
};
use tracing::{debug, info, instrument, warn};

/// Label on the single control element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ControlLabel {
    /// Flip the coin to claim a slot.
    Flip,
    /// Signal the start of play (first mover only).
    Start,
    /// Reset all shared records to defaults.
    Clear,
}

/// The control element as the renderer should present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Current label.
    pub label: ControlLabel,
    /// Whether pressing it does anything right now.
    pub enabled: bool,
}

/// Snapshot of the 16-cell grid for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    cells: [Option<PlayerIcon>; Cell::COUNT],
    winning: Vec<Cell>,
}

impl BoardView {
    fn from_records(one: &PlayerRecord, two: &PlayerRecord, state: &GameStateRecord) -> Self {
        let mut cells = [None; Cell::COUNT];
        for cell in &one.player_held_positions {
            cells[cell.index() as usize] = Some(one.player_icon);
        }
        for cell in &two.player_held_positions {
            cells[cell.index() as usize] = Some(two.player_icon);
        }
        Self {
            cells,
            winning: state.winning_combo.clone(),
        }
    }

    /// An empty board.
    pub fn empty() -> Self {
        Self {
            cells: [None; Cell::COUNT],
            winning: Vec::new(),
        }
    }

    /// The icon occupying a cell, if any.
    pub fn icon_at(&self, cell: Cell) -> Option<PlayerIcon> {
        self.cells[cell.index() as usize]
    }

    /// Whether the cell belongs to the winning line.
    pub fn is_winning(&self, cell: Cell) -> bool {
        self.winning.contains(&cell)
    }
}

/// What one poll tick resolved to, handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientView {
    /// Shared lifecycle phase.
    pub status: GameStatus,
    /// The local seat, once assigned.
    pub seat: Option<Seat>,
    /// Board snapshot.
    pub board: BoardView,
    /// Control element state.
    pub control: Control,
    /// Status line for the user.
    pub message: String,
    /// Whether the local seat may move right now.
    pub my_turn: bool,
}

impl ClientView {
    /// Placeholder view shown before the first poll tick completes.
    pub fn connecting() -> Self {
        Self {
            status: GameStatus::CoinFlip,
            seat: None,
            board: BoardView::empty(),
            control: Control {
                label: ControlLabel::Flip,
                enabled: false,
            },
            message: "Connecting to the state store...".to_string(),
            my_turn: false,
        }
    }
}

/// Result of an attempted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Non-fatal rejection; nothing changed, retry is fine.
    Rejected(MoveError),
    /// Cell claimed, game continues with the other seat.
    Placed(Cell),
    /// Cell claimed and it completed this line.
    Won(WinningLine),
    /// Cell claimed and it filled the board with no line.
    Draw,
}

/// Session context for one client of the shared game.
pub struct GameClient<S> {
    store: S,
    player_name: Option<String>,
    claimed_slot: Option<CoinSlot>,
    seat: Option<Seat>,
}

impl<S: SharedStore> GameClient<S> {
    /// Creates a controller over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            player_name: None,
            claimed_slot: None,
            seat: None,
        }
    }

    /// Sets the display name written into the player record on seat
    /// assignment.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// The locally assigned seat, once the coin flip has resolved.
    pub fn seat(&self) -> Option<Seat> {
        self.seat
    }

    /// Access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flips the coin and claims the first unset slot.
    ///
    /// Returns the local outcome, or `None` when the flip was a no-op (both
    /// slots already set, or this client already flipped).
    #[instrument(skip(self))]
    pub async fn flip(&mut self) -> Result<Option<CoinFace>, StoreError> {
        if self.claimed_slot.is_some() || self.seat.is_some() {
            debug!("flip ignored, already claimed a slot");
            return Ok(None);
        }

        let face = seat::flip_face();
        let mut coin = self.store.get_coin().await?;
        let Some(slot) = seat::claim_slot(&coin) else {
            info!("both coin slots already set, flip is a no-op");
            return Ok(None);
        };

        coin.set_slot(slot, face);
        self.store.put_coin(&coin).await?;
        self.claimed_slot = Some(slot);
        info!(?slot, ?face, "claimed coin slot");
        Ok(Some(face))
    }

    /// Signals the start of play. Only meaningful from the ready phase.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), StoreError> {
        self.store
            .update_game_state(|state| {
                if state.status == GameStatus::Ready {
                    state.status = GameStatus::Playing;
                }
            })
            .await?;
        info!("game started");
        Ok(())
    }

    /// Attempts to claim a cell for the local seat.
    ///
    /// On success the held set is persisted first, then the outcome detector
    /// runs (win before draw), and the turn pointer advances only when the
    /// move did not end the game. Rejections leave all state unchanged.
    #[instrument(skip(self), fields(seat = ?self.seat))]
    pub async fn play(&mut self, cell: Cell) -> Result<MoveOutcome, StoreError> {
        let state = self.store.get_game_state().await?;
        let Some(seat) = self.seat else {
            debug!("move attempted without a seat");
            return Ok(MoveOutcome::Rejected(MoveError::NotYourTurn(
                state.current_player,
            )));
        };

        let mut mine = self.store.get_player(seat).await?;
        let theirs = self.store.get_player(seat.opponent()).await?;

        if let Err(rejection) = moves::validate_move(
            &state,
            seat,
            cell,
            &mine.player_held_positions,
            &theirs.player_held_positions,
        ) {
            info!(%rejection, "move rejected");
            return Ok(MoveOutcome::Rejected(rejection));
        }

        mine.player_held_positions.insert(cell);
        self.store.put_player(seat, &mine).await?;

        if let Some(combo) = outcome::check_win(&mine.player_held_positions) {
            self.store
                .update_player(seat, |p| p.is_previous_winner = true)
                .await?;
            self.store
                .update_game_state(|state| {
                    state.is_game_over = true;
                    state.status = GameStatus::GameOver;
                    state.winner = Winner::Seat(seat);
                    state.winning_combo = combo.to_vec();
                })
                .await?;
            info!(?combo, "move won the game");
            return Ok(MoveOutcome::Won(combo));
        }

        if outcome::is_board_full(&mine.player_held_positions, &theirs.player_held_positions) {
            self.store
                .update_game_state(|state| {
                    state.is_game_over = true;
                    state.status = GameStatus::GameOver;
                    state.winner = Winner::Draw;
                })
                .await?;
            info!("move filled the board, draw");
            return Ok(MoveOutcome::Draw);
        }

        self.store
            .update_game_state(|state| state.current_player = seat.opponent())
            .await?;
        debug!(%cell, "move placed, turn passed");
        Ok(MoveOutcome::Placed(cell))
    }

    /// Rewrites all four records to their defaults and forgets the local
    /// seat and coin slot. Unconditional, regardless of prior state.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.store.reset_all().await?;
        self.claimed_slot = None;
        self.seat = None;
        info!("all records reset to defaults");
        Ok(())
    }

    /// Best-effort reset on client shutdown (the browser original fired
    /// reset beacons from `beforeunload`).
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.clear().await {
            warn!(error = %e, "could not reset records on shutdown");
        }
    }

    /// One poll tick: re-evaluates the state machine against fresh records.
    #[instrument(skip(self), fields(seat = ?self.seat))]
    pub async fn tick(&mut self) -> Result<ClientView, StoreError> {
        let mut message: Option<String> = None;

        // Resolve a pending coin flip before anything else.
        if self.seat.is_none()
            && let Some(slot) = self.claimed_slot
        {
            message = self.monitor_flip(slot).await?;
        }

        let mut state = self.store.get_game_state().await?;
        let mut one = self.store.get_player(Seat::One).await?;
        let mut two = self.store.get_player(Seat::Two).await?;

        if state.is_game_over {
            if let Some(update) = self
                .handle_game_over(&mut state, &mut one, &mut two)
                .await?
            {
                message = Some(update);
            }
        }

        let control = self.control_for(&state);
        let my_turn = !state.is_game_over
            && state.status == GameStatus::Playing
            && self.seat == Some(state.current_player);

        let message = message.unwrap_or_else(|| self.default_message(&state));

        Ok(ClientView {
            status: state.status,
            seat: self.seat,
            board: BoardView::from_records(&one, &two, &state),
            control,
            message,
            my_turn,
        })
    }

    /// Checks both coin slots; the monitor half of the flip protocol.
    async fn monitor_flip(&mut self, slot: CoinSlot) -> Result<Option<String>, StoreError> {
        let coin = self.store.get_coin().await?;
        match seat::resolve(&coin, slot) {
            FlipResolution::Pending => {
                debug!("coin flip still pending");
                Ok(None)
            }
            FlipResolution::Tie(face) => {
                // Unavoidable with two independent fair coins; retried
                // symmetrically rather than broken arbitrarily.
                self.store.reset_coin().await?;
                self.claimed_slot = None;
                info!(?face, "coin flip tied, reflip required");
                Ok(Some(format!("Both players flipped {face:?}. Flip again!")))
            }
            FlipResolution::Assigned(assigned) => {
                self.claimed_slot = None;
                self.adopt_seat(assigned).await?;
                self.store
                    .update_game_state(|state| {
                        if state.status == GameStatus::CoinFlip {
                            state.status = GameStatus::Ready;
                        }
                    })
                    .await?;
                info!(%assigned, "coin flip resolved");
                Ok(Some(format!("Coin flip decided: you are {assigned}.")))
            }
        }
    }

    /// Game-over bookkeeping: acknowledgment, replay seat handoff, and the
    /// final reset once both seats are reassigned.
    async fn handle_game_over(
        &mut self,
        state: &mut GameStateRecord,
        one: &mut PlayerRecord,
        two: &mut PlayerRecord,
    ) -> Result<Option<String>, StoreError> {
        // Both seats reassigned for the replay: any client may perform the
        // reset; the operation is idempotent across both.
        if state.player_1_assigned && state.player_2_assigned {
            self.store.reset_players().await?;
            self.store.reset_game_state().await?;
            self.store.reset_coin().await?;
            self.store
                .update_game_state(|s| s.status = GameStatus::Ready)
                .await?;
            *state = self.store.get_game_state().await?;
            *one = self.store.get_player(Seat::One).await?;
            *two = self.store.get_player(Seat::Two).await?;
            info!("replay handoff complete, new game ready");
            return Ok(Some("Rematch! Previous winner goes first.".to_string()));
        }

        let Some(seat) = self.seat else {
            return Ok(None);
        };
        let my_ack = match seat {
            Seat::One => one.ack_win,
            Seat::Two => two.ack_win,
        };

        // Acknowledge the result exactly once.
        if !my_ack {
            let announcement = match state.winner {
                Winner::Draw => "The game is a draw.".to_string(),
                Winner::Seat(winner) => format!("The winner is {winner}."),
                Winner::Undecided => "The game is over.".to_string(),
            };
            let updated = self
                .store
                .update_player(seat, |p| p.ack_win = true)
                .await?;
            match seat {
                Seat::One => *one = updated,
                Seat::Two => *two = updated,
            }
            info!(%seat, "acknowledged game result");
            return Ok(Some(announcement));
        }

        if one.ack_win && two.ack_win {
            match state.winner {
                // A decided game flows into a replay: the previous winner
                // takes seat 1 and moves first.
                Winner::Seat(_) => {
                    let won_previous = match seat {
                        Seat::One => one.is_previous_winner,
                        Seat::Two => two.is_previous_winner,
                    };
                    let replay_seat = if won_previous { Seat::One } else { Seat::Two };
                    if !state.assigned(replay_seat) {
                        self.seat = Some(replay_seat);
                        *state = self
                            .store
                            .update_game_state(|s| s.set_assigned(replay_seat))
                            .await?;
                        info!(%replay_seat, "claimed replay seat");
                    }
                    return Ok(Some(format!(
                        "Rematch coming up: you will be {replay_seat}."
                    )));
                }
                // Draws (and anything unacknowledgeable) end in an explicit
                // Clear back to the coin flip.
                Winner::Draw | Winner::Undecided => {
                    return Ok(Some("Press Clear to start over.".to_string()));
                }
            }
        }

        Ok(Some("Waiting for the other player...".to_string()))
    }

    /// Writes the local seat and stamps the configured display name into the
    /// seat's record.
    async fn adopt_seat(&mut self, assigned: Seat) -> Result<(), StoreError> {
        self.seat = Some(assigned);
        if let Some(name) = self.player_name.clone() {
            self.store
                .update_player(assigned, |p| p.player_name = name)
                .await?;
        }
        Ok(())
    }

    fn control_for(&self, state: &GameStateRecord) -> Control {
        if state.is_game_over {
            return Control {
                label: ControlLabel::Clear,
                enabled: true,
            };
        }
        match state.status {
            GameStatus::CoinFlip => Control {
                label: ControlLabel::Flip,
                enabled: self.claimed_slot.is_none() && self.seat.is_none(),
            },
            GameStatus::Ready => Control {
                label: ControlLabel::Start,
                enabled: self.seat == Some(state.current_player),
            },
            GameStatus::Playing | GameStatus::GameOver => Control {
                label: ControlLabel::Clear,
                enabled: true,
            },
        }
    }

    fn default_message(&self, state: &GameStateRecord) -> String {
        if state.is_game_over {
            return match state.winner {
                Winner::Draw => "The game is a draw.".to_string(),
                Winner::Seat(winner) => format!("The winner is {winner}."),
                Winner::Undecided => "The game is over.".to_string(),
            };
        }
        match state.status {
            GameStatus::CoinFlip => {
                if self.claimed_slot.is_some() {
                    "Waiting for the other player to flip...".to_string()
                } else {
                    "Flip the coin to decide who goes first.".to_string()
                }
            }
            GameStatus::Ready => {
                if self.seat == Some(state.current_player) {
                    "You go first! Press Start to begin.".to_string()
                } else {
                    "Waiting for opponent to start the game...".to_string()
                }
            }
            GameStatus::Playing => {
                if self.seat == Some(state.current_player) {
                    "Your turn.".to_string()
                } else {
                    format!("Waiting for {}...", state.current_player)
                }
            }
            GameStatus::GameOver => "The game is over.".to_string(),
        }
    }
}
