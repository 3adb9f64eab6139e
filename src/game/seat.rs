//! Coin-flip seat assignment.
//!
//! Two anonymous clients each flip a fair coin and record the result in the
//! shared coin record, claiming whichever slot is still unset. Once both
//! slots are filled the flip resolves: differing faces assign seats, equal
//! faces are a tie and force a symmetric reflip. The record plus independent
//! polling is the only synchronization primitive between the clients.

use crate::store::records::{CoinFace, CoinRecord, CoinSlot, Seat};
use rand::Rng;
use tracing::instrument;

/// Generates a uniform heads/tails outcome for the local client.
pub fn flip_face() -> CoinFace {
    if rand::thread_rng().gen_bool(0.5) {
        CoinFace::Heads
    } else {
        CoinFace::Tails
    }
}

/// Picks the slot a flipping client should claim: the first unset one.
///
/// Returns `None` when both slots are already set; the flip is complete and
/// a further flip is a no-op.
#[instrument(ret)]
pub fn claim_slot(coin: &CoinRecord) -> Option<CoinSlot> {
    if coin.coin_1.is_none() {
        Some(CoinSlot::One)
    } else if coin.coin_2.is_none() {
        Some(CoinSlot::Two)
    } else {
        None
    }
}

/// What a polling client learned from the current coin record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipResolution {
    /// At least one slot is still unset; keep polling.
    Pending,
    /// Both slots show the given face. The coin must be reset and both
    /// clients must flip again; breaking the tie arbitrarily would be unfair.
    Tie(CoinFace),
    /// The flip is decided; the local client takes this seat.
    Assigned(Seat),
}

/// Resolves the flip from the local client's point of view.
///
/// `claimed` is the slot this client wrote during its flip. Tie-break rule:
/// the client whose claimed slot reads heads takes seat 1, the other seat 2.
#[instrument(ret)]
pub fn resolve(coin: &CoinRecord, claimed: CoinSlot) -> FlipResolution {
    let (Some(one), Some(two)) = (coin.coin_1, coin.coin_2) else {
        return FlipResolution::Pending;
    };

    if one == two {
        return FlipResolution::Tie(one);
    }

    match coin.slot(claimed) {
        Some(CoinFace::Heads) => FlipResolution::Assigned(Seat::One),
        _ => FlipResolution::Assigned(Seat::Two),
    }
}
