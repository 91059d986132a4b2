//! Random-policy playouts.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use ymc_core::{ApplyError, GameState, Move, Phase};

/// Outcome of one playout, from the point of view of the player who made the first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutResult {
    pub move_index: usize,
    pub score: u16,
    /// Final score at least as high as every opponent's (ties count).
    pub won: bool,
}

/// Play `state` to the end with uniformly random moves for every seat.
///
/// `cancel` is checked at the start of every turn. Returns `Ok(false)` if cancelled before
/// the game finished.
pub fn random_playout<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<bool, ApplyError> {
    loop {
        match state.phase() {
            Phase::Terminal => return Ok(true),
            Phase::AwaitingRoll => {
                if cancel.load(Ordering::Relaxed) {
                    return Ok(false);
                }
                state.roll(rng)?;
            }
            Phase::AwaitingMove => {}
        }

        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(ApplyError::InvalidState {
                msg: "no legal moves before the game ended",
            });
        }
        let pick = rng.gen_range(0..moves.len());
        state.do_move(&moves[pick], rng)?;
    }
}

/// Apply `moves[move_index]` to a copy of `base`, then play the game out at random.
///
/// `Ok(None)` means the rollout was cancelled.
pub fn rollout<R: Rng + ?Sized>(
    base: &GameState,
    moves: &[Move],
    move_index: usize,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<Option<RolloutResult>, ApplyError> {
    let me = base.current_player();
    let mut state = base.clone();
    state.do_move(&moves[move_index], rng)?;
    if !random_playout(&mut state, rng, cancel)? {
        return Ok(None);
    }

    let scores = state.final_scores();
    let score = scores[me];
    let won = scores
        .iter()
        .enumerate()
        .all(|(p, &s)| p == me || score >= s);
    Ok(Some(RolloutResult {
        move_index,
        score,
        won,
    }))
}
