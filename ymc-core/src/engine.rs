//! Game state machine.
//!
//! This module is the single place that mutates a [`GameState`]. Cloning a state is cheap:
//! scorecards and turn are copied, the score table is shared.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::dice::Roll;
use crate::moves::{self, Move, MAX_ROLLS};
use crate::scorecard::Scorecard;
use crate::scoring::ScoreTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Turn started, dice not rolled yet.
    AwaitingRoll,
    /// Dice on the table; the current player must reroll or select.
    AwaitingMove,
    Terminal,
}

/// Dice state of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Turn {
    pub roll: Option<Roll>,
    /// Rolls made this turn, 0 before the first roll.
    pub rolls_used: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("illegal move: {reason}")]
    IllegalMove { reason: &'static str },
    #[error("invalid state: {msg}")]
    InvalidState { msg: &'static str },
}

#[derive(Debug, Clone)]
pub struct GameState {
    table: Arc<ScoreTable>,
    scorecards: Vec<Scorecard>,
    current: usize,
    turn: Turn,
    phase: Phase,
}

impl GameState {
    /// Fresh game with `players` empty scorecards; player 0 to roll.
    pub fn new(table: Arc<ScoreTable>, players: usize) -> Result<Self, ApplyError> {
        Self::from_scorecards(table, vec![Scorecard::new(); players], 0)
    }

    /// Resume at the start of `current`'s turn with the given cards.
    pub fn from_scorecards(
        table: Arc<ScoreTable>,
        scorecards: Vec<Scorecard>,
        current: usize,
    ) -> Result<Self, ApplyError> {
        if scorecards.is_empty() {
            return Err(ApplyError::InvalidState {
                msg: "a game needs at least one player",
            });
        }
        if current >= scorecards.len() {
            return Err(ApplyError::InvalidState {
                msg: "current player out of range",
            });
        }
        let phase = if scorecards.iter().all(Scorecard::is_complete) {
            Phase::Terminal
        } else {
            Phase::AwaitingRoll
        };
        Ok(Self {
            table,
            scorecards,
            current,
            turn: Turn::default(),
            phase,
        })
    }

    pub fn table(&self) -> &Arc<ScoreTable> {
        &self.table
    }

    pub fn num_players(&self) -> usize {
        self.scorecards.len()
    }

    pub fn current_player(&self) -> usize {
        self.current
    }

    pub fn scorecards(&self) -> &[Scorecard] {
        &self.scorecards
    }

    pub fn scorecard(&self, player: usize) -> Option<&Scorecard> {
        self.scorecards.get(player)
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Start the turn with a fresh random roll.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Roll, ApplyError> {
        let roll = Roll::random(rng);
        self.set_roll(roll)?;
        Ok(roll)
    }

    /// Start the turn with dice rolled elsewhere.
    pub fn set_roll(&mut self, roll: Roll) -> Result<(), ApplyError> {
        if self.phase != Phase::AwaitingRoll {
            return Err(ApplyError::InvalidState {
                msg: "dice already rolled this turn",
            });
        }
        self.turn = Turn {
            roll: Some(roll),
            rolls_used: 1,
        };
        self.phase = Phase::AwaitingMove;
        Ok(())
    }

    /// Legal moves for the current player; empty unless awaiting a move.
    pub fn legal_moves(&self) -> Vec<Move> {
        match (self.phase, self.turn.roll) {
            (Phase::AwaitingMove, Some(roll)) => moves::generate(
                &self.table,
                &self.scorecards[self.current],
                &roll,
                self.turn.rolls_used,
            ),
            _ => Vec::new(),
        }
    }

    /// Apply `mv` for the current player. Returns whether the game is now over.
    ///
    /// The caller guarantees a selection targets an open category (moves from
    /// [`GameState::legal_moves`] always do).
    pub fn do_move<R: Rng + ?Sized>(&mut self, mv: &Move, rng: &mut R) -> Result<bool, ApplyError> {
        match self.phase {
            Phase::AwaitingRoll => {
                return Err(ApplyError::InvalidState {
                    msg: "dice not rolled yet",
                })
            }
            Phase::Terminal => return Err(ApplyError::InvalidState { msg: "game is over" }),
            Phase::AwaitingMove => {}
        }

        match mv {
            Move::Reroll { hold } => {
                if self.turn.rolls_used >= MAX_ROLLS {
                    return Err(ApplyError::IllegalMove {
                        reason: "no rerolls left this turn",
                    });
                }
                self.turn.roll = Some(hold.reroll(rng));
                self.turn.rolls_used += 1;
                Ok(false)
            }
            Move::Select { scorecard, .. } => {
                let acting = self.current;
                self.scorecards[acting] = *scorecard;
                self.turn = Turn::default();
                self.current = (acting + 1) % self.scorecards.len();

                let last_seat = acting + 1 == self.scorecards.len();
                if last_seat && scorecard.is_complete() {
                    self.phase = Phase::Terminal;
                    Ok(true)
                } else {
                    self.phase = Phase::AwaitingRoll;
                    Ok(false)
                }
            }
        }
    }

    /// Each player's total score, in seat order.
    pub fn final_scores(&self) -> Vec<u16> {
        self.scorecards.iter().map(Scorecard::total_score).collect()
    }
}
