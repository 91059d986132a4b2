//! Match runner: drives one game ply by ply with a policy per seat.

use std::time::Instant;

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use ymc_core::{ApplyError, GameState, Move, Phase, Roll, Scorecard};

use crate::error::SearchError;
use crate::evaluator::Evaluation;
use crate::policy::Policy;

/// What happened on one ply.
#[derive(Debug, Clone)]
pub struct PlyRecord {
    pub ply: u32,
    pub player: usize,
    /// Dice the move was chosen for.
    pub roll: Roll,
    pub rolls_used: u8,
    /// Every legal move the policy chose from.
    pub moves: Vec<Move>,
    pub chosen_index: usize,
    pub chosen: Move,
    pub evaluation: Option<Evaluation>,
    pub terminal: bool,
}

#[derive(Debug, Clone)]
pub struct GameSummary {
    pub plies: u32,
    pub scorecards: Vec<Scorecard>,
    pub scores: Vec<u16>,
    /// Seat with the strictly highest score; `None` on a tie.
    pub winner: Option<usize>,
}

pub struct Match {
    state: GameState,
    policies: Vec<Policy>,
    rng: ChaCha8Rng,
    ply: u32,
}

impl Match {
    /// `policies[i]` plays seat `i`; dice come from a stream seeded with `seed`.
    pub fn new(state: GameState, policies: Vec<Policy>, seed: u64) -> Result<Self, SearchError> {
        if policies.len() != state.num_players() {
            return Err(SearchError::InvalidConfig(
                "need exactly one policy per player",
            ));
        }
        Ok(Self {
            state,
            policies,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ply: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Roll if the turn just started, let the seat's policy pick, apply the move.
    pub fn step(&mut self) -> Result<PlyRecord, SearchError> {
        match self.state.phase() {
            Phase::Terminal => {
                return Err(ApplyError::InvalidState { msg: "game is over" }.into());
            }
            Phase::AwaitingRoll => {
                self.state.roll(&mut self.rng)?;
            }
            Phase::AwaitingMove => {}
        }

        let player = self.state.current_player();
        let turn = self.state.turn();
        let roll = turn.roll.ok_or(ApplyError::InvalidState {
            msg: "no dice on the table",
        })?;
        let moves = self.state.legal_moves();

        let policy = &mut self.policies[player];
        let deadline = Instant::now() + policy.budget().unwrap_or_default();
        let decision = policy.pick_move(deadline, &self.state, &moves)?;
        let chosen = moves[decision.index];
        let terminal = self.state.do_move(&chosen, &mut self.rng)?;

        let record = PlyRecord {
            ply: self.ply,
            player,
            roll,
            rolls_used: turn.rolls_used,
            moves,
            chosen_index: decision.index,
            chosen,
            evaluation: decision.evaluation,
            terminal,
        };
        self.ply += 1;
        Ok(record)
    }

    /// Play to the end.
    pub fn run(&mut self) -> Result<GameSummary, SearchError> {
        self.run_with(|_| {})
    }

    /// Play to the end, handing every ply to `on_ply` as it happens.
    pub fn run_with<F: FnMut(&PlyRecord)>(&mut self, mut on_ply: F) -> Result<GameSummary, SearchError> {
        while !self.is_over() {
            let record = self.step()?;
            on_ply(&record);
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> GameSummary {
        let scores = self.state.final_scores();
        let best = scores.iter().copied().max().unwrap_or(0);
        let leaders: Vec<usize> = (0..scores.len()).filter(|&i| scores[i] == best).collect();
        let winner = match leaders.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        GameSummary {
            plies: self.ply,
            scorecards: self.state.scorecards().to_vec(),
            scores,
            winner,
        }
    }
}
