//! Parallel, time-bounded Monte Carlo move evaluation.
//!
//! A fixed pool of scoped worker threads samples candidate moves uniformly, plays each one
//! out at random and hands the result over a rendezvous channel. The calling thread is the
//! only aggregator. At the deadline it raises the cancel flag and drops the receiver, so a
//! worker blocked in `send` gets an error and exits; `thread::scope` joins them all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use ymc_core::{ApplyError, GameState, Move, Phase, SearchConfig};

use crate::error::SearchError;
use crate::rollout::{rollout, RolloutResult};
use crate::stats::{rank, MoveStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub workers: usize,
    /// Wall-clock budget used by [`Evaluator::evaluate`].
    pub budget: Duration,
    pub top_n: usize,
    /// Seed of the master stream that worker seeds are drawn from.
    pub seed: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            workers: 32,
            budget: Duration::from_millis(500),
            top_n: 100,
            seed: 0,
        }
    }
}

impl From<&SearchConfig> for EvaluatorConfig {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            workers: cfg.workers,
            budget: Duration::from_millis(cfg.budget_ms),
            top_n: cfg.top_n,
            seed: cfg.seed,
        }
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Chosen move index.
    pub best: usize,
    /// All move indices, best first.
    pub ranking: Vec<usize>,
    /// Per-move statistics, indexed like the candidate list.
    pub stats: Vec<MoveStats>,
    pub rollouts: u64,
    pub elapsed: Duration,
    /// No rollout finished in time; `best` is the greedy pick.
    pub fallback: bool,
}

pub struct Evaluator {
    cfg: EvaluatorConfig,
    master: ChaCha8Rng,
}

impl Evaluator {
    pub fn new(cfg: EvaluatorConfig) -> Result<Self, SearchError> {
        if cfg.workers == 0 {
            return Err(SearchError::InvalidConfig("workers must be > 0"));
        }
        if cfg.top_n == 0 {
            return Err(SearchError::InvalidConfig("top_n must be > 0"));
        }
        if cfg.budget.is_zero() {
            return Err(SearchError::InvalidConfig("budget must be > 0"));
        }
        let master = ChaCha8Rng::seed_from_u64(cfg.seed);
        Ok(Self { cfg, master })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.cfg
    }

    /// One seed per worker, drawn from the master stream. Each call advances it.
    pub(crate) fn worker_seeds(&mut self) -> Vec<u64> {
        (0..self.cfg.workers)
            .map(|i| splitmix64(self.master.next_u64() ^ i as u64))
            .collect()
    }

    /// Evaluate with the configured budget starting now.
    pub fn evaluate(&mut self, state: &GameState, moves: &[Move]) -> Result<Evaluation, SearchError> {
        let deadline = Instant::now() + self.cfg.budget;
        self.evaluate_until(deadline, state, moves)
    }

    /// Rank `moves` (the legal moves of `state`) by sampling until `deadline`.
    pub fn evaluate_until(
        &mut self,
        deadline: Instant,
        state: &GameState,
        moves: &[Move],
    ) -> Result<Evaluation, SearchError> {
        let start = Instant::now();
        if state.num_players() != 2 {
            return Err(SearchError::PlayerCount {
                got: state.num_players(),
            });
        }
        if moves.is_empty() {
            return Err(SearchError::NoMoves);
        }
        if state.phase() != Phase::AwaitingMove {
            return Err(ApplyError::InvalidState {
                msg: "evaluation needs dice on the table",
            }
            .into());
        }

        let seeds = self.worker_seeds();
        let cancel = AtomicBool::new(false);
        let mut stats = vec![MoveStats::new(self.cfg.top_n); moves.len()];
        let mut rollouts = 0u64;
        let mut failure: Option<ApplyError> = None;

        thread::scope(|scope| {
            let (tx, rx) = mpsc::sync_channel::<Result<RolloutResult, ApplyError>>(0);
            for seed in seeds {
                let tx = tx.clone();
                let cancel = &cancel;
                scope.spawn(move || worker_loop(state, moves, seed, cancel, tx));
            }
            drop(tx);

            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                match rx.recv_timeout(deadline - now) {
                    Ok(Ok(r)) => {
                        stats[r.move_index].record(r.score, r.won);
                        rollouts += 1;
                    }
                    Ok(Err(e)) => {
                        failure = Some(e);
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            cancel.store(true, Ordering::Relaxed);
            drop(rx);
        });

        if let Some(e) = failure {
            return Err(e.into());
        }

        let ranking = rank(&stats);
        let (best, fallback) = if rollouts == 0 {
            (greedy_index(state, moves), true)
        } else {
            (ranking[0], false)
        };

        Ok(Evaluation {
            best,
            ranking,
            stats,
            rollouts,
            elapsed: start.elapsed(),
            fallback,
        })
    }
}

fn worker_loop(
    base: &GameState,
    moves: &[Move],
    seed: u64,
    cancel: &AtomicBool,
    tx: SyncSender<Result<RolloutResult, ApplyError>>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    while !cancel.load(Ordering::Relaxed) {
        let move_index = rng.gen_range(0..moves.len());
        let msg = match rollout(base, moves, move_index, &mut rng, cancel) {
            Ok(Some(r)) => Ok(r),
            Ok(None) => return,
            Err(e) => Err(e),
        };
        let failed = msg.is_err();
        if tx.send(msg).is_err() || failed {
            return;
        }
    }
}

/// Select with the largest immediate gain in total score (first on ties), else 0.
pub(crate) fn greedy_index(state: &GameState, moves: &[Move]) -> usize {
    let before = state
        .scorecard(state.current_player())
        .map(|c| c.total_score())
        .unwrap_or(0);
    let mut best: Option<(usize, u16)> = None;
    for (i, m) in moves.iter().enumerate() {
        if let Some(after) = m.scorecard() {
            let gain = after.total_score().saturating_sub(before);
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((i, gain));
            }
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// SplitMix64 finalizer, used to derive independent seeds from one value.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
