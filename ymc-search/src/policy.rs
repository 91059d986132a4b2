//! Player policies.

use std::time::{Duration, Instant};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use ymc_core::{GameState, Move};

use crate::error::SearchError;
use crate::evaluator::{Evaluation, Evaluator, EvaluatorConfig};

/// A chosen move index, plus search statistics when a search ran.
#[derive(Debug, Clone)]
pub struct Decision {
    pub index: usize,
    pub evaluation: Option<Evaluation>,
}

/// Uniformly random choice.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn pick_move(&mut self, moves: &[Move]) -> Result<Decision, SearchError> {
        if moves.is_empty() {
            return Err(SearchError::NoMoves);
        }
        Ok(Decision {
            index: self.rng.gen_range(0..moves.len()),
            evaluation: None,
        })
    }
}

/// Monte Carlo search over random playouts.
pub struct MonteCarloPolicy {
    evaluator: Evaluator,
}

impl MonteCarloPolicy {
    pub fn new(cfg: EvaluatorConfig) -> Result<Self, SearchError> {
        Ok(Self {
            evaluator: Evaluator::new(cfg)?,
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        self.evaluator.config()
    }

    pub fn pick_move(
        &mut self,
        deadline: Instant,
        state: &GameState,
        moves: &[Move],
    ) -> Result<Decision, SearchError> {
        let evaluation = self.evaluator.evaluate_until(deadline, state, moves)?;
        Ok(Decision {
            index: evaluation.best,
            evaluation: Some(evaluation),
        })
    }
}

pub enum Policy {
    Random(RandomPolicy),
    MonteCarlo(MonteCarloPolicy),
}

impl Policy {
    pub fn random(seed: u64) -> Self {
        Policy::Random(RandomPolicy::new(seed))
    }

    pub fn monte_carlo(cfg: EvaluatorConfig) -> Result<Self, SearchError> {
        Ok(Policy::MonteCarlo(MonteCarloPolicy::new(cfg)?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Random(_) => "random",
            Policy::MonteCarlo(_) => "montecarlo",
        }
    }

    /// Thinking time per decision; `None` for policies that answer immediately.
    pub fn budget(&self) -> Option<Duration> {
        match self {
            Policy::Random(_) => None,
            Policy::MonteCarlo(p) => Some(p.config().budget),
        }
    }

    /// Pick one of `moves` (the legal moves of `state`). The index is always in range.
    pub fn pick_move(
        &mut self,
        deadline: Instant,
        state: &GameState,
        moves: &[Move],
    ) -> Result<Decision, SearchError> {
        match self {
            Policy::Random(p) => p.pick_move(moves),
            Policy::MonteCarlo(p) => p.pick_move(deadline, state, moves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use ymc_core::ScoreTable;

    fn rolled_state(seed: u64) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut s = GameState::new(Arc::new(ScoreTable::build()), 2).unwrap();
        s.roll(&mut rng).unwrap();
        s
    }

    #[test]
    fn random_policy_is_seeded_and_in_range() {
        let s = rolled_state(1);
        let moves = s.legal_moves();
        let mut a = Policy::random(5);
        let mut b = Policy::random(5);
        for _ in 0..50 {
            let da = a.pick_move(Instant::now(), &s, &moves).unwrap();
            let db = b.pick_move(Instant::now(), &s, &moves).unwrap();
            assert_eq!(da.index, db.index);
            assert!(da.index < moves.len());
            assert!(da.evaluation.is_none());
        }
        assert_eq!(a.name(), "random");
        assert_eq!(a.budget(), None);
    }

    #[test]
    fn random_policy_rejects_empty_move_list() {
        let mut p = RandomPolicy::new(0);
        assert!(matches!(p.pick_move(&[]), Err(SearchError::NoMoves)));
    }

    #[test]
    fn monte_carlo_policy_reports_evaluation() {
        let s = rolled_state(2);
        let moves = s.legal_moves();
        let cfg = EvaluatorConfig {
            workers: 2,
            budget: Duration::from_millis(30),
            top_n: 10,
            seed: 3,
        };
        let mut p = Policy::monte_carlo(cfg).unwrap();
        assert_eq!(p.name(), "montecarlo");
        assert_eq!(p.budget(), Some(Duration::from_millis(30)));

        let deadline = Instant::now() + Duration::from_millis(30);
        let d = p.pick_move(deadline, &s, &moves).unwrap();
        assert!(d.index < moves.len());
        let eval = d.evaluation.unwrap();
        assert_eq!(eval.best, d.index);
        assert_eq!(eval.stats.len(), moves.len());
    }

    #[test]
    fn monte_carlo_policy_rejects_bad_config() {
        let cfg = EvaluatorConfig {
            workers: 0,
            ..EvaluatorConfig::default()
        };
        assert!(matches!(
            Policy::monte_carlo(cfg),
            Err(SearchError::InvalidConfig(_))
        ));
    }
}
