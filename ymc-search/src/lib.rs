//! ymc-search: Monte Carlo move evaluation, player policies, and the match runner.

pub mod error;
pub mod evaluator;
pub mod policy;
pub mod rollout;
pub mod runner;
pub mod stats;

pub use error::SearchError;
pub use evaluator::{splitmix64, Evaluation, Evaluator, EvaluatorConfig};
pub use policy::{Decision, MonteCarloPolicy, Policy, RandomPolicy};
pub use rollout::{random_playout, rollout, RolloutResult};
pub use runner::{GameSummary, Match, PlyRecord};
pub use stats::{rank, MoveStats, TopN};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
