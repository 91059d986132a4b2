//! ymc-core: Dice, scoring rules, scorecards, move enumeration, game state, and configuration.

pub mod category;
pub mod config;
pub mod dice;
pub mod engine;
pub mod moves;
pub mod scorecard;
pub mod scoring;

pub use category::{Category, ALL_CATEGORIES_MASK, NUM_CATEGORIES};
pub use config::{Config, ConfigError, GameConfig, LoggingConfig, SearchConfig};
pub use dice::{Die, Hold, Roll, NUM_DICE, NUM_FACES, NUM_ROLLS};
pub use engine::{ApplyError, GameState, Phase, Turn};
pub use moves::{generate, Move, MAX_ROLLS};
pub use scorecard::{Placement, Scorecard, UPPER_BONUS, UPPER_BONUS_THRESHOLD, YATZY_BONUS};
pub use scoring::{category_score, score_roll, ScoreResult, ScoreTable};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod moves_tests;
