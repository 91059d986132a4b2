use thiserror::Error;
use ymc_core::ApplyError;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Win/loss scoring is defined for exactly two players.
    #[error("monte carlo evaluation needs exactly 2 players, got {got}")]
    PlayerCount { got: usize },
    #[error("no candidate moves to evaluate")]
    NoMoves,
    #[error("invalid search config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Apply(#[from] ApplyError),
}
