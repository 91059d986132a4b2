//! Shared sample generators for the ymc benchmarks.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use ymc_core::{GameState, Roll, ScoreTable};

/// Deterministic rolls from a xorshift64 stream, no rand dependency on the hot path.
pub fn gen_rolls(n: usize) -> Vec<Roll> {
    let mut x: u64 = 0x1234_5678_9ABC_DEF0;
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let mut d = [0u8; 5];
        for f in &mut d {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            *f = (x % 6) as u8 + 1;
        }
        if let Some(r) = Roll::from_faces(d) {
            out.push(r);
        }
    }
    out
}

/// A fresh two-player game with the first roll made.
pub fn opening_state(table: Arc<ScoreTable>, seed: u64) -> Option<GameState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut s = GameState::new(table, 2).ok()?;
    s.roll(&mut rng).ok()?;
    Some(s)
}
