//! Move enumeration: category selections and deduplicated reroll holds.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::category::Category;
use crate::dice::{Hold, Roll, NUM_DICE};
use crate::scorecard::{Placement, Scorecard};
use crate::scoring::ScoreTable;

/// Rolls allowed per turn (the first roll counts).
pub const MAX_ROLLS: u8 = 3;

/// Position masks for rerolls: at least one die kept, at least one die rolled.
const HOLD_MASKS: std::ops::Range<u8> = 1..((1 << NUM_DICE) - 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Keep `hold`, roll the rest.
    Reroll { hold: Hold },
    /// Bank the roll. `scorecard` is the acting player's card afterwards.
    Select {
        category: Category,
        placement: Placement,
        scorecard: Scorecard,
    },
}

impl Move {
    pub fn is_select(&self) -> bool {
        matches!(self, Move::Select { .. })
    }

    pub fn is_reroll(&self) -> bool {
        matches!(self, Move::Reroll { .. })
    }

    /// Resulting card for a selection, `None` for a reroll.
    pub fn scorecard(&self) -> Option<&Scorecard> {
        match self {
            Move::Select { scorecard, .. } => Some(scorecard),
            Move::Reroll { .. } => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Reroll { hold } => write!(f, "reroll holding {}", hold),
            Move::Select {
                category,
                placement,
                ..
            } => {
                write!(f, "select {} for {}", category, placement.points)?;
                if placement.category != *category {
                    write!(f, " (joker: {})", placement.category)?;
                } else if placement.yatzy_bonus {
                    f.write_str(" (joker)")?;
                }
                Ok(())
            }
        }
    }
}

/// Every legal move for `scorecard` holding `roll` after `rolls_used` rolls.
///
/// Selections come first, one per open category in index order. Rerolls follow (only while
/// `rolls_used < MAX_ROLLS`) in position-mask order, keeping the first mask for each
/// distinct multiset of held values.
pub fn generate(table: &ScoreTable, scorecard: &Scorecard, roll: &Roll, rolls_used: u8) -> Vec<Move> {
    let mut moves = Vec::with_capacity(scorecard.turns_left() + HOLD_MASKS.len());

    for category in scorecard.open_categories() {
        let placement = scorecard.placement(table, roll, category);
        moves.push(Move::Select {
            category,
            placement,
            scorecard: scorecard.apply(placement),
        });
    }

    if rolls_used < MAX_ROLLS {
        let mut seen = FxHashSet::default();
        for mask in HOLD_MASKS {
            let hold = Hold::from_mask(roll, mask);
            if seen.insert(hold.multiset_key()) {
                moves.push(Move::Reroll { hold });
            }
        }
    }

    moves
}
