//! Score rule engine.
//!
//! `category_score` is the single source of truth for roll × category scoring. It is
//! evaluated once for every ordered roll into a [`ScoreTable`]; everything on the hot path
//! (scorecard transitions, move generation, rollouts) reads the table.

use crate::category::{Category, NUM_CATEGORIES};
use crate::dice::{Roll, NUM_DICE, NUM_ROLLS};

pub const FULL_HOUSE_SCORE: u16 = 25;
pub const SMALL_STRAIGHT_SCORE: u16 = 30;
pub const LARGE_STRAIGHT_SCORE: u16 = 40;
pub const YATZY_SCORE: u16 = 50;

const ALL_POSITIONS: u8 = (1 << NUM_DICE) - 1;

/// Score plus the dice positions that justify it.
///
/// Each witness is a 5-bit position mask. Only a small straight can carry two witnesses
/// (e.g. `1 2 3 4 5` holds both `1-2-3-4` and `2-3-4-5`). A zero score has no witness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub score: u16,
    pub witnesses: Vec<u8>,
}

/// Raw score of `roll` in `cat`. Order of the dice does not matter.
pub fn category_score(roll: &Roll, cat: Category) -> u16 {
    let counts = roll.face_counts();
    match cat {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = cat as usize + 1;
            face as u16 * counts[face] as u16
        }
        Category::ThreeOfAKind => of_a_kind(&counts, 3).map_or(0, |_| roll.sum()),
        Category::FourOfAKind => of_a_kind(&counts, 4).map_or(0, |_| roll.sum()),
        Category::FullHouse => {
            let pairs = counts.iter().filter(|&&c| c == 2).count();
            let triples = counts.iter().filter(|&&c| c == 3).count();
            if pairs == 1 && triples == 1 {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            if straight_starts(&counts, 4).next().is_some() {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if straight_starts(&counts, 5).next().is_some() {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Chance => roll.sum(),
        Category::Yatzy => {
            if roll.is_yatzy() {
                YATZY_SCORE
            } else {
                0
            }
        }
    }
}

/// Score with diagnostic witnesses.
pub fn score_roll(roll: &Roll, cat: Category) -> ScoreResult {
    let score = category_score(roll, cat);
    if score == 0 {
        return ScoreResult::default();
    }
    let witnesses = match cat {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => vec![positions_of(roll, cat as u8 + 1)],
        Category::ThreeOfAKind | Category::FourOfAKind => {
            let need = if cat == Category::ThreeOfAKind { 3 } else { 4 };
            of_a_kind(&roll.face_counts(), need)
                .map(|face| vec![positions_of(roll, face)])
                .unwrap_or_default()
        }
        Category::SmallStraight => straight_starts(&roll.face_counts(), 4)
            .map(|start| first_positions(roll, start, 4))
            .collect(),
        Category::FullHouse | Category::LargeStraight | Category::Chance | Category::Yatzy => {
            vec![ALL_POSITIONS]
        }
    };
    ScoreResult { score, witnesses }
}

/// Face appearing at least `n` times, if any.
fn of_a_kind(counts: &[u8; 7], n: u8) -> Option<u8> {
    (1..=6u8).find(|&f| counts[f as usize] >= n)
}

/// Starting faces of every run of `len` consecutive faces present in the roll.
fn straight_starts(counts: &[u8; 7], len: u8) -> impl Iterator<Item = u8> + '_ {
    (1..=(7 - len)).filter(move |&start| (start..start + len).all(|f| counts[f as usize] > 0))
}

fn positions_of(roll: &Roll, face: u8) -> u8 {
    roll.faces()
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f == face)
        .fold(0u8, |mask, (i, _)| mask | (1 << i))
}

/// Mask of the first position holding each face in `start..start+len`.
fn first_positions(roll: &Roll, start: u8, len: u8) -> u8 {
    let faces = roll.faces();
    (start..start + len).fold(0u8, |mask, face| {
        match faces.iter().position(|&f| f == face) {
            Some(i) => mask | (1 << i),
            None => mask,
        }
    })
}

/// Precomputed scores for every ordered roll, indexed by [`Roll::ordinal`].
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Clone)]
pub struct ScoreTable {
    rows: Box<[[u16; NUM_CATEGORIES]]>,
}

impl ScoreTable {
    /// Evaluate all 7,776 ordered rolls × 13 categories.
    pub fn build() -> Self {
        let rows = (0..NUM_ROLLS)
            .map(|ord| {
                let roll = Roll::from_ordinal(ord);
                let mut row = [0u16; NUM_CATEGORIES];
                for cat in Category::ALL {
                    row[cat.index()] = category_score(&roll, cat);
                }
                row
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { rows }
    }

    #[inline]
    pub fn score(&self, roll: &Roll, cat: Category) -> u16 {
        self.rows[roll.ordinal()][cat.index()]
    }

    /// All 13 category scores for `roll`, in category order.
    #[inline]
    pub fn scores(&self, roll: &Roll) -> &[u16; NUM_CATEGORIES] {
        &self.rows[roll.ordinal()]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::build()
    }
}

impl std::fmt::Debug for ScoreTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTable")
            .field("rows", &self.rows.len())
            .finish()
    }
}
