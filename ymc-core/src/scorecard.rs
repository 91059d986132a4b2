//! Per-player scorecard and its pure state transition (including the joker rule).

use crate::category::{Category, ALL_CATEGORIES_MASK, NUM_CATEGORIES};
use crate::dice::Roll;
use crate::scoring::{
    ScoreTable, FULL_HOUSE_SCORE, LARGE_STRAIGHT_SCORE, SMALL_STRAIGHT_SCORE,
};

pub const UPPER_BONUS_THRESHOLD: u16 = 63;
pub const UPPER_BONUS: u16 = 35;
/// Added to the stored YATZY score for every extra five-of-a-kind.
pub const YATZY_BONUS: u16 = 100;

/// Where a roll lands when banked into a category.
///
/// `category` differs from the requested one only when the joker rule forces the roll into
/// its face's upper category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub category: Category,
    pub points: u16,
    pub yatzy_bonus: bool,
}

/// 13 category slots plus a filled bitmask.
///
/// A filled slot never changes, except YATZY which grows by [`YATZY_BONUS`] per joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scorecard {
    scores: [u16; NUM_CATEGORIES],
    filled: u16,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a card from raw slots. Scores in unfilled slots are zeroed.
    pub fn from_parts(mut scores: [u16; NUM_CATEGORIES], filled: u16) -> Self {
        let filled = filled & ALL_CATEGORIES_MASK;
        for cat in Category::ALL {
            if filled & cat.bit() == 0 {
                scores[cat.index()] = 0;
            }
        }
        Self { scores, filled }
    }

    pub fn get(&self, cat: Category) -> Option<u16> {
        self.is_filled(cat).then(|| self.scores[cat.index()])
    }

    #[inline]
    pub fn is_filled(&self, cat: Category) -> bool {
        self.filled & cat.bit() != 0
    }

    #[inline]
    pub fn filled_mask(&self) -> u16 {
        self.filled
    }

    /// Unfilled categories, in index order.
    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| !self.is_filled(*c))
    }

    pub fn turns_left(&self) -> usize {
        NUM_CATEGORIES - self.filled.count_ones() as usize
    }

    pub fn is_complete(&self) -> bool {
        self.filled == ALL_CATEGORIES_MASK
    }

    pub fn upper_total(&self) -> u16 {
        self.scores[..6].iter().sum()
    }

    pub fn upper_bonus(&self) -> u16 {
        if self.upper_total() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    /// All stored scores plus the upper bonus.
    pub fn total_score(&self) -> u16 {
        self.scores.iter().sum::<u16>() + self.upper_bonus()
    }

    fn yatzy_scored(&self) -> bool {
        self.get(Category::Yatzy).is_some_and(|v| v > 0)
    }

    /// Resolve where `roll` goes when the player picks `cat`.
    ///
    /// Joker: a five-of-a-kind rolled after YATZY already holds a nonzero score earns the
    /// bonus and must fill its face's upper category if that is still open. Otherwise it
    /// may go to any category, with full house and both straights paying their fixed score.
    pub fn placement(&self, table: &ScoreTable, roll: &Roll, cat: Category) -> Placement {
        if !roll.is_yatzy() || !self.yatzy_scored() {
            return Placement {
                category: cat,
                points: table.score(roll, cat),
                yatzy_bonus: false,
            };
        }

        let face_cat = Category::for_face(roll.die(0));
        if !self.is_filled(face_cat) {
            return Placement {
                category: face_cat,
                points: table.score(roll, face_cat),
                yatzy_bonus: true,
            };
        }

        let points = match cat {
            Category::FullHouse => FULL_HOUSE_SCORE,
            Category::SmallStraight => SMALL_STRAIGHT_SCORE,
            Category::LargeStraight => LARGE_STRAIGHT_SCORE,
            _ => table.score(roll, cat),
        };
        Placement {
            category: cat,
            points,
            yatzy_bonus: true,
        }
    }

    /// Card after recording `placement`. Does not check that the slot was open.
    pub fn apply(&self, placement: Placement) -> Scorecard {
        let mut next = *self;
        if placement.yatzy_bonus {
            next.scores[Category::Yatzy.index()] += YATZY_BONUS;
        }
        next.scores[placement.category.index()] = placement.points;
        next.filled |= placement.category.bit();
        next
    }

    /// Card after banking `roll` into `cat`, joker rule included.
    pub fn update(&self, table: &ScoreTable, roll: &Roll, cat: Category) -> Scorecard {
        self.apply(self.placement(table, roll, cat))
    }

    /// Loose upper bound on the final total reachable from this card.
    ///
    /// Every open category is assumed to score its maximum, every remaining turn after the
    /// next is assumed to be a bonus yatzy while the bonus chain is alive, and the upper
    /// bonus counts if the best-case upper total reaches the threshold.
    pub fn theoretical_max(&self) -> u16 {
        let mut total: u16 = self.scores.iter().sum();
        let mut upper = self.upper_total();
        for cat in self.open_categories() {
            let best = cat.max_score();
            total += best;
            if cat.is_upper() {
                upper += best;
            }
        }

        let chain_live = !self.is_filled(Category::Yatzy) || self.yatzy_scored();
        let turns = self.turns_left() as u16;
        if chain_live && turns > 1 {
            total += YATZY_BONUS * (turns - 1);
        }
        if upper >= UPPER_BONUS_THRESHOLD {
            total += UPPER_BONUS;
        }
        total
    }
}
