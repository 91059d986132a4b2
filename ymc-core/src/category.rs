//! The 13 scoring categories, in fixed index order.

use std::fmt;

use crate::dice::Die;

/// Number of scoring categories.
pub const NUM_CATEGORIES: usize = 13;

/// Bitmask with every category bit set.
pub const ALL_CATEGORIES_MASK: u16 = (1u16 << NUM_CATEGORIES) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Category {
    Ones = 0,
    Twos = 1,
    Threes = 2,
    Fours = 3,
    Fives = 4,
    Sixes = 5,
    ThreeOfAKind = 6,
    FourOfAKind = 7,
    FullHouse = 8,
    SmallStraight = 9,
    LargeStraight = 10,
    Chance = 11,
    Yatzy = 12,
}

impl Category {
    pub const ALL: [Category; NUM_CATEGORIES] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Chance,
        Category::Yatzy,
    ];

    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Bit for this category in a filled mask.
    #[inline]
    pub fn bit(self) -> u16 {
        1u16 << (self as u16)
    }

    pub fn is_upper(self) -> bool {
        (self as u8) < 6
    }

    /// Face counted by an upper category.
    pub fn upper_face(self) -> Option<u8> {
        self.is_upper().then(|| self as u8 + 1)
    }

    /// Upper category counting `die`'s face.
    pub fn for_face(die: Die) -> Self {
        Self::UPPER[(die.face() - 1) as usize]
    }

    /// Best score this category can hold on its own (no bonuses).
    pub fn max_score(self) -> u16 {
        match self {
            Category::Ones
            | Category::Twos
            | Category::Threes
            | Category::Fours
            | Category::Fives
            | Category::Sixes => (self as u16 + 1) * 5,
            Category::ThreeOfAKind | Category::FourOfAKind | Category::Chance => 30,
            Category::FullHouse => 25,
            Category::SmallStraight => 30,
            Category::LargeStraight => 40,
            Category::Yatzy => 50,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Ones => "ones",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::ThreeOfAKind => "three of a kind",
            Category::FourOfAKind => "four of a kind",
            Category::FullHouse => "full house",
            Category::SmallStraight => "small straight",
            Category::LargeStraight => "large straight",
            Category::Chance => "chance",
            Category::Yatzy => "yatzy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
