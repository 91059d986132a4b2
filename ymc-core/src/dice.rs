//! Dice primitives: faces, rolls, holds and compact roll keys.
//!
//! A roll is an *ordered* 5-tuple. Scoring is order-independent, but the move enumerator
//! walks die positions, so positions are kept as rolled.

use std::fmt;

use rand::Rng;

/// Dice per roll.
pub const NUM_DICE: usize = 5;
/// Faces per die.
pub const NUM_FACES: u8 = 6;
/// Number of ordered 5-dice tuples (6^5).
pub const NUM_ROLLS: usize = 7776;

const FACE_NAMES: [&str; NUM_FACES as usize] = ["one", "two", "three", "four", "five", "six"];

/// A single die showing a face in 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Die(u8);

impl Die {
    /// Returns `None` unless `face` is in 1..=6.
    pub fn new(face: u8) -> Option<Self> {
        (1..=NUM_FACES).contains(&face).then_some(Self(face))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(1..=NUM_FACES))
    }

    #[inline]
    pub fn face(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        FACE_NAMES[(self.0 - 1) as usize]
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered roll of five dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roll([Die; NUM_DICE]);

impl Roll {
    pub fn new(dice: [Die; NUM_DICE]) -> Self {
        Self(dice)
    }

    /// Build a roll from raw faces; `None` if any face is outside 1..=6.
    pub fn from_faces(faces: [u8; NUM_DICE]) -> Option<Self> {
        let mut dice = [Die(1); NUM_DICE];
        for (d, &f) in dice.iter_mut().zip(faces.iter()) {
            *d = Die::new(f)?;
        }
        Some(Self(dice))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut dice = [Die(1); NUM_DICE];
        for d in &mut dice {
            *d = Die::random(rng);
        }
        Self(dice)
    }

    /// Inverse of [`Roll::ordinal`].
    ///
    /// # Panics
    /// Panics if `ordinal >= NUM_ROLLS`.
    pub fn from_ordinal(mut ordinal: usize) -> Self {
        assert!(ordinal < NUM_ROLLS, "roll ordinal out of range: {}", ordinal);
        let mut dice = [Die(1); NUM_DICE];
        for d in &mut dice {
            *d = Die((ordinal % 6) as u8 + 1);
            ordinal /= 6;
        }
        Self(dice)
    }

    #[inline]
    pub fn die(&self, position: usize) -> Die {
        self.0[position]
    }

    pub fn faces(&self) -> [u8; NUM_DICE] {
        self.0.map(Die::face)
    }

    /// Face histogram indexed by face value; slot 0 is always zero.
    pub fn face_counts(&self) -> [u8; 7] {
        let mut counts = [0u8; 7];
        for d in &self.0 {
            counts[d.0 as usize] += 1;
        }
        counts
    }

    pub fn sum(&self) -> u16 {
        self.0.iter().map(|d| d.0 as u16).sum()
    }

    /// Five of a kind.
    pub fn is_yatzy(&self) -> bool {
        self.0.iter().all(|d| *d == self.0[0])
    }

    /// Dense base-6 index in `0..NUM_ROLLS`, position 0 least significant.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.0
            .iter()
            .rev()
            .fold(0usize, |acc, d| acc * 6 + (d.0 - 1) as usize)
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.faces();
        write!(f, "[{a} {b} {c} {d} {e}]")
    }
}

/// Dice kept across a reroll, in the order of the positions they were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hold {
    faces: [u8; NUM_DICE],
    len: u8,
}

impl Hold {
    /// Keep the dice whose position bit is set in `mask` (bit `i` = position `i`).
    pub fn from_mask(roll: &Roll, mask: u8) -> Self {
        debug_assert!(mask < 32);
        let mut faces = [0u8; NUM_DICE];
        let mut len = 0u8;
        for (i, d) in roll.0.iter().enumerate() {
            if mask & (1 << i) != 0 {
                faces[len as usize] = d.0;
                len += 1;
            }
        }
        Self { faces, len }
    }

    /// Build a hold from raw faces; `None` for invalid faces or more than five dice.
    pub fn from_faces(kept: &[u8]) -> Option<Self> {
        if kept.len() > NUM_DICE {
            return None;
        }
        let mut faces = [0u8; NUM_DICE];
        for (slot, &f) in faces.iter_mut().zip(kept) {
            *slot = Die::new(f)?.face();
        }
        Some(Self {
            faces,
            len: kept.len() as u8,
        })
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces[..self.len as usize]
    }

    pub fn dice(&self) -> impl Iterator<Item = Die> + '_ {
        self.faces().iter().map(|&f| Die(f))
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Order-independent key of the kept values (sorted faces, packed 3 bits each).
    pub fn multiset_key(&self) -> u16 {
        let mut sorted = self.faces;
        sorted[..self.len as usize].sort_unstable();
        sorted[..self.len as usize]
            .iter()
            .enumerate()
            .fold(0u16, |key, (i, &f)| key | ((f as u16) << (i * 3)))
    }

    /// Draw a new roll: kept faces first, remaining positions rolled fresh.
    pub fn reroll<R: Rng + ?Sized>(&self, rng: &mut R) -> Roll {
        let mut dice = [Die(1); NUM_DICE];
        for (i, d) in dice.iter_mut().enumerate() {
            *d = if i < self.len as usize {
                Die(self.faces[i])
            } else {
                Die::random(rng)
            };
        }
        Roll(dice)
    }
}

impl fmt::Display for Hold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.dice().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(d.name())?;
        }
        Ok(())
    }
}
