use proptest::prelude::*;

use ymc_core::{generate, Category, Roll, ScoreTable, Scorecard};

fn faces() -> impl Strategy<Value = [u8; 5]> {
    prop::array::uniform5(1u8..=6)
}

fn table() -> &'static ScoreTable {
    use std::sync::OnceLock;
    static TABLE: OnceLock<ScoreTable> = OnceLock::new();
    TABLE.get_or_init(ScoreTable::build)
}

proptest! {
    #[test]
    fn score_is_permutation_invariant(f in faces(), rot in 0usize..5, swap in (0usize..5, 0usize..5)) {
        let r = Roll::from_faces(f).unwrap();
        let mut g = f;
        g.rotate_left(rot);
        g.swap(swap.0, swap.1);
        let p = Roll::from_faces(g).unwrap();
        for cat in Category::ALL {
            prop_assert_eq!(ymc_core::category_score(&r, cat), ymc_core::category_score(&p, cat));
        }
    }

    #[test]
    fn upper_score_is_face_times_count(f in faces(), face in 1u8..=6) {
        let r = Roll::from_faces(f).unwrap();
        let cat = Category::UPPER[(face - 1) as usize];
        let count = f.iter().filter(|&&x| x == face).count() as u16;
        prop_assert_eq!(table().score(&r, cat), face as u16 * count);
    }

    #[test]
    fn select_count_equals_turns_left(mask in 0u16..0x1FFF, f in faces(), rolls in 1u8..=3) {
        let card = Scorecard::from_parts([0; 13], mask);
        let r = Roll::from_faces(f).unwrap();
        let moves = generate(table(), &card, &r, rolls);
        prop_assert_eq!(moves.iter().filter(|m| m.is_select()).count(), card.turns_left());
        prop_assert_eq!(moves.iter().any(|m| m.is_reroll()), rolls < 3);
    }

    #[test]
    fn update_never_touches_other_filled_slots(mask in 0u16..0x1FFF, f in faces(), cat_idx in 0usize..13) {
        let table = table();
        let mut scores = [0u16; 13];
        for (i, s) in scores.iter_mut().enumerate() {
            *s = (i as u16 + 1) * 3;
        }
        let card = Scorecard::from_parts(scores, mask);
        let cat = Category::from_index(cat_idx).unwrap();
        prop_assume!(!card.is_filled(cat));
        let r = Roll::from_faces(f).unwrap();
        let next = card.update(table, &r, cat);

        for other in Category::ALL {
            if other == Category::Yatzy || !card.is_filled(other) {
                continue;
            }
            prop_assert_eq!(next.get(other), card.get(other));
        }
        prop_assert!(next.filled_mask() & card.filled_mask() == card.filled_mask());
        prop_assert!(next.total_score() >= card.total_score());
    }
}
