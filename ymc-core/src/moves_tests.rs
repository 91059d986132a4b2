#[cfg(test)]
mod tests {
    use crate::category::Category;
    use crate::dice::{Roll, NUM_ROLLS};
    use crate::moves::{generate, Move, MAX_ROLLS};
    use crate::scorecard::Scorecard;
    use crate::scoring::ScoreTable;

    use rustc_hash::FxHashSet;

    fn roll(faces: [u8; 5]) -> Roll {
        Roll::from_faces(faces).unwrap()
    }

    #[test]
    fn empty_card_move_list_order() {
        let table = ScoreTable::build();
        let moves = generate(&table, &Scorecard::new(), &roll([6, 5, 4, 3, 1]), 1);
        let got: Vec<String> = moves.iter().map(|m| m.to_string()).collect();

        let want = [
            "select ones for 1",
            "select twos for 0",
            "select threes for 3",
            "select fours for 4",
            "select fives for 5",
            "select sixes for 6",
            "select three of a kind for 0",
            "select four of a kind for 0",
            "select full house for 0",
            "select small straight for 30",
            "select large straight for 0",
            "select chance for 19",
            "select yatzy for 0",
            "reroll holding six",
            "reroll holding five",
            "reroll holding six,five",
            "reroll holding four",
            "reroll holding six,four",
            "reroll holding five,four",
            "reroll holding six,five,four",
            "reroll holding three",
            "reroll holding six,three",
            "reroll holding five,three",
            "reroll holding six,five,three",
            "reroll holding four,three",
            "reroll holding six,four,three",
            "reroll holding five,four,three",
            "reroll holding six,five,four,three",
            "reroll holding one",
            "reroll holding six,one",
            "reroll holding five,one",
            "reroll holding six,five,one",
            "reroll holding four,one",
            "reroll holding six,four,one",
            "reroll holding five,four,one",
            "reroll holding six,five,four,one",
            "reroll holding three,one",
            "reroll holding six,three,one",
            "reroll holding five,three,one",
            "reroll holding six,five,three,one",
            "reroll holding four,three,one",
            "reroll holding six,four,three,one",
            "reroll holding five,four,three,one",
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn no_rerolls_after_third_roll() {
        let table = ScoreTable::build();
        let moves = generate(&table, &Scorecard::new(), &roll([6, 5, 4, 3, 1]), MAX_ROLLS);
        assert_eq!(moves.len(), 13);
        assert!(moves.iter().all(Move::is_select));
    }

    #[test]
    fn rerolls_dedupe_by_value_multiset() {
        let table = ScoreTable::build();
        let card = Scorecard::new();

        // All equal: holding 1..4 of the same value.
        let moves = generate(&table, &card, &roll([2, 2, 2, 2, 2]), 1);
        assert_eq!(moves.iter().filter(|m| m.is_reroll()).count(), 4);

        // Two pairs and a single: multisets of {a,a,b,b,c} minus the full hold.
        let moves = generate(&table, &card, &roll([1, 1, 2, 2, 3]), 2);
        assert_eq!(moves.iter().filter(|m| m.is_reroll()).count(), 3 * 3 * 2 - 2);
    }

    #[test]
    fn every_roll_yields_unique_rerolls_and_all_selects() {
        let table = ScoreTable::build();
        let card = Scorecard::new();
        for ord in (0..NUM_ROLLS).step_by(7) {
            let r = Roll::from_ordinal(ord);
            let moves = generate(&table, &card, &r, 1);
            assert_eq!(moves.iter().filter(|m| m.is_select()).count(), card.turns_left());

            let mut keys = FxHashSet::default();
            for m in &moves {
                if let Move::Reroll { hold } = m {
                    assert!((1..=4).contains(&hold.len()));
                    assert!(keys.insert(hold.multiset_key()), "duplicate hold {} for {}", hold, r);
                }
            }
        }
    }

    #[test]
    fn selects_follow_open_categories() {
        let table = ScoreTable::build();
        let card = Scorecard::new()
            .update(&table, &roll([1, 1, 2, 3, 4]), Category::Ones)
            .update(&table, &roll([1, 2, 3, 4, 5]), Category::LargeStraight);
        let moves = generate(&table, &card, &roll([3, 3, 3, 5, 5]), MAX_ROLLS);
        assert_eq!(moves.len(), card.turns_left());

        let cats: Vec<Category> = moves
            .iter()
            .filter_map(|m| match m {
                Move::Select { category, .. } => Some(*category),
                Move::Reroll { .. } => None,
            })
            .collect();
        assert_eq!(cats, card.open_categories().collect::<Vec<_>>());

        for m in &moves {
            let after = m.scorecard().unwrap();
            assert_eq!(after.turns_left(), card.turns_left() - 1);
        }
    }

    #[test]
    fn joker_select_shows_redirect() {
        let table = ScoreTable::build();
        let card = Scorecard::new().update(&table, &roll([4, 4, 4, 4, 4]), Category::Yatzy);
        let moves = generate(&table, &card, &roll([2, 2, 2, 2, 2]), MAX_ROLLS);
        assert_eq!(moves[0].to_string(), "select ones for 10 (joker: twos)");
        for m in &moves {
            let after = m.scorecard().unwrap();
            assert_eq!(after.get(Category::Twos), Some(10));
            assert_eq!(after.get(Category::Yatzy), Some(150));
        }
    }
}
