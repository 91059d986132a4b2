//! Plain-text rendering of scorecards, plies and roll scores.

use std::fmt::Write as _;

use ymc_core::{score_roll, Category, Roll, Scorecard};
use ymc_search::PlyRecord;

const LABEL_WIDTH: usize = 16;
const COLUMN_WIDTH: usize = 8;

/// Scorecards side by side, one column per seat. Open slots show `-`.
pub fn scorecards(cards: &[Scorecard], names: &[&str]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<LABEL_WIDTH$}", "");
    for name in names {
        let _ = write!(out, "{:>COLUMN_WIDTH$}", name);
    }
    out.push('\n');

    for cat in Category::ALL {
        let _ = write!(out, "{:<LABEL_WIDTH$}", cat.name());
        for card in cards {
            match card.get(cat) {
                Some(v) => {
                    let _ = write!(out, "{:>COLUMN_WIDTH$}", v);
                }
                None => {
                    let _ = write!(out, "{:>COLUMN_WIDTH$}", "-");
                }
            }
        }
        out.push('\n');
        if cat == Category::Sixes {
            row(&mut out, "upper bonus", cards, Scorecard::upper_bonus);
        }
    }
    row(&mut out, "total", cards, Scorecard::total_score);
    out
}

fn row(out: &mut String, label: &str, cards: &[Scorecard], value: fn(&Scorecard) -> u16) {
    let _ = write!(out, "{:<LABEL_WIDTH$}", label);
    for card in cards {
        let _ = write!(out, "{:>COLUMN_WIDTH$}", value(card));
    }
    out.push('\n');
}

/// One-line ply narration.
pub fn ply(rec: &PlyRecord, policy: &str) -> String {
    let mut line = format!(
        "ply {:>3}  p{} ({})  {}  roll {}/3  -> {}",
        rec.ply, rec.player, policy, rec.roll, rec.rolls_used, rec.chosen
    );
    if let Some(eval) = &rec.evaluation {
        let _ = write!(
            line,
            "  [{} rollouts, {} ms{}]",
            eval.rollouts,
            eval.elapsed.as_millis(),
            if eval.fallback { ", fallback" } else { "" }
        );
    }
    line
}

/// Every category's score for `roll`, with the dice that justify it.
pub fn roll_scores(roll: &Roll) -> String {
    let faces = roll.faces();
    let mut out = format!("roll {}\n", roll);
    for cat in Category::ALL {
        let res = score_roll(roll, cat);
        let _ = write!(out, "{:<LABEL_WIDTH$}{:>4}", cat.name(), res.score);
        for &mask in &res.witnesses {
            let dice: Vec<String> = (0..faces.len())
                .filter(|&i| mask & (1u8 << i) != 0)
                .map(|i| faces[i].to_string())
                .collect();
            let _ = write!(out, "  [{}]", dice.join(" "));
        }
        out.push('\n');
    }
    out
}
