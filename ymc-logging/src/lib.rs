//! ymc-logging: NDJSON game and decision events.
//!
//! Append-only, one versioned JSON object per line, for post-mortems of played games.
//! Nothing in the workspace reads these files back.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version stamped on every event.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// Search knobs as they were when the game started.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParamsV1 {
    pub workers: u64,
    pub budget_ms: u64,
    pub top_n: u64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStartEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub game_seed: u64,
    pub players: u32,
    /// Policy name per seat.
    pub policies: Vec<String>,
    pub search: SearchParamsV1,
}

impl GameStartEventV1 {
    pub fn new(game_seed: u64, policies: Vec<String>, search: SearchParamsV1) -> Self {
        Self {
            event: "game_start",
            ts_ms: now_ms(),
            schema_version: EVENT_SCHEMA_VERSION,
            game_seed,
            players: policies.len() as u32,
            policies,
            search,
        }
    }
}

/// One candidate move with its rollout statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMoveV1 {
    pub index: u32,
    pub description: String,
    pub games: u64,
    pub wins: u64,
    pub mean_score: f64,
    pub max_score: u16,
    /// `None` when the move got no rollouts.
    pub top_n_avg: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub ply: u32,
    pub player: u32,
    pub policy: String,
    pub roll: [u8; 5],
    pub rolls_used: u8,

    pub candidates: u32,
    pub chosen: u32,
    pub chosen_desc: String,

    // Monte Carlo only; zero / empty for other policies.
    pub rollouts: u64,
    pub elapsed_ms: u64,
    pub fallback: bool,
    pub top: Vec<RankedMoveV1>,
}

impl DecisionEventV1 {
    /// A decision by `policy` on `roll`; choice and search details start empty.
    pub fn new(ply: u32, player: u32, policy: String, roll: [u8; 5], rolls_used: u8) -> Self {
        Self {
            event: "decision",
            ts_ms: now_ms(),
            schema_version: EVENT_SCHEMA_VERSION,
            ply,
            player,
            policy,
            roll,
            rolls_used,
            candidates: 0,
            chosen: 0,
            chosen_desc: String::new(),
            rollouts: 0,
            elapsed_ms: 0,
            fallback: false,
            top: Vec::new(),
        }
    }

    pub fn with_choice(mut self, candidates: u32, chosen: u32, chosen_desc: String) -> Self {
        self.candidates = candidates;
        self.chosen = chosen;
        self.chosen_desc = chosen_desc;
        self
    }

    pub fn with_search(
        mut self,
        rollouts: u64,
        elapsed_ms: u64,
        fallback: bool,
        top: Vec<RankedMoveV1>,
    ) -> Self {
        self.rollouts = rollouts;
        self.elapsed_ms = elapsed_ms;
        self.fallback = fallback;
        self.top = top;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameEndEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub plies: u32,
    pub scores: Vec<u16>,
    /// Seat with the strictly highest score; `None` on a tie.
    pub winner: Option<u32>,
}

impl GameEndEventV1 {
    pub fn new(plies: u32, scores: Vec<u16>) -> Self {
        let winner = scores
            .iter()
            .copied()
            .max()
            .filter(|best| scores.iter().filter(|s| *s == best).count() == 1)
            .and_then(|best| scores.iter().position(|s| *s == best))
            .map(|i| i as u32);
        Self {
            event: "game_end",
            ts_ms: now_ms(),
            schema_version: EVENT_SCHEMA_VERSION,
            plies,
            scores,
            winner,
        }
    }
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NdjsonError::Io(e) => write!(f, "ndjson io error: {e}"),
            NdjsonError::Json(e) => write!(f, "ndjson encode error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        s.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .collect()
    }

    fn search_params() -> SearchParamsV1 {
        SearchParamsV1 {
            workers: 4,
            budget_ms: 50,
            top_n: 10,
            seed: 7,
        }
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&GameStartEventV1::new(
            42,
            vec!["montecarlo".to_string(), "random".to_string()],
            search_params(),
        ))
        .unwrap();
        w.write_event(&GameEndEventV1::new(52, vec![180, 143])).unwrap();
        w.flush().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals[0]["event"], "game_start");
        assert_eq!(vals[0]["players"], 2);
        assert_eq!(vals[0]["search"]["top_n"], 10);
        assert_eq!(vals[1]["event"], "game_end");
        assert_eq!(vals[1]["winner"], 0);
        assert_eq!(vals[1]["schema_version"], EVENT_SCHEMA_VERSION);
    }

    #[test]
    fn tied_game_has_no_winner() {
        let e = GameEndEventV1::new(52, vec![200, 200]);
        assert_eq!(e.winner, None);
        let e = GameEndEventV1::new(52, vec![150, 201]);
        assert_eq!(e.winner, Some(1));
    }

    #[test]
    fn decision_event_header_and_defaults() {
        let e = DecisionEventV1::new(7, 1, "random".to_string(), [2, 2, 3, 3, 3], 2)
            .with_choice(20, 4, "select full house for 25".to_string());
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["event"], "decision");
        assert_eq!(v["schema_version"], EVENT_SCHEMA_VERSION);
        assert!(v["ts_ms"].as_u64().unwrap() > 0);
        assert_eq!(v["ply"], 7);
        assert_eq!(v["player"], 1);
        assert_eq!(v["rolls_used"], 2);
        assert_eq!(v["candidates"], 20);
        assert_eq!(v["chosen"], 4);
        assert_eq!(v["chosen_desc"], "select full house for 25");
        assert_eq!(v["rollouts"], 0);
        assert_eq!(v["fallback"], false);
        assert_eq!(v["top"], serde_json::json!([]));
    }

    #[test]
    fn periodic_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();

        let e = DecisionEventV1::new(3, 0, "montecarlo".to_string(), [6, 5, 4, 3, 1], 1)
            .with_choice(43, 9, "select small straight for 30".to_string())
            .with_search(
                1000,
                50,
                false,
                vec![RankedMoveV1 {
                    index: 9,
                    description: "select small straight for 30".to_string(),
                    games: 40,
                    wins: 22,
                    mean_score: 190.5,
                    max_score: 260,
                    top_n_avg: Some(231.0),
                }],
            );
        w.write_event(&e).unwrap();

        // No explicit flush: flush_every_lines=1 already pushed it out.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["roll"], serde_json::json!([6, 5, 4, 3, 1]));
        assert_eq!(vals[0]["top"][0]["top_n_avg"], 231.0);
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&GameEndEventV1::new(1, vec![1, 0])).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"game_end","plies":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["plies"], 1);
    }

    #[test]
    fn open_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        for plies in [1u32, 2] {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&GameEndEventV1::new(plies, vec![0, 0])).unwrap();
            w.flush().unwrap();
        }
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[1]["plies"], 2);
    }
}
