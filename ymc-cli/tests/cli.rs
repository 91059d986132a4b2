use std::fs;
use std::process::Command;

use serde_json::Value;

fn ymc_bin() -> String {
    // Provided by Cargo for integration tests of binaries.
    env!("CARGO_BIN_EXE_ymc").to_string()
}

#[test]
fn version_runs() {
    let out = Command::new(ymc_bin()).arg("--version").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("ymc "));
}

#[test]
fn unknown_command_fails() {
    let out = Command::new(ymc_bin()).arg("nope").output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown command"));
}

#[test]
fn score_prints_every_category() {
    let out = Command::new(ymc_bin())
        .args(["score", "3", "2", "1", "4", "5"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    let ls = s.lines().find(|l| l.starts_with("large straight")).unwrap();
    assert!(ls.contains("40"));
    let yatzy = s.lines().find(|l| l.starts_with("yatzy")).unwrap();
    assert!(yatzy.trim_end().ends_with('0'));
}

#[test]
fn score_rejects_bad_dice() {
    let out = Command::new(ymc_bin())
        .args(["score", "3", "2", "1", "4", "7"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn moves_lists_selects_then_rerolls() {
    let out = Command::new(ymc_bin())
        .args(["moves", "6", "5", "4", "3", "1"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 43);
    assert!(lines[0].ends_with("select ones for 1"));
    assert!(lines[13].ends_with("reroll holding six"));

    let out = Command::new(ymc_bin())
        .args(["moves", "6", "5", "4", "3", "1", "--rolls", "3"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 13);
}

#[test]
fn play_writes_ndjson_events() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.ndjson");

    let out = Command::new(ymc_bin())
        .args([
            "play",
            "--seed",
            "42",
            "--budget-ms",
            "2",
            "--workers",
            "2",
            "--top-n",
            "10",
            "--quiet",
            "--events",
            events.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("total"));

    let vals: Vec<Value> = fs::read_to_string(&events)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(vals.first().unwrap()["event"], "game_start");
    assert_eq!(vals.first().unwrap()["game_seed"], 42);
    assert_eq!(
        vals.first().unwrap()["policies"],
        serde_json::json!(["montecarlo", "random"])
    );
    assert_eq!(vals.last().unwrap()["event"], "game_end");
    let decisions = vals.iter().filter(|v| v["event"] == "decision").count();
    assert!(decisions >= 26);
    assert!(vals
        .iter()
        .filter(|v| v["event"] == "decision" && v["player"] == 0)
        .all(|v| v["policy"] == "montecarlo"));
}

#[test]
fn play_rejects_unknown_opponent() {
    let out = Command::new(ymc_bin())
        .args(["play", "--opponent", "oracle", "--quiet"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn play_rejects_non_two_player_config_before_logging() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("three.yaml");
    fs::write(&config, "game:\n  players: 3\n").unwrap();
    let events = dir.path().join("events.ndjson");

    let out = Command::new(ymc_bin())
        .args([
            "play",
            "--config",
            config.to_str().unwrap(),
            "--events",
            events.to_str().unwrap(),
            "--quiet",
        ])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("players"));
    assert!(!events.exists());
}
