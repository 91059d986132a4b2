//! ymc: CLI for the five-dice Yatzy Monte Carlo engine.
//!
//! Subcommands:
//! - play    Monte Carlo (seat 0) against an opponent policy
//! - score   Every category's score for one roll
//! - moves   Enumerated move list for a roll on an empty card

mod render;

use std::env;
use std::process;
use std::sync::Arc;

use ymc_core::{generate, Config, GameState, Roll, ScoreTable, Scorecard, MAX_ROLLS};
use ymc_logging::{
    now_ms, DecisionEventV1, GameEndEventV1, GameStartEventV1, NdjsonWriter, RankedMoveV1,
    SearchParamsV1,
};
use ymc_search::{splitmix64, EvaluatorConfig, Match, PlyRecord, Policy};

fn print_help() {
    eprintln!(
        r#"ymc - Monte Carlo Yatzy engine

USAGE:
    ymc <COMMAND> [OPTIONS]

COMMANDS:
    play                Play Monte Carlo vs an opponent and narrate the game
    score D D D D D     Score a roll in every category
    moves D D D D D     List the legal moves for a roll on an empty card

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `ymc <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("ymc {}", env!("CARGO_PKG_VERSION"));
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {}", flag);
        process::exit(1);
    }
    args[i + 1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", flag, args[i + 1]);
        process::exit(1);
    })
}

/// Five positional dice faces.
fn parse_roll(args: &[String]) -> Roll {
    if args.len() != 5 {
        eprintln!("Expected exactly 5 dice, got {}", args.len());
        process::exit(1);
    }
    let mut faces = [0u8; 5];
    for (f, a) in faces.iter_mut().zip(args) {
        *f = a.parse().unwrap_or_else(|_| {
            eprintln!("Invalid die: {}", a);
            process::exit(1);
        });
    }
    Roll::from_faces(faces).unwrap_or_else(|| {
        eprintln!("Dice must be in 1..=6: {:?}", faces);
        process::exit(1);
    })
}

fn cmd_score(args: &[String]) {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!(
            r#"ymc score

USAGE:
    ymc score D D D D D

Prints the score of the roll in every category, with the dice that justify it.
"#
        );
        return;
    }
    let roll = parse_roll(args);
    print!("{}", render::roll_scores(&roll));
}

fn cmd_moves(args: &[String]) {
    let mut rolls_used: u8 = 1;
    let mut dice: Vec<String> = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"ymc moves

USAGE:
    ymc moves D D D D D [--rolls N]

OPTIONS:
    --rolls N    Rolls already made this turn, 1..=3 (default: 1)
"#
                );
                return;
            }
            "--rolls" => {
                rolls_used = parse_value(args, i, "--rolls");
                i += 2;
            }
            other => {
                dice.push(other.to_string());
                i += 1;
            }
        }
    }
    if !(1..=MAX_ROLLS).contains(&rolls_used) {
        eprintln!("--rolls must be in 1..={}", MAX_ROLLS);
        process::exit(1);
    }

    let roll = parse_roll(&dice);
    let table = ScoreTable::build();
    let moves = generate(&table, &Scorecard::new(), &roll, rolls_used);
    for (idx, m) in moves.iter().enumerate() {
        println!("{:>3}  {}", idx, m);
    }
}

struct PlayArgs {
    config_path: Option<String>,
    seed: Option<u64>,
    budget_ms: Option<u64>,
    workers: Option<usize>,
    top_n: Option<usize>,
    opponent: String,
    events: Option<String>,
    quiet: bool,
}

fn parse_play_args(args: &[String]) -> Option<PlayArgs> {
    let mut out = PlayArgs {
        config_path: None,
        seed: None,
        budget_ms: None,
        workers: None,
        top_n: None,
        opponent: "random".to_string(),
        events: None,
        quiet: false,
    };

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"ymc play

USAGE:
    ymc play [--config PATH] [--seed S] [--budget-ms N] [--workers W] [--top-n N]
             [--opponent random|mc] [--events PATH] [--quiet]

OPTIONS:
    --config PATH      YAML config (default: built-in defaults)
    --seed S           Game seed (default: current time)
    --budget-ms N      Thinking time per Monte Carlo decision
    --workers W        Rollout threads per decision
    --top-n N          Highest rollout scores averaged per move
    --opponent P       Seat 1 policy: random or mc (default: random)
    --events PATH      Append NDJSON game events to PATH
    --quiet            Only print the final scorecards
"#
                );
                return None;
            }
            "--config" => {
                out.config_path = Some(parse_value(args, i, "--config"));
                i += 2;
            }
            "--seed" => {
                out.seed = Some(parse_value(args, i, "--seed"));
                i += 2;
            }
            "--budget-ms" => {
                out.budget_ms = Some(parse_value(args, i, "--budget-ms"));
                i += 2;
            }
            "--workers" => {
                out.workers = Some(parse_value(args, i, "--workers"));
                i += 2;
            }
            "--top-n" => {
                out.top_n = Some(parse_value(args, i, "--top-n"));
                i += 2;
            }
            "--opponent" => {
                out.opponent = parse_value(args, i, "--opponent");
                i += 2;
            }
            "--events" => {
                out.events = Some(parse_value(args, i, "--events"));
                i += 2;
            }
            "--quiet" => {
                out.quiet = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `ymc play`: {}", other);
                eprintln!("Run `ymc play --help` for usage.");
                process::exit(1);
            }
        }
    }
    Some(out)
}

fn decision_event(rec: &PlyRecord, policy: &str) -> DecisionEventV1 {
    let top = rec
        .evaluation
        .as_ref()
        .map(|eval| {
            eval.ranking
                .iter()
                .take(3)
                .map(|&idx| {
                    let st = &eval.stats[idx];
                    RankedMoveV1 {
                        index: idx as u32,
                        description: rec.moves[idx].to_string(),
                        games: st.games,
                        wins: st.wins,
                        mean_score: st.mean_score().unwrap_or(0.0),
                        max_score: st.max_score,
                        top_n_avg: st.top_n_average(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let (rollouts, elapsed_ms, fallback) = rec.evaluation.as_ref().map_or((0, 0, false), |e| {
        (e.rollouts, e.elapsed.as_millis() as u64, e.fallback)
    });
    DecisionEventV1::new(
        rec.ply,
        rec.player as u32,
        policy.to_string(),
        rec.roll.faces(),
        rec.rolls_used,
    )
    .with_choice(
        rec.moves.len() as u32,
        rec.chosen_index as u32,
        rec.chosen.to_string(),
    )
    .with_search(rollouts, elapsed_ms, fallback, top)
}

fn cmd_play(args: &[String]) {
    let Some(pa) = parse_play_args(args) else {
        return;
    };

    let mut cfg = match &pa.config_path {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path, e);
            process::exit(1);
        }),
        None => Config::default(),
    };
    if let Some(v) = pa.budget_ms {
        cfg.search.budget_ms = v;
    }
    if let Some(v) = pa.workers {
        cfg.search.workers = v;
    }
    if let Some(v) = pa.top_n {
        cfg.search.top_n = v;
    }
    if pa.events.is_some() {
        cfg.logging.events_path = pa.events.clone();
    }
    if let Err(e) = cfg.validate() {
        eprintln!("{}", e);
        process::exit(1);
    }
    // The Monte Carlo seat only searches two-player games.
    if cfg.game.players != 2 {
        eprintln!("ymc play needs game.players = 2, got {}", cfg.game.players);
        process::exit(1);
    }

    let game_seed = pa.seed.unwrap_or_else(now_ms);
    if cfg.search.seed == 0 {
        cfg.search.seed = splitmix64(game_seed);
    }

    let mc_cfg = EvaluatorConfig::from(&cfg.search);
    let new_mc = |seed: u64| {
        Policy::monte_carlo(EvaluatorConfig {
            seed,
            ..mc_cfg.clone()
        })
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        })
    };
    let mut policies = vec![new_mc(cfg.search.seed)];
    for seat in 1..cfg.game.players {
        let seat_seed = splitmix64(game_seed ^ seat as u64);
        policies.push(match pa.opponent.as_str() {
            "random" => Policy::random(seat_seed),
            "mc" => new_mc(seat_seed),
            other => {
                eprintln!("Unknown opponent policy: {} (expected random or mc)", other);
                process::exit(1);
            }
        });
    }
    let table = Arc::new(ScoreTable::build());
    let state = GameState::new(table, cfg.game.players).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let mut game = Match::new(state, policies, game_seed).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let names: Vec<&'static str> = game.policies().iter().map(Policy::name).collect();

    let mut events = cfg.logging.events_path.as_ref().map(|path| {
        NdjsonWriter::open_append_with_flush(path, cfg.logging.flush_every_lines).unwrap_or_else(
            |e| {
                eprintln!("Failed to open events file {}: {}", path, e);
                process::exit(1);
            },
        )
    });
    let mut log_failed = false;
    if let Some(w) = events.as_mut() {
        let start = GameStartEventV1::new(
            game_seed,
            names.iter().map(|n| n.to_string()).collect(),
            SearchParamsV1 {
                workers: cfg.search.workers as u64,
                budget_ms: cfg.search.budget_ms,
                top_n: cfg.search.top_n as u64,
                seed: cfg.search.seed,
            },
        );
        if let Err(e) = w.write_event(&start) {
            eprintln!("Event log write failed: {}", e);
            log_failed = true;
        }
    }

    if !pa.quiet {
        println!("game seed {}  seats: {}", game_seed, names.join(" vs "));
    }
    let result = game.run_with(|rec| {
        if !pa.quiet {
            println!("{}", render::ply(rec, names[rec.player]));
        }
        if let (Some(w), false) = (events.as_mut(), log_failed) {
            if let Err(e) = w.write_event(&decision_event(rec, names[rec.player])) {
                eprintln!("Event log write failed: {}", e);
                log_failed = true;
            }
        }
    });
    let summary = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Game aborted: {}", e);
            process::exit(1);
        }
    };

    if let Some(w) = events.as_mut() {
        let end = GameEndEventV1::new(summary.plies, summary.scores.clone());
        if !log_failed {
            if let Err(e) = w.write_event(&end).and_then(|_| w.flush()) {
                eprintln!("Event log write failed: {}", e);
            }
        }
    }

    println!();
    print!("{}", render::scorecards(&summary.scorecards, &names));
    match summary.winner {
        Some(seat) => println!("winner: p{} ({}) with {}", seat, names[seat], summary.scores[seat]),
        None => println!("tie at {}", summary.scores.first().copied().unwrap_or(0)),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        "score" => {
            cmd_score(&args[2..]);
        }
        "moves" => {
            cmd_moves(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `ymc --help` for usage.");
            process::exit(1);
        }
    }
}
