//! bg: command line front end for the backgammon engine.
//!
//! Subcommands:
//! - play   (match between random players, or against a human on the console)
//! - moves  (list legal moves from the starting position)

mod console;
mod sink;

use std::env;
use std::io;
use std::process;

use bg_core::{
    format_move, Board, ChanceKind, Color, Config, Game, Player, RandomPlayer,
};
use bg_logging::{MatchManifestV1, NdjsonWriter, MATCH_MANIFEST_VERSION, RULESET_ID};

use console::ConsolePlayer;
use sink::{EventLog, MatchSink};

fn print_help() {
    eprintln!(
        r#"bg - backgammon with the doubling cube

USAGE:
    bg <COMMAND> [OPTIONS]

COMMANDS:
    play                Play a match
    moves               List legal moves from the starting position

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `bg <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("bg {}", env!("CARGO_PKG_VERSION"));
}

fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" | "b" => Some(Color::Black),
        "white" | "w" => Some(Color::White),
        _ => None,
    }
}

fn parse_dice(s: &str) -> Option<[u8; 2]> {
    let (a, b) = s.split_once('-')?;
    let a: u8 = a.trim().parse().ok()?;
    let b: u8 = b.trim().parse().ok()?;
    if (1..=6).contains(&a) && (1..=6).contains(&b) {
        Some([a, b])
    } else {
        None
    }
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    }
    &args[i + 1]
}

fn cmd_play(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut use_rng = false;
    let mut human: Option<Color> = None;
    let mut log_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"bg play

USAGE:
    bg play [--config cfg.yaml] [--seed S] [--rng] [--human black|white] [--log events.ndjson]

OPTIONS:
    --config PATH    YAML config (default: built-in defaults)
    --seed S         Dice seed, overrides chance.seed
    --rng            Use a seeded PRNG stream instead of event-keyed dice
    --human COLOR    Play COLOR from the console; the other side moves randomly
    --log PATH       Append NDJSON events to PATH, overrides logging.events_path
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(value_of(args, i, "--config").to_string());
                i += 2;
            }
            "--seed" => {
                let v = value_of(args, i, "--seed");
                seed = Some(v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --seed value: {v}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--rng" => {
                use_rng = true;
                i += 1;
            }
            "--human" => {
                let v = value_of(args, i, "--human");
                human = Some(parse_color(v).unwrap_or_else(|| {
                    eprintln!("Invalid --human value: {v} (expected black or white)");
                    process::exit(1);
                }));
                i += 2;
            }
            "--log" => {
                log_path = Some(value_of(args, i, "--log").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `bg play`: {other}");
                eprintln!("Run `bg play --help` for usage.");
                process::exit(1);
            }
        }
    }

    let mut cfg = match &config_path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!("Failed to load config {p}: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };
    if let Some(s) = seed {
        cfg.chance.seed = s;
    }
    if use_rng {
        cfg.chance.kind = ChanceKind::Rng;
    }
    if log_path.is_some() {
        cfg.logging.events_path = log_path;
    }

    // Hash the effective config so overrides are part of the record.
    let config_bytes = serde_json::to_vec(&cfg).unwrap_or_else(|e| {
        eprintln!("Failed to encode config: {e}");
        process::exit(1);
    });
    let config_hash = bg_logging::hash_config_bytes(&config_bytes);

    let created_ts_ms = bg_logging::now_ms();
    let match_id = format!("{created_ts_ms}-{}", cfg.chance.seed);

    let mut manifest = MatchManifestV1 {
        match_manifest_version: MATCH_MANIFEST_VERSION,
        match_id: match_id.clone(),
        created_ts_ms,
        ruleset_id: RULESET_ID.to_string(),
        config_hash: Some(config_hash),
        chance_kind: match cfg.chance.kind {
            ChanceKind::Deterministic => "deterministic".to_string(),
            ChanceKind::Rng => "rng".to_string(),
        },
        seed: cfg.chance.seed,
        events_path: cfg.logging.events_path.clone(),
        winning_score: cfg.rules.winning_score,
        rounds: 0,
        final_scores: None,
        winner: None,
        finished_ts_ms: None,
    };
    let manifest_path = cfg
        .logging
        .events_path
        .as_ref()
        .map(|p| format!("{p}.manifest.json"));

    let log = match &cfg.logging.events_path {
        Some(p) => {
            let writer = NdjsonWriter::open_append_with_flush(p, cfg.logging.flush_every_lines)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to open event log {p}: {e}");
                    process::exit(1);
                });
            Some(EventLog::new(writer, match_id))
        }
        None => None,
    };
    if let Some(mp) = &manifest_path {
        bg_logging::write_manifest_atomic(mp, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write match manifest: {e}");
            process::exit(1);
        });
    }

    let mut sink = MatchSink::new(log, human.is_some());
    let mut game = Game::from_config(&cfg);

    // Player seeds are derived from the dice seed so a whole match replays from one number.
    let player_seed = cfg.chance.seed;
    let mut console = ConsolePlayer::new(io::stdin().lock(), io::stdout());
    let mut black_bot = RandomPlayer::new(player_seed.wrapping_mul(2).wrapping_add(1));
    let mut white_bot = RandomPlayer::new(player_seed.wrapping_mul(2).wrapping_add(2));
    let (black, white): (&mut dyn Player, &mut dyn Player) = match human {
        Some(Color::Black) => (&mut console, &mut white_bot),
        Some(Color::White) => (&mut black_bot, &mut console),
        None => (&mut black_bot, &mut white_bot),
    };

    let result = game
        .play_match(black, white, &mut sink)
        .unwrap_or_else(|e| {
            eprintln!("Match aborted: {e}");
            process::exit(1);
        });

    if let Err(e) = sink.finish() {
        eprintln!("Failed to write event log: {e}");
        process::exit(1);
    }
    if let Some(mp) = &manifest_path {
        manifest.rounds = result.rounds;
        manifest.final_scores = Some(result.scores);
        manifest.winner = Some(result.winner.to_string().to_lowercase());
        manifest.finished_ts_ms = Some(bg_logging::now_ms());
        bg_logging::write_manifest_atomic(mp, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write match manifest: {e}");
            process::exit(1);
        });
    }

    println!(
        "{} wins the match {}-{} after {} rounds",
        result.winner, result.scores[0], result.scores[1], result.rounds
    );
}

fn cmd_moves(args: &[String]) {
    let mut dice: Option<[u8; 2]> = None;
    let mut color = Color::Black;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"bg moves

USAGE:
    bg moves --dice A-B [--color black|white]

OPTIONS:
    --dice A-B       The roll, e.g. 3-1 or 6-6
    --color COLOR    Side to move (default: black)
"#
                );
                return;
            }
            "--dice" => {
                let v = value_of(args, i, "--dice");
                dice = Some(parse_dice(v).unwrap_or_else(|| {
                    eprintln!("Invalid --dice value: {v} (expected A-B with 1..=6)");
                    process::exit(1);
                }));
                i += 2;
            }
            "--color" => {
                let v = value_of(args, i, "--color");
                color = parse_color(v).unwrap_or_else(|| {
                    eprintln!("Invalid --color value: {v} (expected black or white)");
                    process::exit(1);
                });
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `bg moves`: {other}");
                eprintln!("Run `bg moves --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(dice) = dice else {
        eprintln!("Missing --dice");
        process::exit(1);
    };

    let moves = Board::starting().list_moves(color, dice);
    for (i, mv) in moves.iter().enumerate() {
        println!("{i}: {}", format_move(mv, color));
    }
    println!("{} legal moves", moves.len());
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
        "moves" => {
            cmd_moves(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            eprintln!("Run `bg --help` for usage.");
            process::exit(1);
        }
    }
}
