use std::env;
use std::fmt::Write as _;
use std::path::Path;

use crate::combat::export_csv::export_events_csv;
use crate::data::enemy::{resolve_enemy, roster_or_builtin};
use crate::data::moves::MoveRegistry;
use crate::data::party::party_or_builtin;
use crate::data::validate::validate_all;
use crate::parallel::{run_battle_batch, WorkerPool};
use crate::sim::runner::{run_battle, BattleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Batch,
    Export,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("batch") => Some(Command::Batch),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Batch) => handle_batch(args),
        Some(Command::Export) => handle_export(args),
        Some(Command::Validate) => handle_validate(),
        None => {
            eprintln!("usage: matinee <simulate|batch|export|validate>");
            2
        }
    }
}

/// Content directory, overridable with MATINEE_DATA_DIR. Missing files fall
/// back to the built-in content either way.
fn data_path(file: &str) -> String {
    let dir = env::var("MATINEE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    format!("{dir}/{file}")
}

fn battle_config(enemy_arg: Option<&String>) -> Option<BattleConfig> {
    let roster = roster_or_builtin(&data_path("enemies.json"));
    let wanted = enemy_arg.map(String::as_str).unwrap_or("disney_adult");
    let Some(enemy) = resolve_enemy(&roster, wanted) else {
        eprintln!("unknown enemy '{wanted}'");
        return None;
    };
    let registry = MoveRegistry::load(&data_path("moves.json"));
    let moves = registry.resolve_pool(&enemy.moves);
    let party = party_or_builtin(&data_path("party.json"));
    Some(BattleConfig::new(enemy.clone(), party, moves))
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some(config) = battle_config(args.get(2)) else {
        return 2;
    };
    let seed = parse_u64_arg(args.get(3), "seed", 7);
    let as_table = args.iter().any(|arg| arg == "--table");

    let report = run_battle(&config.with_seed(seed));

    if as_table {
        println!("enemy\tseed\toutcome\tturns\tsurvivors\txp_pool");
        println!(
            "{}\t{}\t{:?}\t{}\t{}\t{}",
            report.enemy_id, report.seed, report.outcome, report.turns, report.survivors,
            report.award.pool
        );
    } else {
        match serde_json::to_string_pretty(&report) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize battle report: {err}");
                return 1;
            }
        }
    }

    0
}

fn handle_batch(args: &[String]) -> i32 {
    let Some(config) = battle_config(args.get(2)) else {
        return 2;
    };
    let count = parse_u32_arg(args.get(3), "count", 250) as usize;
    let seed = parse_u64_arg(args.get(4), "seed", 7);
    let workers = parse_u32_arg(args.get(5), "workers", 0) as usize;

    let pool = if workers == 0 {
        WorkerPool::default_workers()
    } else {
        WorkerPool::with_workers(workers)
    };
    let summary = run_battle_batch(&config, count, seed, &pool);

    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize batch summary: {err}");
            1
        }
    }
}

fn handle_export(args: &[String]) -> i32 {
    let Some(config) = battle_config(args.get(2)) else {
        return 2;
    };
    let seed = parse_u64_arg(args.get(3), "seed", 7);
    let out_path = args
        .get(4)
        .map(String::as_str)
        .unwrap_or("battle_events.csv");

    let report = run_battle(&config.with_seed(seed));
    match export_events_csv(Path::new(out_path), &report.battle_id, &report.events) {
        Ok(rows) => {
            println!(
                "export complete: rows={rows}, outcome={:?}, path='{out_path}'",
                report.outcome
            );
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_validate() -> i32 {
    let roster = roster_or_builtin(&data_path("enemies.json"));
    let registry = MoveRegistry::load(&data_path("moves.json"));
    let party = party_or_builtin(&data_path("party.json"));

    let report = validate_all(&roster, &registry, &party);
    if report.diagnostics.is_empty() {
        println!("validation passed: no diagnostics");
        return 0;
    }
    for diag in &report.diagnostics {
        println!("[{}] {}: {}", diag.severity, diag.context, diag.message);
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} diagnostic(s)",
            report.diagnostics.len()
        );
        1
    } else {
        println!("validation passed with warnings");
        0
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                let mut msg = String::new();
                let _ = write!(
                    &mut msg,
                    "invalid {name} '{value}', defaulting to {default}"
                );
                eprintln!("{msg}");
            }
            default
        })
}
