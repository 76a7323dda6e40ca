pub mod runner;

pub use runner::{run_battle, BattleConfig, BattleOutcome, BattleReport, DEFAULT_MAX_TURNS};
