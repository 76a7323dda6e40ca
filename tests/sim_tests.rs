use matinee::data::enemy::builtin_roster;
use matinee::data::moves::MoveRegistry;
use matinee::data::party::builtin_party;
use matinee::parallel::{run_battle_batch, WorkerPool};
use matinee::sim::{run_battle, BattleConfig, BattleOutcome, DEFAULT_MAX_TURNS};

fn config(enemy_id: &str) -> BattleConfig {
    let roster = builtin_roster();
    let enemy = roster
        .into_iter()
        .find(|e| e.id == enemy_id)
        .expect("builtin enemy");
    let registry = MoveRegistry::builtin();
    let moves = registry.resolve_pool(&enemy.moves);
    BattleConfig::new(enemy, builtin_party(), moves)
}

#[test]
fn battles_always_terminate_within_the_turn_cap() {
    for seed in 0..10 {
        let report = run_battle(&config("disney_adult").with_seed(seed));
        assert!(report.turns >= 1);
        assert!(report.turns <= DEFAULT_MAX_TURNS);
    }
}

#[test]
fn report_is_reproducible_for_a_seed() {
    let a = run_battle(&config("brain_rot").with_seed(99));
    let b = run_battle(&config("brain_rot").with_seed(99));
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.turns, b.turns);
    assert_eq!(a.enemy_hp_remaining, b.enemy_hp_remaining);
    assert_eq!(a.events.len(), b.events.len());
    assert_eq!(a.award.pool, b.award.pool);
    // ids and timestamps are per-run, everything else matches
    assert_ne!(a.battle_id, b.battle_id);
}

#[test]
fn victory_report_is_consistent() {
    let mut cfg = config("disney_adult");
    cfg.enemy.max_hp = 40;
    cfg.enemy.attack = 2;
    let report = run_battle(&cfg.with_seed(4));
    assert_eq!(report.outcome, BattleOutcome::Victory);
    assert_eq!(report.enemy_hp_remaining, 0);
    assert!(report.survivors >= 1);
    assert_eq!(report.award.awards.len(), 4);
}

#[test]
fn defeat_report_has_no_survivors() {
    let mut cfg = config("film_bro");
    cfg.enemy.attack = 4000;
    cfg.enemy.max_hp = 100_000;
    let report = run_battle(&cfg.with_seed(4));
    assert_eq!(report.outcome, BattleOutcome::Defeat);
    assert_eq!(report.survivors, 0);
    // XP is still awarded, just penalized per actor
    assert!(report.award.pool >= 1);
    assert!(report.award.awards.iter().all(|a| a.downed));
}

#[test]
fn report_serializes_to_json() {
    let report = run_battle(&config("old_head").with_seed(17));
    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["enemyId"], "old_head");
    assert!(value["events"].is_array());
    assert!(value["award"]["pool"].as_i64().unwrap() >= 1);
}

#[test]
fn batch_summary_counts_are_consistent() {
    let summary = run_battle_batch(&config("critic"), 24, 500, &WorkerPool::default_workers());
    assert_eq!(summary.battles, 24);
    assert_eq!(
        summary.victories + summary.defeats + summary.turn_limits,
        summary.battles
    );
    assert!(summary.avg_turns >= 1.0);
    assert!(summary.avg_xp_pool >= 1.0);
}

#[test]
fn batch_results_do_not_depend_on_worker_count() {
    let serial = run_battle_batch(&config("old_head"), 12, 7, &WorkerPool::with_workers(1));
    let parallel = run_battle_batch(&config("old_head"), 12, 7, &WorkerPool::with_workers(4));
    assert_eq!(serial.victories, parallel.victories);
    assert_eq!(serial.defeats, parallel.defeats);
    assert_eq!(serial.avg_turns, parallel.avg_turns);
}
