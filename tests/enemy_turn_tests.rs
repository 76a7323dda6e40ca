use matinee::combat::{
    plan_enemy_turn, BattleEvent, Combatant, ConfusionState, EnemyTurnOptions, Rng,
};
use matinee::data::enemy::ActionsPerTurn;
use matinee::data::moves::MoveRecord;

fn enemy() -> Combatant {
    let mut e = Combatant::new("e", "Enemy", 300, 30, 5);
    e.crit_chance = 0.0;
    e
}

fn party() -> Vec<Combatant> {
    vec![
        Combatant::new("a", "A", 400, 15, 5),
        Combatant::new("b", "B", 400, 12, 8),
    ]
}

fn attack_pool() -> Vec<MoveRecord> {
    vec![MoveRecord::fallback_attack()]
}

fn count_hits(events: &[BattleEvent]) -> usize {
    events.iter().filter(|e| e.is_attack_hit()).count()
}

#[test]
fn stunned_enemy_skips_the_whole_turn() {
    let mut foe = enemy();
    foe.statuses.set_stun(2);
    let mut members = party();
    let hp_before: Vec<i64> = members.iter().map(|m| m.hp).collect();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(3)),
        EnemyTurnOptions::default(),
        &mut Rng::new(5),
    );

    assert_eq!(plan.events.len(), 1);
    assert!(matches!(plan.events[0], BattleEvent::EnemyStunnedSkip {}));
    let hp_after: Vec<i64> = members.iter().map(|m| m.hp).collect();
    assert_eq!(hp_before, hp_after);
}

#[test]
fn stun_counts_down_across_turns_then_clears() {
    let mut foe = enemy();
    foe.statuses.set_stun(2);
    let mut members = party();

    let first = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(1)),
        EnemyTurnOptions::default(),
        &mut Rng::new(5),
    );
    assert!(matches!(first.events[0], BattleEvent::EnemyStunnedSkip {}));

    matinee::combat::tick_enemy_statuses(&mut foe);
    assert_eq!(foe.statuses.stun_turns, Some(1));

    let second = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(1)),
        EnemyTurnOptions::default(),
        &mut Rng::new(6),
    );
    assert!(matches!(second.events[0], BattleEvent::EnemyStunnedSkip {}));

    matinee::combat::tick_enemy_statuses(&mut foe);
    assert!(foe.statuses.stun_turns.is_none());
    assert!(!foe.statuses.is_stunned());
}

#[test]
fn funny_disruption_wins_over_stun() {
    let mut foe = enemy();
    foe.statuses.set_stun(1);
    let mut members = party();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        None,
        EnemyTurnOptions {
            funny_disrupt: true,
            defer_apply: false,
        },
        &mut Rng::new(5),
    );

    assert_eq!(plan.events.len(), 1);
    assert!(matches!(plan.events[0], BattleEvent::TurnDisruptedFunny {}));
}

#[test]
fn fixed_action_count_produces_that_many_hits() {
    let mut foe = enemy();
    let mut members = party();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(3)),
        EnemyTurnOptions::default(),
        &mut Rng::new(11),
    );

    // No statuses in play: every action lands as an attack hit.
    assert_eq!(count_hits(&plan.events), 3);
    let total_lost: i64 = members.iter().map(|m| 400 - m.hp).sum();
    assert!(total_lost > 0);
}

#[test]
fn action_limit_caps_a_multi_action_turn() {
    let mut foe = enemy();
    foe.statuses.set_action_limit(1, 2);
    let mut members = party();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(5)),
        EnemyTurnOptions::default(),
        &mut Rng::new(11),
    );

    assert_eq!(count_hits(&plan.events), 1);
}

#[test]
fn defer_apply_leaves_real_state_untouched_until_commit() {
    let mut foe = enemy();
    let mut members = party();

    let mut plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(2)),
        EnemyTurnOptions {
            funny_disrupt: false,
            defer_apply: true,
        },
        &mut Rng::new(3),
    );

    assert!(!plan.is_committed());
    assert!(members.iter().all(|m| m.hp == 400));

    plan.commit(&mut foe, &mut members);
    assert!(plan.is_committed());
    let total_lost: i64 = members.iter().map(|m| 400 - m.hp).sum();
    assert!(total_lost > 0);

    // Second commit is a no-op.
    let snapshot: Vec<i64> = members.iter().map(|m| m.hp).collect();
    plan.commit(&mut foe, &mut members);
    let again: Vec<i64> = members.iter().map(|m| m.hp).collect();
    assert_eq!(snapshot, again);
}

#[test]
fn certain_confusion_always_interferes() {
    let mut foe = enemy();
    foe.statuses.set_confused_with(ConfusionState {
        proc_chance: 1.0,
        clear_chance: 0.0,
        ramp_proc: 0.15,
        ramp_clear: 0.0,
        triggered: false,
    });
    let mut members = party();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(4)),
        EnemyTurnOptions::default(),
        &mut Rng::new(21),
    );

    let confusion_events = plan
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                BattleEvent::EnemyConfusedMisfire { .. }
                    | BattleEvent::EnemyConfusedSelfHeal { .. }
                    | BattleEvent::EnemyConfusedWildMiss { .. }
                    | BattleEvent::EnemyConfusedLowAccuracyHit {}
            )
        })
        .count();
    assert_eq!(confusion_events, 4);

    // clear_chance 0 means confusion survives the turn; proc never decreases.
    let confusion = foe.statuses.confusion.expect("still confused");
    assert!(confusion.triggered);
    assert!(confusion.proc_chance >= 1.0);
    assert_eq!(confusion.clear_chance, 0.0);
}

#[test]
fn certain_clear_ends_confusion_on_first_trigger() {
    let mut foe = enemy();
    foe.statuses.set_confused_with(ConfusionState {
        proc_chance: 1.0,
        clear_chance: 1.0,
        ramp_proc: 0.15,
        ramp_clear: 0.25,
        triggered: false,
    });
    let mut members = party();

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(3)),
        EnemyTurnOptions::default(),
        &mut Rng::new(8),
    );

    let cleared = plan
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::EnemyConfusionCleared {}))
        .count();
    assert_eq!(cleared, 1);
    assert!(foe.statuses.confusion.is_none());
}

#[test]
fn dazed_enemy_whiffs_some_actions_across_seeds() {
    let mut misses = 0;
    for seed in 0..40 {
        let mut foe = enemy();
        foe.statuses.set_dazed(3);
        let mut members = party();
        let plan = plan_enemy_turn(
            &mut foe,
            &mut members,
            &attack_pool(),
            Some(ActionsPerTurn::Fixed(2)),
            EnemyTurnOptions::default(),
            &mut Rng::new(seed),
        );
        misses += plan
            .events
            .iter()
            .filter(|e| matches!(e, BattleEvent::EnemyMissDazed { .. }))
            .count();
    }
    assert!(misses > 0);
}

#[test]
fn unknown_move_kind_resolves_to_no_op_event() {
    let mut foe = enemy();
    let mut members = party();
    let pool = vec![MoveRecord {
        id: "plot_twist".to_string(),
        name: "Plot Twist".to_string(),
        kind: "ritual".to_string(),
        power_multiplier: 1.0,
        weight: 1.0,
    }];

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &pool,
        Some(ActionsPerTurn::Fixed(2)),
        EnemyTurnOptions::default(),
        &mut Rng::new(2),
    );

    assert_eq!(plan.events.len(), 2);
    assert!(plan
        .events
        .iter()
        .all(|e| matches!(e, BattleEvent::EnemyMoveUnknown { .. })));
    assert!(members.iter().all(|m| m.hp == 400));
}

#[test]
fn defend_stance_is_consumed_by_one_hit() {
    let mut foe = enemy();
    let mut members = party();
    members[0].is_defending = true;
    members[1].hp = 0; // force all hits onto member 0

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(2)),
        EnemyTurnOptions::default(),
        &mut Rng::new(13),
    );

    let hits: Vec<&BattleEvent> = plan.events.iter().filter(|e| e.is_attack_hit()).collect();
    assert_eq!(hits.len(), 2);
    match (hits[0], hits[1]) {
        (
            BattleEvent::EnemyAttackHit {
                guarded: first_guarded,
                consume_defend: first_consume,
                ..
            },
            BattleEvent::EnemyAttackHit {
                guarded: second_guarded,
                ..
            },
        ) => {
            assert!(first_guarded);
            assert!(first_consume);
            assert!(!second_guarded);
        }
        _ => unreachable!(),
    }
    assert!(!members[0].is_defending);
}

#[test]
fn wiping_the_party_sets_the_defeat_flag() {
    let mut foe = Combatant::new("e", "Enemy", 300, 5000, 0);
    foe.crit_chance = 0.0;
    let mut members = vec![Combatant::new("a", "A", 50, 10, 0)];

    let plan = plan_enemy_turn(
        &mut foe,
        &mut members,
        &attack_pool(),
        Some(ActionsPerTurn::Fixed(1)),
        EnemyTurnOptions::default(),
        &mut Rng::new(1),
    );

    assert!(plan.party_defeated);
    assert!(members.iter().all(|m| !m.is_alive()));
}
