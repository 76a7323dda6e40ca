//! Enemy turn planning: decides and resolves an entire enemy turn (1..N actions)
//! against a simulation copy of the battle state, then commits the results:
//! immediately by default, or deferred so the caller can animate one hit at a time
//! while every decision was made against a single consistent pre-turn snapshot.

use crate::combat::combatant::{alive_indices, Combatant};
use crate::combat::damage::resolve_enemy_attack;
use crate::combat::events::BattleEvent;
use crate::combat::rng::Rng;
use crate::data::enemy::ActionsPerTurn;
use crate::data::moves::MoveRecord;

pub const MAX_ACTIONS_PER_TURN: u32 = 12;
/// Flat whiff chance for a dazed enemy, rolled per action.
pub const DAZED_MISS_CHANCE: f64 = 0.35;
/// Self-heal branch restores this fraction of the enemy's max HP.
pub const CONFUSED_SELF_HEAL_FRACTION: f64 = 0.10;
/// Extra miss chance while the low-accuracy confusion branch is in effect.
pub const CONFUSED_WILD_MISS_CHANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyTurnOptions {
    /// Caller-set comedy disruption: the whole turn is replaced by a single
    /// disruption event. Checked before stun; if both hold, disruption wins.
    pub funny_disrupt: bool,
    /// Plan only; the caller applies the results explicitly via
    /// [EnemyTurnPlan::commit].
    pub defer_apply: bool,
}

/// Outcome of one planned enemy turn. Events are ordered as they occurred.
#[derive(Debug, Clone)]
pub struct EnemyTurnPlan {
    pub events: Vec<BattleEvent>,
    pub party_defeated: bool,
    enemy_after: Combatant,
    party_after: Vec<Combatant>,
    committed: bool,
}

impl EnemyTurnPlan {
    /// Write the simulated end-of-turn state back onto the real objects. Idempotent;
    /// a plan built without `defer_apply` arrives already committed.
    pub fn commit(&mut self, enemy: &mut Combatant, party: &mut [Combatant]) {
        if self.committed {
            return;
        }
        commit_state(&self.enemy_after, &self.party_after, enemy, party);
        self.committed = true;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Simulated enemy state at end of turn (for callers that narrate before committing).
    pub fn enemy_after(&self) -> &Combatant {
        &self.enemy_after
    }

    pub fn party_after(&self) -> &[Combatant] {
        &self.party_after
    }
}

fn commit_state(enemy_after: &Combatant, party_after: &[Combatant], enemy: &mut Combatant, party: &mut [Combatant]) {
    enemy.hp = enemy_after.hp;
    enemy.atk = enemy_after.atk;
    enemy.temp_shield = enemy_after.temp_shield;
    enemy.statuses = enemy_after.statuses.clone();
    enemy.clamp_vitals();
    for (member, simulated) in party.iter_mut().zip(party_after.iter()) {
        member.hp = simulated.hp;
        member.temp_shield = simulated.temp_shield;
        member.is_defending = simulated.is_defending;
        member.clamp_vitals();
    }
}

/// Number of actions this turn: the roster value, clamped to [1, 12], then capped
/// by an active action-limit status. Ranges are sampled once per turn.
fn roll_action_count(
    enemy: &Combatant,
    actions_per_turn: Option<ActionsPerTurn>,
    rng: &mut Rng,
) -> u32 {
    let rolled = match actions_per_turn {
        Some(ActionsPerTurn::Fixed(n)) => n,
        Some(ActionsPerTurn::Range { min, max }) => {
            let lo = min.clamp(1, MAX_ACTIONS_PER_TURN);
            let hi = max.clamp(lo, MAX_ACTIONS_PER_TURN);
            rng.range_inclusive(lo, hi)
        }
        None => 1,
    };
    let clamped = rolled.clamp(1, MAX_ACTIONS_PER_TURN);
    match enemy.statuses.action_cap() {
        Some(cap) => clamped.min(cap),
        None => clamped,
    }
}

fn pick_weighted_move<'a>(pool: &'a [MoveRecord], rng: &mut Rng) -> Option<&'a MoveRecord> {
    if pool.is_empty() {
        return None;
    }
    let weights: Vec<f64> = pool.iter().map(MoveRecord::sane_weight).collect();
    rng.weighted_index(&weights).map(|i| &pool[i])
}

enum ConfusionOutcome {
    /// Proc roll missed or not confused; the action proceeds untouched.
    NotTriggered,
    /// Action consumed by a confusion branch.
    ActionConsumed,
    /// Low-accuracy mode let the intended attack proceed.
    AttackProceeds,
}

/// One pass of the confusion machine for one action. Mutates the simulated enemy's
/// confusion state (triggered flag, ramped chances, possible clear) and pushes the
/// branch events. A proc roll that does not fire is invisible.
fn run_confusion_machine(
    sim_enemy: &mut Combatant,
    move_id: &str,
    events: &mut Vec<BattleEvent>,
    rng: &mut Rng,
) -> ConfusionOutcome {
    let Some(mut confusion) = sim_enemy.statuses.confusion else {
        return ConfusionOutcome::NotTriggered;
    };
    if !rng.chance(confusion.proc_chance) {
        return ConfusionOutcome::NotTriggered;
    }

    confusion.triggered = true;

    let branch = rng.range_inclusive(0, 2);
    let outcome = match branch {
        0 => {
            events.push(BattleEvent::EnemyConfusedMisfire {
                move_id: move_id.to_string(),
            });
            ConfusionOutcome::ActionConsumed
        }
        1 => {
            let heal = ((sim_enemy.max_hp as f64) * CONFUSED_SELF_HEAL_FRACTION).round() as i64;
            let healed = crate::combat::damage::apply_heal(sim_enemy, heal.max(1));
            events.push(BattleEvent::EnemyConfusedSelfHeal {
                healed,
                new_hp: sim_enemy.hp,
            });
            ConfusionOutcome::ActionConsumed
        }
        _ => {
            if rng.chance(CONFUSED_WILD_MISS_CHANCE) {
                events.push(BattleEvent::EnemyConfusedWildMiss {
                    move_id: move_id.to_string(),
                });
                ConfusionOutcome::ActionConsumed
            } else {
                events.push(BattleEvent::EnemyConfusedLowAccuracyHit {});
                ConfusionOutcome::AttackProceeds
            }
        }
    };

    // Ramp after any triggered branch, then the clear roll may end confusion now.
    confusion.ramp_up();
    let cleared = rng.chance(confusion.clear_chance);
    if cleared {
        sim_enemy.statuses.confusion = None;
        events.push(BattleEvent::EnemyConfusionCleared {});
    } else {
        sim_enemy.statuses.confusion = Some(confusion);
    }

    outcome
}

/// Plan and (by default) apply one full enemy turn.
///
/// Never errors: a party with no living member short-circuits to
/// `party_defeated: true` with whatever events were generated so far.
pub fn plan_enemy_turn(
    enemy: &mut Combatant,
    party: &mut [Combatant],
    moves: &[MoveRecord],
    actions_per_turn: Option<ActionsPerTurn>,
    options: EnemyTurnOptions,
    rng: &mut Rng,
) -> EnemyTurnPlan {
    let mut events = Vec::new();

    if alive_indices(party).is_empty() {
        return finished_plan(events, true, enemy, party);
    }

    if options.funny_disrupt {
        events.push(BattleEvent::TurnDisruptedFunny {});
        return finished_plan(events, false, enemy, party);
    }

    if enemy.statuses.is_stunned() {
        events.push(BattleEvent::EnemyStunnedSkip {});
        return finished_plan(events, false, enemy, party);
    }

    let actions = roll_action_count(enemy, actions_per_turn, rng);

    // All decisions run against simulation copies; real state is written back at
    // commit time only.
    let mut sim_enemy = enemy.clone();
    let mut sim_party: Vec<Combatant> = party.to_vec();

    let fallback = MoveRecord::fallback_attack();
    let mut party_defeated = false;

    for _ in 0..actions {
        let alive = alive_indices(&sim_party);
        if alive.is_empty() {
            party_defeated = true;
            break;
        }
        let target_index = alive[rng.index(alive.len())];

        let chosen = pick_weighted_move(moves, rng).unwrap_or(&fallback);

        if !chosen.is_attack() {
            events.push(BattleEvent::EnemyMoveUnknown {
                move_id: chosen.id.clone(),
            });
            continue;
        }

        match run_confusion_machine(&mut sim_enemy, &chosen.id, &mut events, rng) {
            ConfusionOutcome::ActionConsumed => continue,
            ConfusionOutcome::NotTriggered | ConfusionOutcome::AttackProceeds => {}
        }

        // Daze whiff is independent of confusion.
        if sim_enemy.statuses.is_dazed() && rng.chance(DAZED_MISS_CHANCE) {
            events.push(BattleEvent::EnemyMissDazed {
                move_id: chosen.id.clone(),
            });
            continue;
        }

        // Move multiplier goes onto base attack for this action only; the base is
        // restored afterwards so debuffs are re-derived fresh each action instead
        // of compounding across the turn.
        let base_atk = sim_enemy.atk;
        sim_enemy.atk = ((base_atk as f64) * chosen.sane_power_multiplier()).round().max(1.0) as i64;

        let guarded = sim_party[target_index].is_defending;
        let outcome = resolve_enemy_attack(&sim_enemy, &mut sim_party[target_index], rng);

        sim_enemy.atk = base_atk;

        if guarded {
            // One absorbed hit consumes the defend stance.
            sim_party[target_index].is_defending = false;
        }

        events.push(BattleEvent::EnemyAttackHit {
            move_id: chosen.id.clone(),
            target_index,
            damage: outcome.damage,
            absorbed_shield: outcome.absorbed_shield,
            is_crit: outcome.is_crit,
            is_mortal: outcome.killed,
            guarded,
            new_hp: outcome.new_hp,
            new_shield: sim_party[target_index].temp_shield,
            consume_defend: guarded,
        });
    }

    if alive_indices(&sim_party).is_empty() {
        party_defeated = true;
    }

    let mut plan = EnemyTurnPlan {
        events,
        party_defeated,
        enemy_after: sim_enemy,
        party_after: sim_party,
        committed: false,
    };
    if !options.defer_apply {
        plan.commit(enemy, party);
    }
    plan
}

/// Plan for a turn that never entered the action loop: state is unchanged, so the
/// plan is born committed.
fn finished_plan(
    events: Vec<BattleEvent>,
    party_defeated: bool,
    enemy: &Combatant,
    party: &[Combatant],
) -> EnemyTurnPlan {
    EnemyTurnPlan {
        events,
        party_defeated,
        enemy_after: enemy.clone(),
        party_after: party.to_vec(),
        committed: true,
    }
}
