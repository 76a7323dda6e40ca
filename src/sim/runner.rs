//! Scripted auto-battle runner. Drives a full battle from content records with a
//! seeded RNG: party attacks (defending when hurt), statuses tick at turn
//! boundaries, the enemy planner runs once per enemy phase, and XP is awarded
//! exactly once at battle end.

use serde::Serialize;

use crate::combat::combatant::{alive_indices, Combatant};
use crate::combat::damage::resolve_player_attack;
use crate::combat::enemy_turn::{plan_enemy_turn, EnemyTurnOptions};
use crate::combat::events::BattleEvent;
use crate::combat::rng::Rng;
use crate::combat::tick::{tick_actor_statuses, tick_enemy_statuses};
use crate::combat::xp::{award_battle_xp, AwardResult, BattleXpTracker};
use crate::data::enemy::EnemyRecord;
use crate::data::moves::MoveRecord;
use crate::data::party::PartyMemberRecord;

pub const DEFAULT_MAX_TURNS: u32 = 50;
/// Below this HP fraction the scripted party member defends instead of attacking.
const DEFEND_HP_FRACTION: f64 = 0.35;
/// At or below this HP fraction a hit counts as a low-HP moment for the tracker.
const LOW_HP_FRACTION: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct BattleConfig {
    pub enemy: EnemyRecord,
    pub party: Vec<PartyMemberRecord>,
    /// Resolved move pool for the enemy; empty falls back to the basic attack.
    pub moves: Vec<MoveRecord>,
    pub seed: u64,
    pub max_turns: u32,
}

impl BattleConfig {
    pub fn new(enemy: EnemyRecord, party: Vec<PartyMemberRecord>, moves: Vec<MoveRecord>) -> Self {
        Self {
            enemy,
            party,
            moves,
            seed: 0,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    TurnLimit,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    pub battle_id: String,
    pub started_at: String,
    pub seed: u64,
    pub enemy_id: String,
    pub outcome: BattleOutcome,
    pub turns: u32,
    pub survivors: usize,
    pub enemy_hp_remaining: i64,
    pub events: Vec<BattleEvent>,
    pub award: AwardResult,
}

/// Run one battle to completion. Deterministic for a given config and seed.
pub fn run_battle(config: &BattleConfig) -> BattleReport {
    let mut rng = Rng::new(config.seed);
    let mut enemy = config.enemy.to_combatant();
    let mut party: Vec<Combatant> = config
        .party
        .iter()
        .map(PartyMemberRecord::to_combatant)
        .collect();

    let mut tracker = BattleXpTracker::new(party.len(), &enemy);
    let mut events: Vec<BattleEvent> = Vec::new();
    let mut outcome = BattleOutcome::TurnLimit;
    let mut turns = 0;

    for _ in 0..config.max_turns.max(1) {
        turns += 1;

        // Party phase: hurt members defend, the rest attack.
        for index in alive_indices(&party) {
            let hp_fraction = party[index].hp as f64 / party[index].max_hp.max(1) as f64;
            if hp_fraction < DEFEND_HP_FRACTION && !party[index].is_defending {
                party[index].is_defending = true;
                tracker.record_defend(index, 0);
                continue;
            }
            let hit = resolve_player_attack(&party[index], &mut enemy, &mut rng);
            tracker.record_attack(index, hit.damage);
            if hit.killed {
                break;
            }
        }
        if !enemy.is_alive() {
            outcome = BattleOutcome::Victory;
            break;
        }

        for index in 0..party.len() {
            events.extend(tick_actor_statuses(&mut party[index], index));
        }

        // Enemy phase.
        tracker.record_enemy_phase();
        let plan = plan_enemy_turn(
            &mut enemy,
            &mut party,
            &config.moves,
            config.enemy.actions_per_turn,
            EnemyTurnOptions::default(),
            &mut rng,
        );
        for event in &plan.events {
            if let BattleEvent::EnemyAttackHit {
                target_index,
                damage,
                absorbed_shield,
                is_mortal,
                new_hp,
                ..
            } = event
            {
                let max_hp = party
                    .get(*target_index)
                    .map(|m| m.max_hp.max(1))
                    .unwrap_or(1);
                let low_hp = (*new_hp as f64) <= (max_hp as f64) * LOW_HP_FRACTION;
                tracker.record_enemy_hit(*target_index, *damage, *absorbed_shield, *is_mortal, low_hp);
            }
        }
        let party_defeated = plan.party_defeated;
        events.extend(plan.events);
        if party_defeated {
            outcome = BattleOutcome::Defeat;
            break;
        }

        events.extend(tick_enemy_statuses(&mut enemy));
    }

    let survivors = alive_indices(&party).len();
    let award = award_battle_xp(tracker, &mut party);

    BattleReport {
        battle_id: uuid::Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        seed: config.seed,
        enemy_id: config.enemy.id.clone(),
        outcome,
        turns,
        survivors,
        enemy_hp_remaining: enemy.hp,
        events,
        award,
    }
}
