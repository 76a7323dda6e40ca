//! Battle XP accrual and end-of-battle progression. A tracker accumulates
//! per-actor performance metrics while the battle runs; at battle end it is
//! consumed exactly once to compute a threat-scaled, pacing-adjusted XP pool,
//! split it across the party, and apply level-up growth.

use serde::Serialize;

use crate::combat::combatant::{Combatant, CRIT_CHANCE_CAP, EVASION_CAP};

pub const DOWNED_XP_MULT: f64 = 0.5;
pub const BASE_SHARE_FRACTION: f64 = 0.40;
pub const CONTRIBUTION_SHARE_FRACTION: f64 = 0.60;
/// Every participant, downed or not, takes at least this fraction of an equal
/// base share.
pub const BASE_SHARE_FLOOR: f64 = 0.15;

pub const PACING_MIN: f64 = 0.85;
pub const PACING_MAX: f64 = 1.15;
pub const ADVERSITY_CAP: f64 = 0.25;
pub const STALL_PENALTY_CAP: f64 = 0.30;
pub const SURVIVAL_MIN: f64 = 0.55;
pub const SURVIVAL_MAX: f64 = 1.40;

pub const LEVEL_LOOP_GUARD: u32 = 100;
pub const HP_GROWTH: f64 = 1.06;
pub const ATK_GROWTH: f64 = 1.05;
pub const DEF_GROWTH: f64 = 1.04;

const WEIGHT_DAMAGE: f64 = 0.30;
const WEIGHT_HEAL: f64 = 0.20;
const WEIGHT_MITIGATION: f64 = 0.20;
const WEIGHT_UTILITY: f64 = 0.30;

const ATTACK_XP_RATE: f64 = 0.30;
const ATTACK_BIG_HIT_THRESHOLD: i64 = 50;
const ATTACK_BIG_HIT_BONUS: f64 = 8.0;
const DEFEND_BASE_XP: f64 = 1.0;
const DEFEND_ABSORB_RATE: f64 = 0.25;
const ITEM_HEAL_RATE: f64 = 0.25;
const TEAM_HEAL_BONUS: f64 = 6.0;
const SPECIAL_SHIELD_RATE: f64 = 0.25;
const UTILITY_PER_FLAG: f64 = 5.0;
/// Ledger scale while the caller reports the input-hold flag as set.
const INPUT_HOLD_FACTOR: f64 = 0.5;
/// Action value below this counts as low-impact for stall tracking.
const LOW_IMPACT_THRESHOLD: f64 = 1.0;
/// Action value at or above this counts as high-impact and relieves the chain.
const HIGH_IMPACT_THRESHOLD: f64 = 15.0;
const STALL_UNIT: f64 = 0.03;
const STALL_RELIEF: f64 = 0.06;

/// Per-level slot increments applied on level-up.
const FRONT_SLOT_CRIT_PER_LEVEL: f64 = 0.003;
const FRONT_SLOT_CRIT_DAMAGE_PER_LEVEL: f64 = 0.005;
const BACK_SLOT_EVASION_PER_LEVEL: f64 = 0.003;

/// XP needed to go from `level` to `level + 1`.
pub fn xp_to_next_level(level: u32) -> i64 {
    let l = i64::from(level.max(1)) - 1;
    100 + 25 * l + 10 * l * l
}

/// Qualitative effect flags a special move can carry; each set flag contributes
/// a fixed utility amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialEffects {
    pub damage: i64,
    pub heal: i64,
    pub shield: i64,
    pub revive: bool,
    pub cleanse: bool,
    pub buff: bool,
}

impl SpecialEffects {
    fn flag_count(&self) -> u32 {
        u32::from(self.revive) + u32::from(self.cleanse) + u32::from(self.buff)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActorMetrics {
    pub damage: f64,
    pub heal: f64,
    pub mitigation: f64,
    pub utility: f64,
    pub actions: u32,
    pub low_impact_actions: u32,
    pub high_impact_actions: u32,
    /// Private action-XP ledger, paid out on top of the pool shares.
    pub action_xp: f64,
}

/// Accumulates battle performance. Created at battle start from a snapshot of
/// the enemy, consumed once by [award_battle_xp].
#[derive(Debug, Clone)]
pub struct BattleXpTracker {
    metrics: Vec<ActorMetrics>,
    enemy_level: u32,
    enemy_attack: i64,
    enemy_max_hp: i64,
    enemy_phases: u32,
    incoming_damage: f64,
    absorbed_shield: f64,
    low_hp_moments: u32,
    ally_down_moments: u32,
    input_hold: bool,
    action_xp_mult: f64,
    stall_units: f64,
    stall_chain: u32,
    last_pattern: Option<String>,
}

impl BattleXpTracker {
    pub fn new(party_size: usize, enemy: &Combatant) -> Self {
        Self {
            metrics: vec![ActorMetrics::default(); party_size],
            enemy_level: enemy.level.max(1),
            enemy_attack: enemy.atk.max(1),
            enemy_max_hp: enemy.max_hp.max(1),
            enemy_phases: 0,
            incoming_damage: 0.0,
            absorbed_shield: 0.0,
            low_hp_moments: 0,
            ally_down_moments: 0,
            input_hold: false,
            action_xp_mult: 1.0,
            stall_units: 0.0,
            stall_chain: 0,
            last_pattern: None,
        }
    }

    pub fn metrics(&self) -> &[ActorMetrics] {
        &self.metrics
    }

    /// Soft anti-spam: while set, ledger accrual is halved.
    pub fn set_input_hold(&mut self, held: bool) {
        self.input_hold = held;
    }

    pub fn set_action_xp_mult(&mut self, mult: f64) {
        self.action_xp_mult = if mult.is_finite() && mult > 0.0 { mult } else { 1.0 };
    }

    pub fn record_attack(&mut self, actor: usize, damage: i64) {
        let damage = damage.max(0);
        let mut value = damage as f64 * ATTACK_XP_RATE;
        if damage >= ATTACK_BIG_HIT_THRESHOLD {
            value += ATTACK_BIG_HIT_BONUS;
        }
        let pattern = if damage == 0 {
            format!("attack_zero:{actor}")
        } else {
            format!("attack:{actor}")
        };
        if let Some(m) = self.metrics.get_mut(actor) {
            m.damage += damage as f64;
        }
        self.accrue(actor, value, &pattern);
    }

    pub fn record_defend(&mut self, actor: usize, absorbed: i64) {
        let absorbed = absorbed.max(0);
        let value = DEFEND_BASE_XP + absorbed as f64 * DEFEND_ABSORB_RATE;
        if let Some(m) = self.metrics.get_mut(actor) {
            m.mitigation += absorbed as f64;
        }
        self.accrue(actor, value, &format!("defend:{actor}"));
    }

    pub fn record_item(&mut self, actor: usize, item_id: &str, heal: i64, team_heal: bool) {
        let heal = heal.max(0);
        let mut value = heal as f64 * ITEM_HEAL_RATE;
        if team_heal {
            value += TEAM_HEAL_BONUS;
        }
        if let Some(m) = self.metrics.get_mut(actor) {
            m.heal += heal as f64;
        }
        self.accrue(actor, value, &format!("item:{actor}:{item_id}"));
    }

    /// Specials blend damage, heal, shield, and qualitative effect flags, then
    /// scale by the actor's utility power.
    pub fn record_special(
        &mut self,
        actor: usize,
        special_id: &str,
        effects: SpecialEffects,
        utility_power: f64,
    ) {
        let power = if utility_power.is_finite() && utility_power > 0.0 {
            utility_power
        } else {
            1.0
        };
        let flag_utility = f64::from(effects.flag_count()) * UTILITY_PER_FLAG;
        let composite = (effects.damage.max(0) as f64 * ATTACK_XP_RATE
            + effects.heal.max(0) as f64 * ITEM_HEAL_RATE
            + effects.shield.max(0) as f64 * SPECIAL_SHIELD_RATE
            + flag_utility)
            * power;
        if let Some(m) = self.metrics.get_mut(actor) {
            m.damage += effects.damage.max(0) as f64;
            m.heal += effects.heal.max(0) as f64;
            m.utility += flag_utility * power;
        }
        self.accrue(actor, composite, &format!("special:{actor}:{special_id}"));
    }

    /// A party member got hit. Feeds the adversity/endurance bonuses and the
    /// target's mitigation bucket (shield and defend absorption count as
    /// mitigation performed by the target).
    pub fn record_enemy_hit(
        &mut self,
        target: usize,
        damage: i64,
        absorbed_shield: i64,
        target_downed: bool,
        target_low_hp: bool,
    ) {
        self.incoming_damage += damage.max(0) as f64;
        self.absorbed_shield += absorbed_shield.max(0) as f64;
        if let Some(m) = self.metrics.get_mut(target) {
            m.mitigation += absorbed_shield.max(0) as f64;
        }
        if target_downed {
            self.ally_down_moments += 1;
        } else if target_low_hp {
            self.low_hp_moments += 1;
        }
    }

    pub fn record_enemy_phase(&mut self) {
        self.enemy_phases += 1;
    }

    fn accrue(&mut self, actor: usize, value: f64, pattern: &str) {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let hold_factor = if self.input_hold { INPUT_HOLD_FACTOR } else { 1.0 };

        if value < LOW_IMPACT_THRESHOLD {
            if self.last_pattern.as_deref() == Some(pattern) {
                self.stall_chain += 1;
                self.stall_units += STALL_UNIT * f64::from(self.stall_chain);
            } else {
                self.stall_chain = 1;
            }
            self.last_pattern = Some(pattern.to_string());
        } else if value >= HIGH_IMPACT_THRESHOLD {
            self.stall_chain = 0;
            self.last_pattern = None;
            self.stall_units = (self.stall_units - STALL_RELIEF).max(0.0);
        } else {
            self.stall_chain = 0;
            self.last_pattern = None;
        }

        if let Some(m) = self.metrics.get_mut(actor) {
            m.actions += 1;
            if value < LOW_IMPACT_THRESHOLD {
                m.low_impact_actions += 1;
            } else if value >= HIGH_IMPACT_THRESHOLD {
                m.high_impact_actions += 1;
            }
            m.action_xp += value * self.action_xp_mult * hold_factor;
        }
    }

    /// Difficulty estimate for the tracked enemy.
    pub fn threat(&self) -> f64 {
        let base = self.enemy_max_hp as f64 / 5.0 + self.enemy_attack as f64 * 2.0;
        let level_scale = 1.0 + 0.1 * f64::from(self.enemy_level - 1);
        (base * level_scale).max(1.0)
    }

    /// Enemy-phase count a battle against this threat is expected to take.
    pub fn expected_phases(&self) -> u32 {
        ((self.threat() / 40.0).round() as i64).clamp(3, 12) as u32
    }

    fn pacing_multiplier(&self) -> f64 {
        let expected = f64::from(self.expected_phases());
        let actual = f64::from(self.enemy_phases.max(1));
        (expected / actual).clamp(PACING_MIN, PACING_MAX)
    }

    /// Bonus for hardship survived; only ever adds, band-clamped.
    fn adversity_bonus(&self, party_max_hp_total: i64) -> f64 {
        let hp_total = party_max_hp_total.max(1) as f64;
        let soaked = self.incoming_damage + self.absorbed_shield;
        let absorbed = (soaked / hp_total * 0.10).max(0.0);
        let moments = f64::from(self.low_hp_moments) * 0.02
            + f64::from(self.ally_down_moments) * 0.05;
        let overtime = if self.enemy_phases > self.expected_phases() {
            f64::from(self.enemy_phases - self.expected_phases()) * 0.01
        } else {
            0.0
        };
        (absorbed + moments + overtime).clamp(0.0, ADVERSITY_CAP)
    }

    fn stall_penalty(&self) -> f64 {
        let low: u32 = self.metrics.iter().map(|m| m.low_impact_actions).sum();
        let high: u32 = self.metrics.iter().map(|m| m.high_impact_actions).sum();
        let ratio_penalty = if low > 0 {
            (f64::from(low) / f64::from(high + 1)) * 0.02
        } else {
            0.0
        };
        (self.stall_units + ratio_penalty).clamp(0.0, STALL_PENALTY_CAP)
    }
}

/// Stat snapshot carried on each award so a presentation layer can render
/// level-up deltas without recomputing anything.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSnapshot {
    pub hp: i64,
    pub max_hp: i64,
    pub atk: i64,
    pub def: i64,
    pub level: u32,
    pub xp: i64,
    pub crit_chance: f64,
    pub evasion: f64,
    pub crit_damage_bonus: f64,
}

impl ActorSnapshot {
    fn of(c: &Combatant) -> Self {
        Self {
            hp: c.hp,
            max_hp: c.max_hp,
            atk: c.atk,
            def: c.def,
            level: c.level,
            xp: c.xp,
            crit_chance: c.crit_chance,
            evasion: c.evasion,
            crit_damage_bonus: c.crit_damage_bonus,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorAward {
    pub actor_index: usize,
    pub base_share: i64,
    pub contribution_share: i64,
    pub action_xp: i64,
    /// Combined award after the downed penalty, the XP actually granted.
    pub xp_gained: i64,
    pub downed: bool,
    pub levels_gained: u32,
    pub before: ActorSnapshot,
    pub after: ActorSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBreakdown {
    pub threat: f64,
    pub pacing: f64,
    pub adversity: f64,
    pub stall_penalty: f64,
    pub survival: f64,
    pub base_pool: i64,
    pub contribution_pool: i64,
    pub action_xp_budget: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardResult {
    pub pool: i64,
    pub awards: Vec<ActorAward>,
    pub breakdown: AwardBreakdown,
}

/// Consume the tracker and award XP to the party, applying level-ups in place.
pub fn award_battle_xp(tracker: BattleXpTracker, party: &mut [Combatant]) -> AwardResult {
    let party_max_hp: i64 = party.iter().map(|c| c.max_hp).sum();

    let threat = tracker.threat();
    let pacing = tracker.pacing_multiplier();
    let adversity = tracker.adversity_bonus(party_max_hp);
    let stall_penalty = tracker.stall_penalty();
    let survival = (1.0 + adversity - stall_penalty).clamp(SURVIVAL_MIN, SURVIVAL_MAX);

    let distributable = ((threat * pacing * survival).round() as i64).max(1);
    let action_budget: i64 = tracker
        .metrics
        .iter()
        .map(|m| m.action_xp.round() as i64)
        .sum();

    let base_pool = ((distributable as f64) * BASE_SHARE_FRACTION).round() as i64;
    let contribution_pool = ((distributable as f64) * CONTRIBUTION_SHARE_FRACTION).round() as i64;

    let living: Vec<usize> = party
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(i, _)| i)
        .collect();
    let living_count = living.len().max(1) as f64;
    let equal_share = base_pool as f64 / living_count;
    let floor_share = (equal_share * BASE_SHARE_FLOOR).floor() as i64;

    let scores = contribution_scores(&tracker, party.len());

    let slot_count = party.len();
    let mut awards = Vec::with_capacity(slot_count);

    for (index, member) in party.iter_mut().enumerate() {
        let before = ActorSnapshot::of(member);
        let downed = !member.is_alive();

        let base_share = if downed {
            floor_share
        } else {
            (equal_share.round() as i64).max(floor_share)
        };
        let contribution_share =
            ((contribution_pool as f64) * scores[index]).round() as i64;
        let action_xp = tracker
            .metrics
            .get(index)
            .map(|m| m.action_xp.round() as i64)
            .unwrap_or(0);

        let full = (base_share + contribution_share + action_xp).max(0);
        let xp_gained = if downed {
            ((full as f64) * DOWNED_XP_MULT).floor() as i64
        } else {
            full
        };

        let levels_gained = grant_xp(member, xp_gained, index, slot_count);
        let after = ActorSnapshot::of(member);

        awards.push(ActorAward {
            actor_index: index,
            base_share,
            contribution_share,
            action_xp,
            xp_gained,
            downed,
            levels_gained,
            before,
            after,
        });
    }

    AwardResult {
        pool: distributable + action_budget,
        awards,
        breakdown: AwardBreakdown {
            threat,
            pacing,
            adversity,
            stall_penalty,
            survival,
            base_pool,
            contribution_pool,
            action_xp_budget: action_budget,
        },
    }
}

/// Normalized per-actor contribution shares (sum to 1). With no recorded
/// contribution at all, the pool splits equally.
fn contribution_scores(tracker: &BattleXpTracker, party_size: usize) -> Vec<f64> {
    let total_damage: f64 = tracker.metrics.iter().map(|m| m.damage).sum();
    let total_heal: f64 = tracker.metrics.iter().map(|m| m.heal).sum();
    let total_mitigation: f64 = tracker.metrics.iter().map(|m| m.mitigation).sum();
    let total_utility: f64 = tracker.metrics.iter().map(|m| m.utility).sum();

    let norm = |value: f64, total: f64| if total > 0.0 { value / total } else { 0.0 };

    let mut scores: Vec<f64> = (0..party_size)
        .map(|i| {
            let m = match tracker.metrics.get(i) {
                Some(m) => m,
                None => return 0.0,
            };
            WEIGHT_DAMAGE * norm(m.damage, total_damage)
                + WEIGHT_HEAL * norm(m.heal, total_heal)
                + WEIGHT_MITIGATION * norm(m.mitigation, total_mitigation)
                + WEIGHT_UTILITY * norm(m.utility, total_utility)
        })
        .collect();

    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in &mut scores {
            *s /= sum;
        }
    } else if party_size > 0 {
        let equal = 1.0 / party_size as f64;
        for s in &mut scores {
            *s = equal;
        }
    }
    scores
}

/// Add XP and apply level-ups. Downed actors stay at 0 HP through level-ups;
/// living actors top up to the new max.
fn grant_xp(member: &mut Combatant, amount: i64, slot: usize, slot_count: usize) -> u32 {
    member.xp += amount.max(0);
    let was_alive = member.is_alive();
    let mut levels = 0u32;

    while levels < LEVEL_LOOP_GUARD {
        let needed = xp_to_next_level(member.level);
        if member.xp < needed {
            break;
        }
        member.xp -= needed;
        member.level += 1;
        levels += 1;

        member.max_hp = ((member.max_hp as f64) * HP_GROWTH).round() as i64;
        let grown_atk = ((member.atk as f64) * ATK_GROWTH).round() as i64;
        member.atk = grown_atk.max(member.atk + 1);
        let grown_def = ((member.def as f64) * DEF_GROWTH).round() as i64;
        member.def = grown_def.max(member.def + 1);

        if slot == 0 {
            member.crit_chance =
                (member.crit_chance + FRONT_SLOT_CRIT_PER_LEVEL).min(CRIT_CHANCE_CAP);
            member.crit_damage_bonus += FRONT_SLOT_CRIT_DAMAGE_PER_LEVEL;
        }
        if slot_count > 1 && slot == slot_count - 1 {
            member.evasion = (member.evasion + BACK_SLOT_EVASION_PER_LEVEL).min(EVASION_CAP);
        }
    }

    if levels > 0 {
        member.hp = if was_alive { member.max_hp } else { 0 };
    }
    member.clamp_vitals();
    levels
}
