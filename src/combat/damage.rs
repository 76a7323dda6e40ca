//! Damage resolution for both attack directions. Player→enemy and enemy→player are
//! symmetric in shape but deliberately not identical: the player side carries the
//! one-shot vulnerability consume, the enemy side carries defend/daze/damage
//! reduction/shield layering and a hard minimum-damage floor.

use crate::combat::combatant::Combatant;
use crate::combat::modifiers::{
    effective_attack, effective_crit_chance, effective_crit_damage_bonus,
    effective_damage_reduction, effective_defense,
};
use crate::combat::rng::Rng;

pub const PLAYER_ATK_MULT: f64 = 2.2;
pub const ENEMY_ATK_MULT: f64 = 1.2;
pub const CRIT_BASE_MULT: f64 = 1.5;
/// High defense reduces but never fully negates enemy damage.
pub const ENEMY_MIN_DAMAGE_FRACTION: f64 = 0.15;
/// Damage scale applied to non-missed hits from a dazed attacker.
pub const DAZED_DAMAGE_MULT: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAttackOutcome {
    pub damage: i64,
    pub is_crit: bool,
    pub killed: bool,
    pub new_hp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyAttackOutcome {
    /// HP actually lost. Shield absorption is reported separately.
    pub damage: i64,
    pub absorbed_shield: i64,
    pub is_crit: bool,
    pub killed: bool,
    pub new_hp: i64,
}

/// Player → enemy basic attack. Mutates the enemy's hp and consumes its one-shot
/// vulnerability marker if armed (single consumption, kill or not).
pub fn resolve_player_attack(attacker: &Combatant, enemy: &mut Combatant, rng: &mut Rng) -> PlayerAttackOutcome {
    let mut attack_power = (effective_attack(attacker) as f64 * PLAYER_ATK_MULT).round() as i64;

    let mut is_crit = false;
    if rng.chance(effective_crit_chance(attacker)) {
        let crit_mult = CRIT_BASE_MULT + effective_crit_damage_bonus(attacker);
        attack_power = (attack_power as f64 * crit_mult).round() as i64;
        is_crit = true;
    }

    let mut damage = (attack_power - effective_defense(enemy)).max(1);

    if let Some(vuln) = enemy.statuses.next_hit_vuln.take() {
        damage = (damage as f64 * (1.0 + vuln.pct)).round().max(0.0) as i64;
    }

    let before = enemy.hp;
    let after = (before - damage).clamp(0, enemy.max_hp.max(before));
    enemy.hp = after;

    PlayerAttackOutcome {
        damage,
        is_crit,
        killed: after <= 0,
        new_hp: after,
    }
}

/// Enemy → player attack. Layer order: defense subtraction, defend multiplier,
/// crit, minimum-damage floor, daze penalty, damage reduction, shield absorption.
/// Mutates the target's hp and shield.
pub fn resolve_enemy_attack(enemy: &Combatant, target: &mut Combatant, rng: &mut Rng) -> EnemyAttackOutcome {
    let enemy_atk = (effective_attack(enemy) as f64 * ENEMY_ATK_MULT).round() as i64;
    let target_def = effective_defense(target);

    let mut base_damage = enemy_atk - target_def;

    // Defend applies before the crit roll so a crit cannot bypass the guard.
    if target.is_defending {
        base_damage = (base_damage as f64 * target.effective_defend_mult()).floor() as i64;
    }

    let mut is_crit = false;
    if rng.chance(effective_crit_chance(enemy)) {
        base_damage = (base_damage as f64 * CRIT_BASE_MULT).round() as i64;
        is_crit = true;
    }

    let floor = (enemy_atk as f64 * ENEMY_MIN_DAMAGE_FRACTION).ceil() as i64;
    let mut damage = base_damage.max(floor).max(1);

    if enemy.statuses.is_dazed() {
        damage = (damage as f64 * DAZED_DAMAGE_MULT).round().max(1.0) as i64;
    }

    let reduction = effective_damage_reduction(target);
    if reduction > 0.0 {
        damage = (damage as f64 * (1.0 - reduction)).round().max(1.0) as i64;
    }

    // Shield absorbs up to its remaining value; only the spill reaches HP.
    let shield = target.temp_shield.max(0);
    let absorbed_shield = shield.min(damage);
    target.temp_shield = shield - absorbed_shield;
    let to_hp = damage - absorbed_shield;

    let before = target.hp;
    let after = (before - to_hp).clamp(0, target.max_hp.max(before));
    target.hp = after;

    EnemyAttackOutcome {
        damage: before - after,
        absorbed_shield,
        is_crit,
        killed: after <= 0,
        new_hp: after,
    }
}

/// Clamped raw damage for out-of-combat effects (items, hazards). No shield or
/// reduction layers. Returns the HP actually lost.
pub fn apply_damage(target: &mut Combatant, amount: i64) -> i64 {
    let before = target.hp;
    let after = (before - amount.max(0)).clamp(0, target.max_hp.max(before));
    target.hp = after;
    before - after
}

/// Clamped healing. Returns the HP actually restored.
pub fn apply_heal(target: &mut Combatant, amount: i64) -> i64 {
    let before = target.hp;
    let after = (before + amount.max(0)).clamp(0, target.max_hp.max(before));
    target.hp = after;
    after - before
}
