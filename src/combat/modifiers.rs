//! Effective-stat projection: base stats through the active buff/debuff layers.
//! Read-only; effective values are recomputed at every use, never stored.

use crate::combat::combatant::{Combatant, CRIT_CHANCE_CAP};
use crate::combat::status::ModifierKind;

/// Stacked buffs can never push a multiplier past 6x total.
pub const BUFF_PCT_CAP: f64 = 5.0;
/// Stacked debuffs can reduce but never invert or zero a stat.
pub const DEBUFF_PCT_CAP: f64 = 0.95;
/// Damage reduction shares the debuff ceiling so damage always gets through.
pub const DAMAGE_REDUCTION_CAP: f64 = 0.95;

fn clamped_pct(actor: &Combatant, kind: ModifierKind, cap: f64) -> f64 {
    actor.statuses.active_pct(kind).min(cap)
}

/// Attack after buff and debuff layers: `base * (1 + buff) * (1 - debuff)`,
/// rounded, floored at 0.
pub fn effective_attack(actor: &Combatant) -> i64 {
    let base = actor.atk.max(0) as f64;
    let up = clamped_pct(actor, ModifierKind::AtkBuff, BUFF_PCT_CAP);
    let down = clamped_pct(actor, ModifierKind::AtkDebuff, DEBUFF_PCT_CAP);
    (base * (1.0 + up) * (1.0 - down)).round().max(0.0) as i64
}

/// Defense after buff and debuff layers, same shape as [effective_attack].
pub fn effective_defense(actor: &Combatant) -> i64 {
    let base = actor.def.max(0) as f64;
    let up = clamped_pct(actor, ModifierKind::DefBuff, BUFF_PCT_CAP);
    let down = clamped_pct(actor, ModifierKind::DefDebuff, DEBUFF_PCT_CAP);
    (base * (1.0 + up) * (1.0 - down)).round().max(0.0) as i64
}

/// Crit chance is additive and hard-capped at 0.95.
pub fn effective_crit_chance(actor: &Combatant) -> f64 {
    let base = if actor.crit_chance.is_finite() { actor.crit_chance.max(0.0) } else { 0.0 };
    let bonus = actor.statuses.active_pct(ModifierKind::CritChanceBuff);
    (base + bonus).clamp(0.0, CRIT_CHANCE_CAP)
}

/// Crit damage bonus is additive on top of the 1.5x base, floored at 0.
pub fn effective_crit_damage_bonus(actor: &Combatant) -> f64 {
    let base = if actor.crit_damage_bonus.is_finite() {
        actor.crit_damage_bonus.max(0.0)
    } else {
        0.0
    };
    base + actor.statuses.active_pct(ModifierKind::CritDamageBuff)
}

/// Active incoming-damage reduction for a target, capped below full immunity.
pub fn effective_damage_reduction(target: &Combatant) -> f64 {
    clamped_pct(target, ModifierKind::DamageReduction, DAMAGE_REDUCTION_CAP)
}
