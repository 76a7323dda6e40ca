//! Battle-time actor state. One `Combatant` type serves both party members and
//! enemies; enemy-only behavior (move pools, actions per turn) stays on the data
//! records so this struct holds nothing but mutable battle state.
//!
//! Combatants are built once per battle, mutated in place through it (mutation is
//! the commit point), and discarded at battle end.

use serde::{Deserialize, Serialize};

use crate::combat::status::StatusSet;

pub const CRIT_CHANCE_CAP: f64 = 0.95;
pub const EVASION_CAP: f64 = 0.6;
pub const DEFEND_MULT_MIN: f64 = 0.2;
pub const DEFEND_MULT_MAX: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub atk: i64,
    pub def: i64,
    /// Chance in [0, 0.95] that an outgoing hit crits.
    pub crit_chance: f64,
    /// Chance in [0, 0.6] to avoid an incoming hit. Tracked as a stat invariant;
    /// resolution hooks live with the caller's hit tables.
    pub evasion: f64,
    /// Added on top of the 1.5x crit base for this actor's own crits.
    pub crit_damage_bonus: f64,
    /// Incoming damage multiplier while defending, clamped to [0.2, 0.9] at use.
    pub defend_damage_mult: f64,
    pub heal_power: f64,
    pub utility_power: f64,
    /// Damage buffer consumed before HP. Not time-limited.
    pub temp_shield: i64,
    pub is_defending: bool,
    pub level: u32,
    pub xp: i64,
    #[serde(default)]
    pub statuses: StatusSet,
}

impl Combatant {
    /// Build a combatant with safe defaults for the tunables. Missing or nonsense
    /// base stats degrade to minimums instead of erroring.
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hp: i64, atk: i64, def: i64) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id: id.into(),
            name: name.into(),
            hp: max_hp,
            max_hp,
            atk: atk.max(1),
            def: def.max(0),
            crit_chance: 0.05,
            evasion: 0.02,
            crit_damage_bonus: 0.0,
            defend_damage_mult: 0.5,
            heal_power: 1.0,
            utility_power: 1.0,
            temp_shield: 0,
            is_defending: false,
            level: 1,
            xp: 0,
            statuses: StatusSet::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Re-assert the stat invariants after any external mutation:
    /// `0 <= hp <= max_hp`, crit chance and evasion inside their caps, shield >= 0.
    pub fn clamp_vitals(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.temp_shield = self.temp_shield.max(0);
        self.crit_chance = sane_fraction(self.crit_chance, CRIT_CHANCE_CAP);
        self.evasion = sane_fraction(self.evasion, EVASION_CAP);
        if !self.crit_damage_bonus.is_finite() || self.crit_damage_bonus < 0.0 {
            self.crit_damage_bonus = 0.0;
        }
    }

    /// Defend multiplier clamped to its legal band; out-of-band configs degrade to
    /// the nearest bound rather than erroring.
    pub fn effective_defend_mult(&self) -> f64 {
        if !self.defend_damage_mult.is_finite() {
            return DEFEND_MULT_MAX;
        }
        self.defend_damage_mult.clamp(DEFEND_MULT_MIN, DEFEND_MULT_MAX)
    }
}

fn sane_fraction(value: f64, cap: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, cap)
}

/// Indices of living party members, in party order.
pub fn alive_indices(party: &[Combatant]) -> Vec<usize> {
    party
        .iter()
        .enumerate()
        .filter(|(_, member)| member.is_alive())
        .map(|(index, _)| index)
        .collect()
}
