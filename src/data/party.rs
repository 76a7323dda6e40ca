//! Party member content records. A party slot is a movie with battle stats plus
//! per-actor tunables used by the damage resolver and the XP allocator.
//! Loaded from data/party.json when present; the built-in lineup covers the
//! default archetype.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::Combatant;

pub const DEFAULT_PARTY_PATH: &str = "data/party.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMemberRecord {
    pub id: String,
    pub name: String,
    pub max_hp: i64,
    pub atk: i64,
    pub def: i64,
    #[serde(default = "default_crit_chance")]
    pub crit_chance: f64,
    #[serde(default = "default_evasion")]
    pub evasion: f64,
    #[serde(default)]
    pub crit_damage_bonus: f64,
    #[serde(default = "default_defend_mult")]
    pub defend_damage_mult: f64,
    #[serde(default = "default_power")]
    pub heal_power: f64,
    #[serde(default = "default_power")]
    pub utility_power: f64,
}

fn default_crit_chance() -> f64 {
    0.05
}

fn default_evasion() -> f64 {
    0.02
}

fn default_defend_mult() -> f64 {
    0.5
}

fn default_power() -> f64 {
    1.0
}

impl PartyMemberRecord {
    pub fn to_combatant(&self) -> Combatant {
        let mut combatant = Combatant::new(
            self.id.clone(),
            self.name.clone(),
            self.max_hp,
            self.atk,
            self.def,
        );
        combatant.crit_chance = self.crit_chance;
        combatant.evasion = self.evasion;
        combatant.crit_damage_bonus = self.crit_damage_bonus;
        combatant.defend_damage_mult = self.defend_damage_mult;
        combatant.heal_power = sane_power(self.heal_power);
        combatant.utility_power = sane_power(self.utility_power);
        combatant.clamp_vitals();
        combatant
    }
}

fn sane_power(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Default four-slot lineup (the "Film Bro" archetype's spread: bruiser,
/// crit-fisher, tank, support).
pub fn builtin_party() -> Vec<PartyMemberRecord> {
    vec![
        PartyMemberRecord {
            id: "fight_club".to_string(),
            name: "Fight Club".to_string(),
            max_hp: 118,
            atk: 18,
            def: 10,
            crit_chance: 0.09,
            evasion: 0.03,
            crit_damage_bonus: 0.1,
            defend_damage_mult: 0.5,
            heal_power: 1.0,
            utility_power: 1.0,
        },
        PartyMemberRecord {
            id: "taxi_driver".to_string(),
            name: "Taxi Driver".to_string(),
            max_hp: 104,
            atk: 16,
            def: 9,
            crit_chance: 0.12,
            evasion: 0.04,
            crit_damage_bonus: 0.2,
            defend_damage_mult: 0.55,
            heal_power: 1.0,
            utility_power: 1.1,
        },
        PartyMemberRecord {
            id: "goodfellas".to_string(),
            name: "Goodfellas".to_string(),
            max_hp: 132,
            atk: 13,
            def: 15,
            crit_chance: 0.06,
            evasion: 0.02,
            crit_damage_bonus: 0.0,
            defend_damage_mult: 0.4,
            heal_power: 1.05,
            utility_power: 1.0,
        },
        PartyMemberRecord {
            id: "inception".to_string(),
            name: "Inception".to_string(),
            max_hp: 110,
            atk: 14,
            def: 11,
            crit_chance: 0.07,
            evasion: 0.05,
            crit_damage_bonus: 0.05,
            defend_damage_mult: 0.5,
            heal_power: 1.2,
            utility_power: 1.25,
        },
    ]
}

/// Load a party lineup from JSON, or the built-in lineup when missing/invalid.
pub fn party_or_builtin(path: &str) -> Vec<PartyMemberRecord> {
    let Some(raw) = fs::read_to_string(path).ok() else {
        return builtin_party();
    };
    serde_json::from_str(&raw).unwrap_or_else(|_| builtin_party())
}

/// Build battle combatants for a lineup.
pub fn build_party(records: &[PartyMemberRecord]) -> Vec<Combatant> {
    records.iter().map(PartyMemberRecord::to_combatant).collect()
}
