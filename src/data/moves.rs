//! Enemy move registry: small data-driven definitions shared across enemies.
//! Built-in moves cover the core roster; a JSON file can extend or override them.
//! Unknown ids and empty pools degrade to the fallback basic attack.

use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MOVES_PATH: &str = "data/moves.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: String,
    pub name: String,
    /// "attack" resolves damage; anything else is reserved and resolves to a
    /// harmless `enemyMoveUnknown` event.
    pub kind: String,
    #[serde(default = "default_power_multiplier")]
    pub power_multiplier: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_power_multiplier() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

impl MoveRecord {
    pub fn is_attack(&self) -> bool {
        self.kind == "attack"
    }

    /// Default move used when an enemy's pool is empty or resolves to nothing.
    pub fn fallback_attack() -> Self {
        Self {
            id: "basic_attack".to_string(),
            name: "Attack".to_string(),
            kind: "attack".to_string(),
            power_multiplier: 1.0,
            weight: 1.0,
        }
    }

    /// Sanitized power multiplier: non-finite or non-positive values read as 1.
    pub fn sane_power_multiplier(&self) -> f64 {
        if self.power_multiplier.is_finite() && self.power_multiplier > 0.0 {
            self.power_multiplier
        } else {
            1.0
        }
    }

    /// Sanitized selection weight: non-finite or non-positive values read as 1.
    pub fn sane_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveRegistry {
    moves: HashMap<String, MoveRecord>,
}

impl MoveRegistry {
    /// Built-in move set shared by the default roster.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for record in [
            MoveRecord {
                id: "basic_attack".to_string(),
                name: "Attack".to_string(),
                kind: "attack".to_string(),
                power_multiplier: 1.0,
                weight: 70.0,
            },
            MoveRecord {
                id: "heavy_attack".to_string(),
                name: "Heavy Attack".to_string(),
                kind: "attack".to_string(),
                power_multiplier: 1.35,
                weight: 25.0,
            },
            MoveRecord {
                id: "wild_swing".to_string(),
                name: "Wild Swing".to_string(),
                kind: "attack".to_string(),
                power_multiplier: 0.85,
                weight: 35.0,
            },
            MoveRecord {
                id: "hot_take".to_string(),
                name: "Hot Take".to_string(),
                kind: "attack".to_string(),
                power_multiplier: 1.15,
                weight: 20.0,
            },
        ] {
            registry.moves.insert(record.id.clone(), record);
        }
        registry
    }

    /// Built-in registry merged with overrides from a JSON file. Missing or invalid
    /// files are ignored (the built-ins stand alone).
    pub fn load(path: &str) -> Self {
        let mut registry = Self::builtin();
        let Some(raw) = fs::read_to_string(path).ok() else {
            return registry;
        };
        let Ok(overrides) = serde_json::from_str::<Vec<MoveRecord>>(&raw) else {
            return registry;
        };
        for record in overrides {
            if record.id.is_empty() {
                continue;
            }
            registry.moves.insert(record.id.clone(), record);
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&MoveRecord> {
        self.moves.get(id)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Resolve a pool of move ids to records, silently dropping unknown ids.
    /// An empty result is the caller's cue to use [MoveRecord::fallback_attack].
    pub fn resolve_pool(&self, ids: &[String]) -> Vec<MoveRecord> {
        ids.iter().filter_map(|id| self.moves.get(id).cloned()).collect()
    }
}
