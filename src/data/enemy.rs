//! Enemy content records: normalized stats, move pools, and actions-per-turn
//! specs. Loaded from data/enemies.json when present, with a built-in roster
//! fallback so the simulator always has something to fight.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::combat::Combatant;

pub const DEFAULT_ENEMIES_PATH: &str = "data/enemies.json";

/// Actions an enemy takes per turn: a fixed count or a per-turn uniform sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionsPerTurn {
    Fixed(u32),
    Range { min: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub max_hp: i64,
    pub attack: i64,
    pub defense: i64,
    #[serde(default = "default_crit_chance")]
    pub crit_chance: f64,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions_per_turn: Option<ActionsPerTurn>,
}

fn default_level() -> u32 {
    1
}

fn default_crit_chance() -> f64 {
    0.05
}

impl EnemyRecord {
    /// Battle-time combatant from this record. Stats degrade to safe minimums.
    pub fn to_combatant(&self) -> Combatant {
        let mut combatant = Combatant::new(
            self.id.clone(),
            self.name.clone(),
            self.max_hp,
            self.attack,
            self.defense,
        );
        combatant.level = self.level.max(1);
        combatant.crit_chance = if self.crit_chance.is_finite() {
            self.crit_chance.clamp(0.0, 0.95)
        } else {
            0.05
        };
        combatant
    }
}

/// Built-in roster used when no data file is present.
pub fn builtin_roster() -> Vec<EnemyRecord> {
    vec![
        EnemyRecord {
            id: "disney_adult".to_string(),
            name: "Disney Adult".to_string(),
            level: 1,
            max_hp: 250,
            attack: 20,
            defense: 8,
            crit_chance: 0.05,
            moves: vec!["basic_attack".to_string(), "wild_swing".to_string()],
            actions_per_turn: Some(ActionsPerTurn::Fixed(1)),
        },
        EnemyRecord {
            id: "old_head".to_string(),
            name: "Old Head Snob".to_string(),
            level: 2,
            max_hp: 250,
            attack: 22,
            defense: 15,
            crit_chance: 0.05,
            moves: vec!["basic_attack".to_string(), "heavy_attack".to_string()],
            actions_per_turn: Some(ActionsPerTurn::Range { min: 1, max: 2 }),
        },
        EnemyRecord {
            id: "brain_rot".to_string(),
            name: "Brain Rot".to_string(),
            level: 3,
            max_hp: 250,
            attack: 26,
            defense: 12,
            crit_chance: 0.08,
            moves: vec![
                "basic_attack".to_string(),
                "wild_swing".to_string(),
                "hot_take".to_string(),
            ],
            actions_per_turn: Some(ActionsPerTurn::Range { min: 1, max: 3 }),
        },
        EnemyRecord {
            id: "critic".to_string(),
            name: "Film 'Critic'".to_string(),
            level: 4,
            max_hp: 350,
            attack: 24,
            defense: 18,
            crit_chance: 0.1,
            moves: vec![
                "basic_attack".to_string(),
                "heavy_attack".to_string(),
                "hot_take".to_string(),
            ],
            actions_per_turn: Some(ActionsPerTurn::Fixed(2)),
        },
        EnemyRecord {
            id: "film_bro".to_string(),
            name: "Film Bro".to_string(),
            level: 5,
            max_hp: 220,
            attack: 28,
            defense: 18,
            crit_chance: 0.12,
            moves: vec!["heavy_attack".to_string(), "hot_take".to_string()],
            actions_per_turn: Some(ActionsPerTurn::Range { min: 2, max: 3 }),
        },
    ]
}

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Load the enemy roster from a JSON file. Returns None if the file is missing
/// or invalid; callers fall back to [builtin_roster].
pub fn load_roster(path: &str) -> Option<Vec<EnemyRecord>> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Load the roster from the default path, or the built-in set when absent.
pub fn roster_or_builtin(path: &str) -> Vec<EnemyRecord> {
    load_roster(path).unwrap_or_else(builtin_roster)
}

/// Resolve an enemy by id or display name against a roster.
pub fn resolve_enemy<'a>(roster: &'a [EnemyRecord], name_or_id: &str) -> Option<&'a EnemyRecord> {
    let normalized = normalize_lookup(name_or_id);
    if let Some(record) = roster.iter().find(|e| normalize_lookup(&e.id) == normalized) {
        return Some(record);
    }
    roster.iter().find(|e| normalize_lookup(&e.name) == normalized)
}
