//! Tagged battle events, the sole channel to the narration layer. The core never
//! formats display strings; it emits these records and the presentation layer
//! templates them. Tag and field names match the narration vocabulary
//! (`enemyAttackHit`, `absorbedShield`, ...), so the serialized form is stable.

use serde::{Deserialize, Serialize};

use crate::combat::status::ModifierKind;

/// Which roster a status event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Party,
    Enemy,
}

/// Status key vocabulary for expiry events: the timed modifier kinds plus the
/// enemy-only countdown statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKey {
    Modifier(ModifierKind),
    Stun,
    Dazed,
    ActionLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleEvent {
    /// The whole enemy turn fizzles to comedy. No damage, no state change.
    #[serde(rename_all = "camelCase")]
    TurnDisruptedFunny {},
    #[serde(rename_all = "camelCase")]
    EnemyStunnedSkip {},
    /// Move kind the resolver does not understand; harmless no-op action.
    #[serde(rename_all = "camelCase")]
    EnemyMoveUnknown { move_id: String },
    /// Dazed whiff: the action is spent with no effect.
    #[serde(rename_all = "camelCase")]
    EnemyMissDazed { move_id: String },
    /// Confusion branch: the action misfires entirely.
    #[serde(rename_all = "camelCase")]
    EnemyConfusedMisfire { move_id: String },
    /// Confusion branch: the enemy heals itself instead of attacking.
    #[serde(rename_all = "camelCase")]
    EnemyConfusedSelfHeal { healed: i64, new_hp: i64 },
    /// Confusion low-accuracy mode rolled a miss.
    #[serde(rename_all = "camelCase")]
    EnemyConfusedWildMiss { move_id: String },
    /// Confusion low-accuracy mode let the hit through; the hit itself follows as
    /// its own `enemyAttackHit` event.
    #[serde(rename_all = "camelCase")]
    EnemyConfusedLowAccuracyHit {},
    #[serde(rename_all = "camelCase")]
    EnemyConfusionCleared {},
    /// One resolved enemy hit. Carries everything a deferred caller needs to apply
    /// it: target index, resulting hp/shield, and whether to consume the defend flag.
    #[serde(rename_all = "camelCase")]
    EnemyAttackHit {
        move_id: String,
        target_index: usize,
        damage: i64,
        absorbed_shield: i64,
        is_crit: bool,
        /// Target was downed by this hit.
        is_mortal: bool,
        /// Target was defending when the hit landed.
        guarded: bool,
        new_hp: i64,
        new_shield: i64,
        /// Caller must clear the target's defend flag when applying this hit.
        consume_defend: bool,
    },
    #[serde(rename_all = "camelCase")]
    StatusExpired {
        side: Side,
        /// Index into the party for `side == Party`; 0 for the enemy.
        actor_index: usize,
        status: StatusKey,
    },
}

impl BattleEvent {
    pub fn is_attack_hit(&self) -> bool {
        matches!(self, BattleEvent::EnemyAttackHit { .. })
    }
}

/// Serialize an event list to pretty JSON for tooling and trace inspection.
pub fn serialize_events_json(events: &[BattleEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_narration_tags() {
        let events = vec![
            BattleEvent::EnemyStunnedSkip {},
            BattleEvent::EnemyAttackHit {
                move_id: "basic_attack".to_string(),
                target_index: 2,
                damage: 14,
                absorbed_shield: 6,
                is_crit: true,
                is_mortal: false,
                guarded: false,
                new_hp: 30,
                new_shield: 0,
                consume_defend: false,
            },
        ];
        let json = serialize_events_json(&events).unwrap();
        assert!(json.contains("\"type\": \"enemyStunnedSkip\""));
        assert!(json.contains("\"type\": \"enemyAttackHit\""));
        assert!(json.contains("\"absorbedShield\": 6"));
        assert!(json.contains("\"targetIndex\": 2"));
    }

    #[test]
    fn status_expired_names_side_and_key() {
        let event = BattleEvent::StatusExpired {
            side: Side::Enemy,
            actor_index: 0,
            status: StatusKey::Stun,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"statusExpired\""));
        assert!(json.contains("\"enemy\""));
        assert!(json.contains("\"stun\""));
    }
}
