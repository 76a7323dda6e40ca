pub mod combatant;
pub mod damage;
pub mod enemy_turn;
pub mod events;
pub mod export_csv;
pub mod modifiers;
pub mod rng;
pub mod status;
pub mod tick;
pub mod xp;

pub use combatant::{alive_indices, Combatant, CRIT_CHANCE_CAP, EVASION_CAP};
pub use damage::{
    apply_damage, apply_heal, resolve_enemy_attack, resolve_player_attack, EnemyAttackOutcome,
    PlayerAttackOutcome, CRIT_BASE_MULT, ENEMY_ATK_MULT, PLAYER_ATK_MULT,
};
pub use enemy_turn::{plan_enemy_turn, EnemyTurnOptions, EnemyTurnPlan, MAX_ACTIONS_PER_TURN};
pub use events::{serialize_events_json, BattleEvent, Side, StatusKey};
pub use export_csv::export_events_csv;
pub use modifiers::{
    effective_attack, effective_crit_chance, effective_crit_damage_bonus,
    effective_damage_reduction, effective_defense,
};
pub use rng::Rng;
pub use status::{
    ActionLimit, ConfusionState, ModifierKind, NextHitVuln, StatusSet, TimedModifier,
};
pub use tick::{tick_actor_statuses, tick_enemy_statuses};
pub use xp::{
    award_battle_xp, xp_to_next_level, ActorAward, ActorMetrics, AwardBreakdown, AwardResult,
    BattleXpTracker, SpecialEffects, DOWNED_XP_MULT,
};
