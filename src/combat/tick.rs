//! Per-turn status duration ticking. Called once per relevant turn boundary by the
//! orchestration layer; emits one `statusExpired` event per key that expires on
//! this tick and nothing for already-expired keys.
//!
//! Shield is deliberately not time-limited (it persists until consumed), and
//! confusion is excluded here entirely: only the enemy turn planner's clear roll
//! ends it.

use crate::combat::combatant::Combatant;
use crate::combat::events::{BattleEvent, Side, StatusKey};
use crate::combat::status::ModifierKind;

/// Tick one party member's timed modifiers.
pub fn tick_actor_statuses(actor: &mut Combatant, actor_index: usize) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    tick_modifiers(actor, Side::Party, actor_index, &mut events);
    events
}

/// Tick the enemy's timed modifiers plus its countdown statuses (stun, dazed,
/// action limit). Countdown fields are deleted on expiry rather than zeroed.
pub fn tick_enemy_statuses(enemy: &mut Combatant) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    tick_modifiers(enemy, Side::Enemy, 0, &mut events);

    if let Some(turns) = enemy.statuses.stun_turns {
        let next = turns.saturating_sub(1);
        if next == 0 {
            enemy.statuses.stun_turns = None;
            events.push(expired(Side::Enemy, 0, StatusKey::Stun));
        } else {
            enemy.statuses.stun_turns = Some(next);
        }
    }

    if let Some(turns) = enemy.statuses.dazed_turns {
        let next = turns.saturating_sub(1);
        if next == 0 {
            enemy.statuses.dazed_turns = None;
            events.push(expired(Side::Enemy, 0, StatusKey::Dazed));
        } else {
            enemy.statuses.dazed_turns = Some(next);
        }
    }

    if let Some(limit) = enemy.statuses.action_limit {
        let next = limit.turns.saturating_sub(1);
        if next == 0 {
            enemy.statuses.action_limit = None;
            events.push(expired(Side::Enemy, 0, StatusKey::ActionLimit));
        } else {
            enemy.statuses.action_limit = Some(crate::combat::status::ActionLimit {
                cap: limit.cap,
                turns: next,
            });
        }
    }

    events
}

fn tick_modifiers(actor: &mut Combatant, side: Side, actor_index: usize, events: &mut Vec<BattleEvent>) {
    for kind in ModifierKind::ALL {
        if actor.statuses.tick_modifier(kind) {
            events.push(expired(side, actor_index, StatusKey::Modifier(kind)));
        }
    }
}

fn expired(side: Side, actor_index: usize, status: StatusKey) -> BattleEvent {
    BattleEvent::StatusExpired {
        side,
        actor_index,
        status,
    }
}
