//! Battle event log export for balancing analysis. One CSV row per event, flat
//! columns with empty cells where a field does not apply to the event kind.

use std::path::Path;

use crate::combat::events::{BattleEvent, StatusKey};

pub const EVENT_CSV_HEADER: [&str; 14] = [
    "exported_at",
    "battle_id",
    "seq",
    "type",
    "move_id",
    "target_index",
    "damage",
    "absorbed_shield",
    "is_crit",
    "is_mortal",
    "guarded",
    "new_hp",
    "new_shield",
    "status",
];

fn status_label(status: &StatusKey) -> String {
    match status {
        StatusKey::Modifier(kind) => kind.as_str().to_string(),
        StatusKey::Stun => "stun".to_string(),
        StatusKey::Dazed => "dazed".to_string(),
        StatusKey::ActionLimit => "actionLimit".to_string(),
    }
}

fn event_row(exported_at: &str, battle_id: &str, seq: usize, event: &BattleEvent) -> Vec<String> {
    let mut row = vec![
        exported_at.to_string(),
        battle_id.to_string(),
        seq.to_string(),
    ];
    let blank = String::new;
    match event {
        BattleEvent::TurnDisruptedFunny {} => {
            row.push("turnDisruptedFunny".to_string());
            row.extend(std::iter::repeat_with(blank).take(10));
        }
        BattleEvent::EnemyStunnedSkip {} => {
            row.push("enemyStunnedSkip".to_string());
            row.extend(std::iter::repeat_with(blank).take(10));
        }
        BattleEvent::EnemyMoveUnknown { move_id } => {
            row.push("enemyMoveUnknown".to_string());
            row.push(move_id.clone());
            row.extend(std::iter::repeat_with(blank).take(9));
        }
        BattleEvent::EnemyMissDazed { move_id } => {
            row.push("enemyMissDazed".to_string());
            row.push(move_id.clone());
            row.extend(std::iter::repeat_with(blank).take(9));
        }
        BattleEvent::EnemyConfusedMisfire { move_id } => {
            row.push("enemyConfusedMisfire".to_string());
            row.push(move_id.clone());
            row.extend(std::iter::repeat_with(blank).take(9));
        }
        BattleEvent::EnemyConfusedSelfHeal { healed, new_hp } => {
            row.push("enemyConfusedSelfHeal".to_string());
            row.extend(std::iter::repeat_with(blank).take(2));
            row.push(format!("-{healed}"));
            row.extend(std::iter::repeat_with(blank).take(4));
            row.push(new_hp.to_string());
            row.extend(std::iter::repeat_with(blank).take(2));
        }
        BattleEvent::EnemyConfusedWildMiss { move_id } => {
            row.push("enemyConfusedWildMiss".to_string());
            row.push(move_id.clone());
            row.extend(std::iter::repeat_with(blank).take(9));
        }
        BattleEvent::EnemyConfusedLowAccuracyHit {} => {
            row.push("enemyConfusedLowAccuracyHit".to_string());
            row.extend(std::iter::repeat_with(blank).take(10));
        }
        BattleEvent::EnemyConfusionCleared {} => {
            row.push("enemyConfusionCleared".to_string());
            row.extend(std::iter::repeat_with(blank).take(10));
        }
        BattleEvent::EnemyAttackHit {
            move_id,
            target_index,
            damage,
            absorbed_shield,
            is_crit,
            is_mortal,
            guarded,
            new_hp,
            new_shield,
            consume_defend: _,
        } => {
            row.push("enemyAttackHit".to_string());
            row.push(move_id.clone());
            row.push(target_index.to_string());
            row.push(damage.to_string());
            row.push(absorbed_shield.to_string());
            row.push(is_crit.to_string());
            row.push(is_mortal.to_string());
            row.push(guarded.to_string());
            row.push(new_hp.to_string());
            row.push(new_shield.to_string());
            row.push(String::new());
        }
        BattleEvent::StatusExpired {
            side: _,
            actor_index,
            status,
        } => {
            row.push("statusExpired".to_string());
            row.push(String::new());
            row.push(actor_index.to_string());
            row.extend(std::iter::repeat_with(blank).take(7));
            row.push(status_label(status));
        }
    }
    row
}

/// Write a battle's event log as CSV. Returns the number of data rows written.
pub fn export_events_csv(
    path: &Path,
    battle_id: &str,
    events: &[BattleEvent],
) -> Result<usize, Box<dyn std::error::Error>> {
    let exported_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EVENT_CSV_HEADER)?;
    for (seq, event) in events.iter().enumerate() {
        writer.write_record(event_row(&exported_at, battle_id, seq, event))?;
    }
    writer.flush()?;
    Ok(events.len())
}
