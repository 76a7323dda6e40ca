//! Closed status model: every timed effect is one `TimedModifier` under a `ModifierKind`
//! key, so a magnitude can never drift apart from its duration. Enemy-only state
//! (stun, dazed, action limit, confusion) is typed explicitly instead of living in a
//! stringly-keyed bag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Timed percentage modifier families. `turns == 0` means expired; the percentage of
/// an expired entry always reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierKind {
    AtkBuff,
    AtkDebuff,
    DefBuff,
    DefDebuff,
    CritChanceBuff,
    CritDamageBuff,
    DamageReduction,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 7] = [
        ModifierKind::AtkBuff,
        ModifierKind::AtkDebuff,
        ModifierKind::DefBuff,
        ModifierKind::DefDebuff,
        ModifierKind::CritChanceBuff,
        ModifierKind::CritDamageBuff,
        ModifierKind::DamageReduction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtkBuff => "atkBuff",
            Self::AtkDebuff => "atkDebuff",
            Self::DefBuff => "defBuff",
            Self::DefDebuff => "defDebuff",
            Self::CritChanceBuff => "critChanceBuff",
            Self::CritDamageBuff => "critDamageBuff",
            Self::DamageReduction => "damageReduction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedModifier {
    pub pct: f64,
    pub turns: u32,
}

/// One-shot marker: the next hit taken is amplified by `pct`, then the marker clears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextHitVuln {
    pub pct: f64,
}

/// Escalating confusion machine state. Not ticked by the status ticker; the enemy
/// turn planner's clear roll is the only way out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfusionState {
    pub proc_chance: f64,
    pub clear_chance: f64,
    pub ramp_proc: f64,
    pub ramp_clear: f64,
    /// Flips on the first action confusion visibly alters. A proc roll that does not
    /// fire leaves this untouched.
    pub triggered: bool,
}

impl ConfusionState {
    /// Both chances ramp after any triggered branch, converging toward the cap.
    /// Never decreases a chance, even one already above the cap.
    pub fn ramp_up(&mut self) {
        self.proc_chance = self
            .proc_chance
            .max((self.proc_chance + self.ramp_proc).min(CONFUSION_CHANCE_CAP));
        self.clear_chance = self
            .clear_chance
            .max((self.clear_chance + self.ramp_clear).min(CONFUSION_CHANCE_CAP));
    }
}

impl Default for ConfusionState {
    fn default() -> Self {
        Self {
            proc_chance: DEFAULT_CONFUSION_PROC_CHANCE,
            clear_chance: DEFAULT_CONFUSION_CLEAR_CHANCE,
            ramp_proc: DEFAULT_CONFUSION_RAMP_PROC,
            ramp_clear: DEFAULT_CONFUSION_RAMP_CLEAR,
            triggered: false,
        }
    }
}

/// Caps the enemy to `cap` actions per turn while `turns > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLimit {
    pub cap: u32,
    pub turns: u32,
}

pub const DEFAULT_CONFUSION_PROC_CHANCE: f64 = 0.35;
pub const DEFAULT_CONFUSION_CLEAR_CHANCE: f64 = 0.25;
pub const DEFAULT_CONFUSION_RAMP_PROC: f64 = 0.15;
pub const DEFAULT_CONFUSION_RAMP_CLEAR: f64 = 0.25;
pub const CONFUSION_CHANCE_CAP: f64 = 0.95;

/// All statuses carried by one combatant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSet {
    #[serde(default)]
    modifiers: BTreeMap<ModifierKind, TimedModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hit_vuln: Option<NextHitVuln>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stun_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dazed_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_limit: Option<ActionLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confusion: Option<ConfusionState>,
}

/// Treat non-finite or negative percentages as absent.
pub(crate) fn sane_pct(pct: f64) -> f64 {
    if pct.is_finite() && pct > 0.0 {
        pct
    } else {
        0.0
    }
}

impl StatusSet {
    /// Apply a timed modifier. Stacks by taking the max of magnitude and of remaining
    /// turns, never summing, so reapplying an effect refreshes rather than snowballs.
    pub fn apply_modifier(&mut self, kind: ModifierKind, pct: f64, turns: u32) {
        let pct = sane_pct(pct);
        if pct <= 0.0 || turns == 0 {
            return;
        }
        let entry = self.modifiers.entry(kind).or_insert(TimedModifier { pct: 0.0, turns: 0 });
        entry.pct = entry.pct.max(pct);
        entry.turns = entry.turns.max(turns);
    }

    /// Percentage of `kind` while active, else 0. Duration is the sole truth of
    /// activity: a magnitude with no positive turns reads as zero.
    pub fn active_pct(&self, kind: ModifierKind) -> f64 {
        match self.modifiers.get(&kind) {
            Some(m) if m.turns > 0 => sane_pct(m.pct),
            _ => 0.0,
        }
    }

    pub fn modifier(&self, kind: ModifierKind) -> Option<TimedModifier> {
        self.modifiers.get(&kind).copied()
    }

    /// Decrement one timed modifier. Returns true exactly when this call expired it
    /// (turns hit 0 and the percentage was zeroed). Already-expired entries are no-ops.
    pub(crate) fn tick_modifier(&mut self, kind: ModifierKind) -> bool {
        let Some(entry) = self.modifiers.get_mut(&kind) else {
            return false;
        };
        if entry.turns == 0 {
            return false;
        }
        entry.turns -= 1;
        if entry.turns == 0 {
            entry.pct = 0.0;
            return true;
        }
        false
    }

    pub fn set_stun(&mut self, turns: u32) {
        if turns == 0 {
            return;
        }
        let current = self.stun_turns.unwrap_or(0);
        self.stun_turns = Some(current.max(turns));
    }

    pub fn set_dazed(&mut self, turns: u32) {
        if turns == 0 {
            return;
        }
        let current = self.dazed_turns.unwrap_or(0);
        self.dazed_turns = Some(current.max(turns));
    }

    pub fn set_action_limit(&mut self, cap: u32, turns: u32) {
        if cap == 0 || turns == 0 {
            return;
        }
        let merged = match self.action_limit {
            Some(existing) => ActionLimit {
                cap: existing.cap.min(cap.max(1)),
                turns: existing.turns.max(turns),
            },
            None => ActionLimit { cap: cap.max(1), turns },
        };
        self.action_limit = Some(merged);
    }

    /// Arm the confusion machine with default chances. Hidden at apply time; it only
    /// becomes visible once it actually alters a move.
    pub fn set_confused(&mut self) {
        self.set_confused_with(ConfusionState::default());
    }

    pub fn set_confused_with(&mut self, state: ConfusionState) {
        if self.confusion.is_none() {
            self.confusion = Some(state);
        }
    }

    pub fn set_next_hit_vuln(&mut self, pct: f64) {
        let pct = sane_pct(pct);
        if pct > 0.0 {
            self.next_hit_vuln = Some(NextHitVuln { pct });
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_turns.is_some_and(|t| t > 0)
    }

    pub fn is_dazed(&self) -> bool {
        self.dazed_turns.is_some_and(|t| t > 0)
    }

    pub fn action_cap(&self) -> Option<u32> {
        self.action_limit.and_then(|l| if l.turns > 0 { Some(l.cap.max(1)) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_modifier_reads_zero() {
        let mut s = StatusSet::default();
        s.apply_modifier(ModifierKind::AtkBuff, 0.4, 1);
        assert_eq!(s.active_pct(ModifierKind::AtkBuff), 0.4);
        assert!(s.tick_modifier(ModifierKind::AtkBuff));
        assert_eq!(s.active_pct(ModifierKind::AtkBuff), 0.0);
        // ticking an already-expired entry is a no-op
        assert!(!s.tick_modifier(ModifierKind::AtkBuff));
    }

    #[test]
    fn apply_modifier_refreshes_instead_of_stacking() {
        let mut s = StatusSet::default();
        s.apply_modifier(ModifierKind::DefBuff, 0.3, 2);
        s.apply_modifier(ModifierKind::DefBuff, 0.2, 4);
        let m = s.modifier(ModifierKind::DefBuff).unwrap();
        assert_eq!(m.pct, 0.3);
        assert_eq!(m.turns, 4);
    }

    #[test]
    fn non_finite_percentages_are_rejected() {
        let mut s = StatusSet::default();
        s.apply_modifier(ModifierKind::AtkDebuff, f64::NAN, 3);
        s.apply_modifier(ModifierKind::DefDebuff, -0.5, 3);
        assert_eq!(s.active_pct(ModifierKind::AtkDebuff), 0.0);
        assert_eq!(s.active_pct(ModifierKind::DefDebuff), 0.0);
    }

    #[test]
    fn confusion_ramp_is_monotonic_and_capped() {
        let mut c = ConfusionState::default();
        for _ in 0..20 {
            let (proc_before, clear_before) = (c.proc_chance, c.clear_chance);
            c.ramp_up();
            assert!(c.proc_chance >= proc_before);
            assert!(c.clear_chance >= clear_before);
        }
        assert!(c.proc_chance <= CONFUSION_CHANCE_CAP);
        assert!(c.clear_chance <= CONFUSION_CHANCE_CAP);
    }

    #[test]
    fn action_limit_keeps_strictest_cap() {
        let mut s = StatusSet::default();
        s.set_action_limit(3, 2);
        s.set_action_limit(2, 1);
        let limit = s.action_limit.unwrap();
        assert_eq!(limit.cap, 2);
        assert_eq!(limit.turns, 2);
        assert_eq!(s.action_cap(), Some(2));
    }
}
