//! Content validation for rosters, move registries, and party lineups.
//! Collects diagnostics instead of failing fast so a data author sees every
//! problem in one pass.

use std::collections::HashSet;
use std::fmt;

use crate::data::enemy::{ActionsPerTurn, EnemyRecord};
use crate::data::moves::MoveRegistry;
use crate::data::party::PartyMemberRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Validate the enemy roster against the move registry.
pub fn validate_roster(roster: &[EnemyRecord], moves: &MoveRegistry, report: &mut ValidationReport) {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    if roster.is_empty() {
        report.push(ValidationSeverity::Error, "roster", "roster is empty");
        return;
    }

    for record in roster {
        let ctx = format!("enemy:{}", record.id);

        if record.id.is_empty() {
            report.push(ValidationSeverity::Error, "roster", "enemy with empty id");
        } else if !seen_ids.insert(record.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                &ctx,
                "duplicate enemy id".to_string(),
            );
        }

        if record.max_hp <= 0 {
            report.push(
                ValidationSeverity::Error,
                &ctx,
                format!("max_hp must be positive, got {}", record.max_hp),
            );
        }
        if record.attack <= 0 {
            report.push(
                ValidationSeverity::Error,
                &ctx,
                format!("attack must be positive, got {}", record.attack),
            );
        }
        if record.defense < 0 {
            report.push(
                ValidationSeverity::Warning,
                &ctx,
                format!("negative defense {} clamps to 0 at battle time", record.defense),
            );
        }
        if record.level == 0 {
            report.push(
                ValidationSeverity::Warning,
                &ctx,
                "level 0 clamps to 1 at battle time".to_string(),
            );
        }
        if !record.crit_chance.is_finite() || !(0.0..=0.95).contains(&record.crit_chance) {
            report.push(
                ValidationSeverity::Warning,
                &ctx,
                format!("crit_chance {} outside [0, 0.95]", record.crit_chance),
            );
        }

        if record.moves.is_empty() {
            report.push(
                ValidationSeverity::Info,
                &ctx,
                "empty move pool falls back to basic_attack".to_string(),
            );
        }
        for move_id in &record.moves {
            if moves.get(move_id).is_none() {
                report.push(
                    ValidationSeverity::Warning,
                    &ctx,
                    format!("move '{move_id}' not in registry, dropped at battle time"),
                );
            }
        }

        match record.actions_per_turn {
            Some(ActionsPerTurn::Fixed(n)) if n == 0 || n > 12 => {
                report.push(
                    ValidationSeverity::Warning,
                    &ctx,
                    format!("actions_per_turn {n} clamps to [1, 12]"),
                );
            }
            Some(ActionsPerTurn::Range { min, max }) if min > max || max > 12 || min == 0 => {
                report.push(
                    ValidationSeverity::Warning,
                    &ctx,
                    format!("actions_per_turn range {min}..{max} clamps to [1, 12]"),
                );
            }
            _ => {}
        }
    }
}

/// Validate the move registry on its own.
pub fn validate_moves(moves: &MoveRegistry, report: &mut ValidationReport) {
    if moves.is_empty() {
        report.push(ValidationSeverity::Error, "moves", "move registry is empty");
        return;
    }
    if moves.get("basic_attack").is_none() {
        report.push(
            ValidationSeverity::Error,
            "moves",
            "fallback move 'basic_attack' is missing",
        );
    }
}

/// Validate a party lineup.
pub fn validate_party(party: &[PartyMemberRecord], report: &mut ValidationReport) {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    if party.is_empty() {
        report.push(ValidationSeverity::Error, "party", "party is empty");
        return;
    }
    if party.len() > 4 {
        report.push(
            ValidationSeverity::Warning,
            "party",
            format!("{} members, battles use the first 4", party.len()),
        );
    }

    for record in party {
        let ctx = format!("party:{}", record.id);
        if record.id.is_empty() {
            report.push(ValidationSeverity::Error, "party", "member with empty id");
        } else if !seen_ids.insert(record.id.as_str()) {
            report.push(ValidationSeverity::Error, &ctx, "duplicate member id".to_string());
        }
        if record.max_hp <= 0 {
            report.push(
                ValidationSeverity::Error,
                &ctx,
                format!("max_hp must be positive, got {}", record.max_hp),
            );
        }
        if record.atk <= 0 {
            report.push(
                ValidationSeverity::Error,
                &ctx,
                format!("atk must be positive, got {}", record.atk),
            );
        }
        if !record.defend_damage_mult.is_finite()
            || !(0.2..=0.9).contains(&record.defend_damage_mult)
        {
            report.push(
                ValidationSeverity::Warning,
                &ctx,
                format!(
                    "defend_damage_mult {} outside [0.2, 0.9], clamps at battle time",
                    record.defend_damage_mult
                ),
            );
        }
    }
}

/// Run every validator over the default content set.
pub fn validate_all(
    roster: &[EnemyRecord],
    moves: &MoveRegistry,
    party: &[PartyMemberRecord],
) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_moves(moves, &mut report);
    validate_roster(roster, moves, &mut report);
    validate_party(party, &mut report);
    report
}
