pub mod enemy;
pub mod moves;
pub mod party;
pub mod validate;

pub use enemy::{
    builtin_roster, resolve_enemy, roster_or_builtin, ActionsPerTurn, EnemyRecord,
    DEFAULT_ENEMIES_PATH,
};
pub use moves::{MoveRecord, MoveRegistry, DEFAULT_MOVES_PATH};
pub use party::{build_party, builtin_party, party_or_builtin, PartyMemberRecord, DEFAULT_PARTY_PATH};
pub use validate::{
    validate_all, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};
