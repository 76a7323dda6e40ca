//! Turn-based combat resolution and progression core for a movie-themed RPG,
//! plus the simulator tooling around it (scripted battle runner, parallel seed
//! sweeps, CSV export, content validation).

pub mod cli;
pub mod combat;
pub mod data;
pub mod parallel;
pub mod sim;
