//! CLI command implementations.

pub mod delete;
pub mod import;
pub mod pbs;
pub mod recalc;
pub mod revert;
pub mod seed;
