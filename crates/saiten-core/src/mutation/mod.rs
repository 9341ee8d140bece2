//! Score mutations and the cascades that keep every derived document
//! consistent with the score collection.
//!
//! Ordering inside a cascade is fixed: scores first, then sessions and
//! imports, then PBs, then rankings, then goals, quests and stats. Each
//! step reads the state the previous step wrote, so a crash mid-cascade
//! leaves derived documents stale but never structurally broken; rerunning
//! the recompute entry points repairs them.

pub mod delete;
pub mod import;
pub mod update;

pub use delete::{delete_multiple_scores, delete_score, revert_import};
pub use import::{import_scores, ImportResult};
pub use update::update_score;
