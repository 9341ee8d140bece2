//! Score tracking core for rhythm game score databases.
//!
//! Scores are the only source of truth; personal bests, sessions, import
//! ledgers, rankings, goals, quests and user stats are all derived from
//! them and kept consistent by cascading recomputes rather than
//! transactions. The entry points in [`mutation`] run those cascades.

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod games;
pub mod model;
pub mod mutation;
pub mod pb;
pub mod session;
pub mod stats;
pub mod store;
pub mod targets;

pub use config::Config;
pub use context::Context;
pub use error::{Error, Result};
pub use store::Store;
