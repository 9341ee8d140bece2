//! Personal-best derivation and ranking maintenance.

pub mod ranking;
pub mod recompute;

pub use ranking::{update_chart_ranking, update_rival_rankings};
pub use recompute::{process_pbs, recompute_pb};
