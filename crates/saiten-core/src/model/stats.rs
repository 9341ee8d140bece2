use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::enums::{Game, Playtype};

/// Per (user, game, playtype) aggregates: class badges and a profile
/// rating. Recomputed whenever the underlying PB set changes materially.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameStats {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    pub rating: f64,
    /// Badge set name -> achieved tier index.
    pub classes: BTreeMap<String, u32>,
}

/// One badge changing value during a stats recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDelta {
    pub set: String,
    pub old: Option<u32>,
    pub new: u32,
}

/// A user's declared rival set for one game variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RivalSet {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    #[serde(rename = "rivalIDs")]
    pub rival_ids: Vec<i64>,
}
