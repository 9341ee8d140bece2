use serde::{Deserialize, Serialize};

use crate::model::enums::{Game, Playtype};
use crate::model::score::Score;
use crate::model::session::SessionInfo;
use crate::model::stats::ClassDelta;
use crate::model::target::GoalDelta;

/// Ledger entry for one bulk submission. An import with zero scoreIDs must
/// not exist (symmetric with sessions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Import {
    #[serde(rename = "importID")]
    pub import_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtypes: Vec<Playtype>,
    #[serde(rename = "scoreIDs")]
    pub score_ids: Vec<String>,
    pub created_sessions: Vec<SessionInfo>,
    pub time_started: i64,
    pub time_finished: i64,
    /// Goal progress changes observed while evaluating this batch.
    pub goal_info: Vec<GoalDelta>,
    /// Class badge changes observed while evaluating this batch.
    pub class_deltas: Vec<ClassDelta>,
}

/// A deleted score recorded to suppress re-import of the exact same content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "scoreID")]
    pub score_id: String,
    pub score: Score,
}
