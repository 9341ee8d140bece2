use serde::{Deserialize, Serialize};

use crate::model::enums::{Game, Playtype};

/// A cluster of one user's scores achieved close together in time, for one
/// game variant. A session with zero members must not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    pub name: String,
    /// Member scores, ordered by time achieved.
    #[serde(rename = "scoreIDs")]
    pub score_ids: Vec<String>,
    pub time_started: i64,
    pub time_ended: i64,
    pub highlight: bool,
    pub calculated_data: SessionCalculatedData,
}

impl Session {
    pub fn contains_score(&self, score_id: &str) -> bool {
        self.score_ids.iter().any(|id| id == score_id)
    }
}

/// Aggregate stats re-derivable from the current member scores alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCalculatedData {
    pub score_count: u32,
    /// Members that strictly beat the best lamp of an earlier member on the
    /// same chart within the session.
    pub lamp_raises: u32,
    pub grade_raises: u32,
    pub total_score: u64,
}

/// How an import touched a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SessionInfo {
    Created {
        #[serde(rename = "sessionID")]
        session_id: String,
    },
    Appended {
        #[serde(rename = "sessionID")]
        session_id: String,
    },
}

impl SessionInfo {
    pub fn session_id(&self) -> &str {
        match self {
            SessionInfo::Created { session_id } | SessionInfo::Appended { session_id } => {
                session_id
            }
        }
    }
}
