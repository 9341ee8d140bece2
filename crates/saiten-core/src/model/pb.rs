use serde::{Deserialize, Serialize};

use crate::model::enums::{Game, Playtype};
use crate::model::score::{CalculatedData, ScoreData};

/// The best-known record per (user, chart), synthesized from that user's
/// scores on the chart rather than copied from any single one.
///
/// Exists if and only if the user has at least one score on the chart, and
/// is fully recomputable from the score collection at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "chartID")]
    pub chart_id: String,
    #[serde(rename = "songID")]
    pub song_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    /// Best-of values: score/percent/grade come from the score provenance,
    /// the lamp from the lamp provenance. The two may be different plays.
    pub score_data: ScoreData,
    pub calculated_data: CalculatedData,
    /// Latest timestamp across the composing scores, if any was timestamped.
    pub time_achieved: Option<i64>,
    pub composed_from: ComposedFrom,
    pub ranking_data: RankingData,
    pub highlight: bool,
    pub comments: Vec<String>,
}

/// Per-metric provenance: which underlying score supplied each best value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedFrom {
    #[serde(rename = "scorePB")]
    pub score_pb: String,
    #[serde(rename = "lampPB")]
    pub lamp_pb: String,
}

/// Denormalized ranking state. Eventually consistent by design: a stale
/// value self-corrects the next time the chart's ranking is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingData {
    pub rank: u32,
    pub out_of: u32,
    pub rival_rank: Option<u32>,
}

impl Default for RankingData {
    fn default() -> Self {
        Self {
            rank: 1,
            out_of: 1,
            rival_rank: None,
        }
    }
}
