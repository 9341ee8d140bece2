use serde::{Deserialize, Serialize};

use crate::model::chart::Chart;
use crate::model::enums::{Game, Grade, Lamp, Metric, Playtype};

/// One recorded play. Owned exclusively by the score collection; referenced
/// by id from sessions, imports and PB provenance.
///
/// Immutable once written, except via a full replace-and-rehash
/// (see [`update_score`](crate::mutation::update_score)).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(rename = "scoreID")]
    pub score_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    #[serde(rename = "chartID")]
    pub chart_id: String,
    #[serde(rename = "songID")]
    pub song_id: i64,
    pub score_data: ScoreData,
    pub calculated_data: CalculatedData,
    /// Unix millis. None means "no timestamp known", which excludes the
    /// score from sessions.
    pub time_achieved: Option<i64>,
    pub service: String,
    pub comment: Option<String>,
    pub highlight: bool,
}

/// The metric values of one play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    pub score: u32,
    pub percent: f64,
    pub grade: Grade,
    pub lamp: Lamp,
    pub judgements: Judgements,
}

impl ScoreData {
    /// Numeric value of a metric, with categorical metrics mapped to their
    /// bucket index. Used for goal criteria and ranking comparisons.
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Score => f64::from(self.score),
            Metric::Percent => self.percent,
            Metric::Lamp => f64::from(self.lamp.index()),
            Metric::Grade => f64::from(self.grade.index()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgements {
    pub pgreat: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub poor: u32,
}

/// Derived numeric ratings for a play. These feed user profile ratings and
/// are merged into PBs with per-metric provenance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedData {
    pub rating: Option<f64>,
    pub lamp_rating: Option<f64>,
}

impl CalculatedData {
    /// Derives ratings from a chart's level and the play's metrics.
    pub fn derive(chart: &Chart, data: &ScoreData) -> Self {
        let accuracy = (data.percent / 100.0).clamp(0.0, 1.0);
        let rating = chart.level_num * accuracy * accuracy * 10.0;

        let lamp_coefficient = match data.lamp {
            Lamp::Failed => 0.0,
            Lamp::AssistClear => 2.5,
            Lamp::EasyClear => 5.0,
            Lamp::Clear => 7.5,
            Lamp::HardClear => 10.0,
            Lamp::ExHardClear => 11.0,
            Lamp::FullCombo => 12.0,
            Lamp::Perfect => 13.0,
        };
        let lamp_rating = chart.level_num * lamp_coefficient;

        Self {
            rating: Some(rating),
            lamp_rating: Some(lamp_rating),
        }
    }
}

/// A normalized score as produced by an out-of-scope converter. The core
/// resolves the chart, derives identity and ratings, and owns the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingScore {
    #[serde(rename = "chartID")]
    pub chart_id: String,
    pub score_data: ScoreData,
    pub time_achieved: Option<i64>,
    pub service: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Deterministic score identity: a hash of user + chart + score content.
///
/// Identical resubmission therefore dedupes to a no-op, and any change to
/// an identity-relevant field yields a new scoreID.
pub fn create_score_id(user_id: i64, chart_id: &str, data: &ScoreData) -> String {
    let input = format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        user_id,
        chart_id,
        data.score,
        data.percent,
        data.grade,
        data.lamp,
        data.judgements.pgreat,
        data.judgements.great,
        data.judgements.good,
        data.judgements.bad,
        data.judgements.poor,
    );

    format!("S{:x}", md5::compute(input))
}
