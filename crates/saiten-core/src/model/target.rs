use serde::{Deserialize, Serialize};

use crate::model::enums::{Game, Metric, Playtype};

/// A target criterion over a chart set, shared across subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "goalID")]
    pub goal_id: String,
    pub game: Game,
    pub playtype: Playtype,
    pub name: String,
    pub charts: GoalCharts,
    pub criteria: GoalCriteria,
    pub time_added: i64,
}

/// The chart set a goal ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum GoalCharts {
    Single(String),
    Multi(Vec<String>),
    Folder(String),
}

/// The threshold a goal demands, and how many charts must meet it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCriteria {
    pub key: Metric,
    pub value: f64,
    pub mode: GoalMode,
    /// Absolute: how many charts must qualify. Proportion: the fraction of
    /// the chart set that must qualify, in (0, 1]. Forbidden for single.
    #[serde(default)]
    pub count_num: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    Single,
    Absolute,
    Proportion,
}

/// One user's live progress against a goal, recomputed from their PBs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSubscription {
    #[serde(rename = "goalID")]
    pub goal_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    pub progress: Option<f64>,
    pub out_of: f64,
    pub achieved: bool,
    pub time_set: i64,
    pub time_achieved: Option<i64>,
    pub last_interaction: Option<i64>,
    pub was_instantly_achieved: bool,
}

/// An ordered bundle of goals tracked as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    #[serde(rename = "questID")]
    pub quest_id: String,
    pub game: Game,
    pub playtype: Playtype,
    pub name: String,
    pub desc: Option<String>,
    #[serde(rename = "goalIDs")]
    pub goal_ids: Vec<String>,
}

/// One user's progress on a quest: the count of its referenced goals they
/// currently have achieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSubscription {
    #[serde(rename = "questID")]
    pub quest_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    pub progress: u32,
    pub achieved: bool,
    pub time_set: i64,
    pub time_achieved: Option<i64>,
    pub last_interaction: Option<i64>,
}

/// Point-in-time view of a goal subscription, used in deltas and events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetState {
    pub progress: Option<f64>,
    pub out_of: f64,
    pub achieved: bool,
}

/// A goal subscription's observed progress change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDelta {
    #[serde(rename = "goalID")]
    pub goal_id: String,
    pub old: TargetState,
    pub new: TargetState,
}

/// Point-in-time view of a quest subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestState {
    pub progress: u32,
    pub achieved: bool,
}

/// A quest subscription's observed progress change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDelta {
    #[serde(rename = "questID")]
    pub quest_id: String,
    pub old: QuestState,
    pub new: QuestState,
}
