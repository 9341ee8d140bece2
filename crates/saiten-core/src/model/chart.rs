use serde::{Deserialize, Serialize};

use crate::model::enums::{Game, Playtype};

/// Reference data: one ranked chart of a song. Read-only from this core;
/// owned by an external seeding collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(rename = "chartID")]
    pub chart_id: String,
    #[serde(rename = "songID")]
    pub song_id: i64,
    pub game: Game,
    pub playtype: Playtype,
    pub level: String,
    pub level_num: f64,
}

/// Reference data: one song, parent of its charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(rename = "songID")]
    pub song_id: i64,
    pub game: Game,
    pub title: String,
    pub artist: String,
}

/// Reference data: a named chart set, used by folder-scoped goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(rename = "folderID")]
    pub folder_id: String,
    pub game: Game,
    pub playtype: Playtype,
    pub title: String,
    #[serde(rename = "chartIDs")]
    pub chart_ids: Vec<String>,
}

/// Reference data: a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub username: String,
}
