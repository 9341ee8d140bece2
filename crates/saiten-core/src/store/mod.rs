//! The persisted state layout: one SQLite table per collection, each row a
//! JSON document keyed by its natural id, with the columns cascades filter
//! on lifted out alongside.
//!
//! Every row write is individually atomic. There are deliberately no
//! cross-table transactions: cascades are sequences of independent writes,
//! and an interrupted cascade leaves valid-but-stale aggregates that the
//! next mutation or a recalc corrects.

mod blacklist;
mod charts;
mod imports;
mod pbs;
mod scores;
mod sessions;
mod stats;
mod targets;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

use crate::error::Result;

pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens or creates the store at the given path.
    pub async fn connect<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// An in-memory store, used by tests and dry runs. Limited to a single
    /// connection so every handle sees the same database.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS scores (
                score_id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                chart_id TEXT NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                time_achieved INTEGER,
                data TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_scores_user_chart
                ON scores (user_id, chart_id)",
            "CREATE TABLE IF NOT EXISTS personal_bests (
                user_id INTEGER NOT NULL,
                chart_id TEXT NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, chart_id)
            )",
            "CREATE INDEX IF NOT EXISTS idx_pbs_chart ON personal_bests (chart_id)",
            "CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_sessions_user
                ON sessions (user_id, game, playtype)",
            "CREATE TABLE IF NOT EXISTS imports (
                import_id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS goals (
                goal_id TEXT PRIMARY KEY,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS goal_subs (
                goal_id TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (goal_id, user_id)
            )",
            "CREATE TABLE IF NOT EXISTS quests (
                quest_id TEXT PRIMARY KEY,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS quest_subs (
                quest_id TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (quest_id, user_id)
            )",
            "CREATE TABLE IF NOT EXISTS user_game_stats (
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, game, playtype)
            )",
            "CREATE TABLE IF NOT EXISTS rivals (
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, game, playtype)
            )",
            "CREATE TABLE IF NOT EXISTS score_blacklist (
                user_id INTEGER NOT NULL,
                score_id TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, score_id)
            )",
            "CREATE TABLE IF NOT EXISTS charts (
                chart_id TEXT PRIMARY KEY,
                song_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS songs (
                song_id INTEGER PRIMARY KEY,
                game TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS folders (
                folder_id TEXT PRIMARY KEY,
                game TEXT NOT NULL,
                playtype TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                data TEXT NOT NULL
            )",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }
}

pub(crate) fn encode<T: Serialize>(doc: &T) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(rows: Vec<String>) -> Result<Vec<T>> {
    rows.iter().map(|raw| decode(raw)).collect()
}
