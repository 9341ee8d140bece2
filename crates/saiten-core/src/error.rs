use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("User {0} does not exist")]
    UserNotFound(i64),

    #[error("Chart {0} does not exist")]
    ChartNotFound(String),

    #[error("Song {0} does not exist")]
    SongNotFound(i64),

    #[error("Folder {0} does not exist")]
    FolderNotFound(String),

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Event dispatch failed: {0}")]
    EventDispatch(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Fatal errors indicate reference-data corruption upstream and must
    /// abort the enclosing operation rather than be skipped per-item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound(_) | Error::ChartNotFound(_) | Error::SongNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::UserNotFound(1).is_fatal());
        assert!(Error::ChartNotFound("c".into()).is_fatal());
        assert!(!Error::InvalidGoal("bad mode".into()).is_fatal());
        assert!(!Error::FolderNotFound("f".into()).is_fatal());
    }
}
