use super::{Store, decode, decode_all, encode};
use crate::error::Result;
use crate::model::Session;
use crate::model::enums::{Game, Playtype};

impl Store {
    pub async fn upsert_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO sessions (session_id, user_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&session.session_id)
        .bind(session.user_id)
        .bind(session.game.to_string())
        .bind(session.playtype.to_string())
        .bind(encode(session)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT data FROM sessions WHERE session_id = ?1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn sessions_for_user(
        &self,
        user_id: i64,
        game: Game,
        playtype: Playtype,
    ) -> Result<Vec<Session>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT data FROM sessions WHERE user_id = ?1 AND game = ?2 AND playtype = ?3",
        )
        .bind(user_id)
        .bind(game.to_string())
        .bind(playtype.to_string())
        .fetch_all(&self.pool)
        .await?;

        decode_all(rows)
    }

    /// Every session of this user containing the given score, across all
    /// game variants.
    pub async fn sessions_containing_score(
        &self,
        user_id: i64,
        score_id: &str,
    ) -> Result<Vec<Session>> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT data FROM sessions WHERE user_id = ?1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let sessions: Vec<Session> = decode_all(rows)?;

        Ok(sessions
            .into_iter()
            .filter(|s| s.contains_score(score_id))
            .collect())
    }
}
