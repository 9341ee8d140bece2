use super::{Store, decode, decode_all, encode};
use crate::error::Result;
use crate::model::Score;
use crate::model::enums::{Game, Playtype};

impl Store {
    /// Inserts or replaces a score. Replacing the same scoreID with
    /// identical content is a no-op by construction.
    pub async fn upsert_score(&self, score: &Score) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO scores
                (score_id, user_id, chart_id, game, playtype, time_achieved, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&score.score_id)
        .bind(score.user_id)
        .bind(&score.chart_id)
        .bind(score.game.to_string())
        .bind(score.playtype.to_string())
        .bind(score.time_achieved)
        .bind(encode(score)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_score(&self, score_id: &str) -> Result<Option<Score>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM scores WHERE score_id = ?1")
            .bind(score_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn score_exists(&self, score_id: &str) -> Result<bool> {
        let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM scores WHERE score_id = ?1")
            .bind(score_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn delete_score_doc(&self, score_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM scores WHERE score_id = ?1")
            .bind(score_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn scores_for_user_chart(&self, user_id: i64, chart_id: &str) -> Result<Vec<Score>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT data FROM scores WHERE user_id = ?1 AND chart_id = ?2",
        )
        .bind(user_id)
        .bind(chart_id)
        .fetch_all(&self.pool)
        .await?;

        decode_all(rows)
    }

    pub async fn user_has_score_on_chart(&self, user_id: i64, chart_id: &str) -> Result<bool> {
        let row: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM scores WHERE user_id = ?1 AND chart_id = ?2 LIMIT 1")
                .bind(user_id)
                .bind(chart_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Every distinct chart the user has at least one score on, for one
    /// game variant. Drives full recalcs.
    pub async fn scored_charts_for_user(
        &self,
        user_id: i64,
        game: Game,
        playtype: Playtype,
    ) -> Result<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT chart_id FROM scores
             WHERE user_id = ?1 AND game = ?2 AND playtype = ?3",
        )
        .bind(user_id)
        .bind(game.to_string())
        .bind(playtype.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Resolves a set of scoreIDs, silently skipping ids that no longer
    /// exist. Callers that care about dangling references check the length.
    pub async fn get_scores(&self, score_ids: &[String]) -> Result<Vec<Score>> {
        let mut scores = Vec::with_capacity(score_ids.len());

        for score_id in score_ids {
            if let Some(score) = self.get_score(score_id).await? {
                scores.push(score);
            }
        }

        Ok(scores)
    }
}
