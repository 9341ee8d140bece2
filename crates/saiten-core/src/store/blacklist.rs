use super::{Store, encode};
use crate::error::Result;
use crate::model::BlacklistEntry;

impl Store {
    pub async fn is_blacklisted(&self, user_id: i64, score_id: &str) -> Result<bool> {
        let row: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM score_blacklist WHERE user_id = ?1 AND score_id = ?2",
        )
        .bind(user_id)
        .bind(score_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn insert_blacklist(&self, entry: &BlacklistEntry) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO score_blacklist (user_id, score_id, data)
             VALUES (?1, ?2, ?3)",
        )
        .bind(entry.user_id)
        .bind(&entry.score_id)
        .bind(encode(entry)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn blacklisted_score_ids(&self, user_id: i64) -> Result<Vec<String>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT score_id FROM score_blacklist WHERE user_id = ?1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }
}
