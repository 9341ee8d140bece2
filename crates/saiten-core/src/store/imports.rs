use super::{Store, decode, decode_all, encode};
use crate::error::Result;
use crate::model::Import;

impl Store {
    pub async fn upsert_import(&self, import: &Import) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO imports (import_id, user_id, game, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&import.import_id)
        .bind(import.user_id)
        .bind(import.game.to_string())
        .bind(encode(import)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_import(&self, import_id: &str) -> Result<Option<Import>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT data FROM imports WHERE import_id = ?1")
                .bind(import_id)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn delete_import(&self, import_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM imports WHERE import_id = ?1")
            .bind(import_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Every import of this user containing the given score. There should
    /// only ever be one, but the ledger itself does not enforce that.
    pub async fn imports_containing_score(
        &self,
        user_id: i64,
        score_id: &str,
    ) -> Result<Vec<Import>> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT data FROM imports WHERE user_id = ?1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let imports: Vec<Import> = decode_all(rows)?;

        Ok(imports
            .into_iter()
            .filter(|i| i.score_ids.iter().any(|id| id == score_id))
            .collect())
    }
}
