use super::{Store, decode, encode};
use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::{RivalSet, UserGameStats};

impl Store {
    pub async fn upsert_user_game_stats(&self, stats: &UserGameStats) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO user_game_stats (user_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(stats.user_id)
        .bind(stats.game.to_string())
        .bind(stats.playtype.to_string())
        .bind(encode(stats)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_user_game_stats(
        &self,
        user_id: i64,
        game: Game,
        playtype: Playtype,
    ) -> Result<Option<UserGameStats>> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT data FROM user_game_stats
             WHERE user_id = ?1 AND game = ?2 AND playtype = ?3",
        )
        .bind(user_id)
        .bind(game.to_string())
        .bind(playtype.to_string())
        .fetch_optional(&self.pool)
        .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn set_rivals(&self, rivals: &RivalSet) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO rivals (user_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(rivals.user_id)
        .bind(rivals.game.to_string())
        .bind(rivals.playtype.to_string())
        .bind(encode(rivals)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The user's declared rival ids, or empty if they have declared none.
    pub async fn get_rivals(
        &self,
        user_id: i64,
        game: Game,
        playtype: Playtype,
    ) -> Result<Vec<i64>> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT data FROM rivals WHERE user_id = ?1 AND game = ?2 AND playtype = ?3",
        )
        .bind(user_id)
        .bind(game.to_string())
        .bind(playtype.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match raw.as_deref() {
            Some(raw) => {
                let set: RivalSet = decode(raw)?;
                Ok(set.rival_ids)
            }
            None => Ok(Vec::new()),
        }
    }
}
