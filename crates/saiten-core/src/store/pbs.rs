use super::{Store, decode, decode_all, encode};
use crate::error::Result;
use crate::model::PersonalBest;
use crate::model::enums::{Game, Playtype};

impl Store {
    /// Replaces the PB for (user, chart) as a single atomic row write.
    pub async fn upsert_pb(&self, pb: &PersonalBest) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO personal_bests (user_id, chart_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(pb.user_id)
        .bind(&pb.chart_id)
        .bind(pb.game.to_string())
        .bind(pb.playtype.to_string())
        .bind(encode(pb)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_pb(&self, user_id: i64, chart_id: &str) -> Result<Option<PersonalBest>> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT data FROM personal_bests WHERE user_id = ?1 AND chart_id = ?2",
        )
        .bind(user_id)
        .bind(chart_id)
        .fetch_optional(&self.pool)
        .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn delete_pb(&self, user_id: i64, chart_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM personal_bests WHERE user_id = ?1 AND chart_id = ?2")
            .bind(user_id)
            .bind(chart_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn pbs_for_chart(&self, chart_id: &str) -> Result<Vec<PersonalBest>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT data FROM personal_bests WHERE chart_id = ?1")
                .bind(chart_id)
                .fetch_all(&self.pool)
                .await?;

        decode_all(rows)
    }

    pub async fn pbs_for_user(
        &self,
        user_id: i64,
        game: Game,
        playtype: Playtype,
    ) -> Result<Vec<PersonalBest>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT data FROM personal_bests
             WHERE user_id = ?1 AND game = ?2 AND playtype = ?3",
        )
        .bind(user_id)
        .bind(game.to_string())
        .bind(playtype.to_string())
        .fetch_all(&self.pool)
        .await?;

        decode_all(rows)
    }

    pub async fn pbs_for_user_on_charts(
        &self,
        user_id: i64,
        chart_ids: &[String],
    ) -> Result<Vec<PersonalBest>> {
        let mut pbs = Vec::new();

        for chart_id in chart_ids {
            if let Some(pb) = self.get_pb(user_id, chart_id).await? {
                pbs.push(pb);
            }
        }

        Ok(pbs)
    }
}
