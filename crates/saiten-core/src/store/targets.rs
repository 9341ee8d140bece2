use super::{Store, decode, decode_all, encode};
use crate::error::Result;
use crate::model::enums::Game;
use crate::model::{Goal, GoalSubscription, Quest, QuestSubscription};

impl Store {
    pub async fn upsert_goal(&self, goal: &Goal) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO goals (goal_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&goal.goal_id)
        .bind(goal.game.to_string())
        .bind(goal.playtype.to_string())
        .bind(encode(goal)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM goals WHERE goal_id = ?1")
            .bind(goal_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn get_goals(&self, goal_ids: &[String]) -> Result<Vec<Goal>> {
        let mut goals = Vec::with_capacity(goal_ids.len());

        for goal_id in goal_ids {
            if let Some(goal) = self.get_goal(goal_id).await? {
                goals.push(goal);
            }
        }

        Ok(goals)
    }

    pub async fn upsert_goal_sub(&self, sub: &GoalSubscription) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO goal_subs (goal_id, user_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&sub.goal_id)
        .bind(sub.user_id)
        .bind(sub.game.to_string())
        .bind(sub.playtype.to_string())
        .bind(encode(sub)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_goal_sub(
        &self,
        goal_id: &str,
        user_id: i64,
    ) -> Result<Option<GoalSubscription>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT data FROM goal_subs WHERE goal_id = ?1 AND user_id = ?2")
                .bind(goal_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn goal_subs_for_user(
        &self,
        user_id: i64,
        game: Game,
    ) -> Result<Vec<GoalSubscription>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT data FROM goal_subs WHERE user_id = ?1 AND game = ?2")
                .bind(user_id)
                .bind(game.to_string())
                .fetch_all(&self.pool)
                .await?;

        decode_all(rows)
    }

    pub async fn upsert_quest(&self, quest: &Quest) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO quests (quest_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&quest.quest_id)
        .bind(quest.game.to_string())
        .bind(quest.playtype.to_string())
        .bind(encode(quest)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_quest(&self, quest_id: &str) -> Result<Option<Quest>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT data FROM quests WHERE quest_id = ?1")
            .bind(quest_id)
            .fetch_optional(&self.pool)
            .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn upsert_quest_sub(&self, sub: &QuestSubscription) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO quest_subs (quest_id, user_id, game, playtype, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&sub.quest_id)
        .bind(sub.user_id)
        .bind(sub.game.to_string())
        .bind(sub.playtype.to_string())
        .bind(encode(sub)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_quest_sub(
        &self,
        quest_id: &str,
        user_id: i64,
    ) -> Result<Option<QuestSubscription>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT data FROM quest_subs WHERE quest_id = ?1 AND user_id = ?2")
                .bind(quest_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        raw.as_deref().map(decode).transpose()
    }

    pub async fn quest_subs_for_user(
        &self,
        user_id: i64,
        game: Game,
    ) -> Result<Vec<QuestSubscription>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT data FROM quest_subs WHERE user_id = ?1 AND game = ?2")
                .bind(user_id)
                .bind(game.to_string())
                .fetch_all(&self.pool)
                .await?;

        decode_all(rows)
    }
}
