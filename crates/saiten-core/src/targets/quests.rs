use tracing::{info, warn};

use crate::clock::now_ms;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::events::Event;
use crate::model::enums::{Game, Playtype};
use crate::model::{GoalDelta, Quest, QuestDelta, QuestState, QuestSubscription};
use crate::targets::goals::subscribe_to_goal;

/// Deterministic quest identity over its goal list.
pub fn create_quest_id(game: Game, playtype: Playtype, goal_ids: &[String]) -> String {
    let input = format!("{game}|{playtype}|{}", goal_ids.join(","));
    format!("Q{:x}", md5::compute(input))
}

/// Validates and builds a quest document. Does not persist it.
pub fn construct_quest(
    game: Game,
    playtype: Playtype,
    name: String,
    desc: Option<String>,
    goal_ids: Vec<String>,
) -> Result<Quest> {
    if goal_ids.is_empty() {
        return Err(Error::InvalidGoal(
            "A quest must reference at least one goal.".to_string(),
        ));
    }

    Ok(Quest {
        quest_id: create_quest_id(game, playtype, &goal_ids),
        game,
        playtype,
        name,
        desc,
        goal_ids,
    })
}

/// Subscribes a user to a quest, auto-subscribing them to every referenced
/// goal they are not on yet. Already-achieved goals still get a
/// subscription here, as the quest needs them tracked.
pub async fn subscribe_to_quest(
    ctx: &Context,
    user_id: i64,
    quest: &Quest,
) -> Result<QuestSubscription> {
    let goals = ctx.store.get_goals(&quest.goal_ids).await?;

    if goals.len() != quest.goal_ids.len() {
        warn!(
            "Quest {} references {} goals but only {} exist.",
            quest.quest_id,
            quest.goal_ids.len(),
            goals.len()
        );
    }

    for goal in &goals {
        subscribe_to_goal(ctx, user_id, goal, false).await?;
    }

    let progress = quest_progress(ctx, user_id, quest).await?;
    let achieved = progress as usize == quest.goal_ids.len();
    let now = now_ms();

    let sub = QuestSubscription {
        quest_id: quest.quest_id.clone(),
        user_id,
        game: quest.game,
        playtype: quest.playtype,
        progress,
        achieved,
        time_set: now,
        time_achieved: achieved.then_some(now),
        last_interaction: None,
    };

    ctx.store.upsert_quest(quest).await?;
    ctx.store.upsert_quest_sub(&sub).await?;

    Ok(sub)
}

/// Refreshes the user's quest subscriptions after their goals changed.
///
/// Only quests referencing a goal in `goal_deltas` are touched. Progress
/// is always recounted from the stored goal subscriptions, never inferred
/// from the deltas, so a quest can never drift from its goals.
pub async fn update_user_quests(
    ctx: &Context,
    user_id: i64,
    game: Game,
    goal_deltas: &[GoalDelta],
) -> Result<Vec<QuestDelta>> {
    if goal_deltas.is_empty() {
        return Ok(Vec::new());
    }

    let changed_goals: Vec<&str> = goal_deltas.iter().map(|d| d.goal_id.as_str()).collect();
    let subs = ctx.store.quest_subs_for_user(user_id, game).await?;
    let mut deltas = Vec::new();

    for sub in subs {
        let Some(quest) = ctx.store.get_quest(&sub.quest_id).await? else {
            warn!(
                "Subscription to quest {} has no quest document. Skipping.",
                sub.quest_id
            );
            continue;
        };

        if !quest
            .goal_ids
            .iter()
            .any(|id| changed_goals.contains(&id.as_str()))
        {
            continue;
        }

        let old = QuestState {
            progress: sub.progress,
            achieved: sub.achieved,
        };

        let progress = quest_progress(ctx, user_id, &quest).await?;
        let achieved = progress as usize == quest.goal_ids.len();
        let new = QuestState { progress, achieved };

        if new == old {
            continue;
        }

        let now = now_ms();
        let mut updated = sub;
        updated.progress = progress;
        updated.achieved = achieved;
        updated.last_interaction = Some(now);

        match (old.achieved, achieved) {
            (false, true) => {
                updated.time_achieved = Some(now);

                info!("User {user_id} achieved quest {}.", quest.quest_id);

                let event = Event::QuestAchieved {
                    user_id,
                    quest_id: quest.quest_id.clone(),
                    game: quest.game,
                    playtype: quest.playtype,
                    old,
                    new,
                };
                if let Err(err) = ctx.events.emit(event) {
                    warn!(
                        "Failed to emit quest achievement for {}: {err}.",
                        quest.quest_id
                    );
                }
            }
            (true, false) => {
                updated.time_achieved = None;
            }
            _ => {}
        }

        ctx.store.upsert_quest_sub(&updated).await?;

        deltas.push(QuestDelta {
            quest_id: quest.quest_id,
            old,
            new,
        });
    }

    Ok(deltas)
}

/// The count of the quest's goals the user has currently achieved.
async fn quest_progress(ctx: &Context, user_id: i64, quest: &Quest) -> Result<u32> {
    let mut progress = 0;

    for goal_id in &quest.goal_ids {
        if let Some(goal_sub) = ctx.store.get_goal_sub(goal_id, user_id).await?
            && goal_sub.achieved
        {
            progress += 1;
        }
    }

    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_id_is_deterministic() {
        let goals = vec!["Ga".to_string(), "Gb".to_string()];

        let a = create_quest_id(Game::Iidx, Playtype::Single, &goals);
        let b = create_quest_id(Game::Iidx, Playtype::Single, &goals);

        assert_eq!(a, b);
        assert!(a.starts_with('Q'));
    }

    #[test]
    fn test_quest_id_is_order_sensitive() {
        let forward = vec!["Ga".to_string(), "Gb".to_string()];
        let reverse = vec!["Gb".to_string(), "Ga".to_string()];

        assert_ne!(
            create_quest_id(Game::Iidx, Playtype::Single, &forward),
            create_quest_id(Game::Iidx, Playtype::Single, &reverse)
        );
    }

    #[test]
    fn test_construct_quest_rejects_empty_goal_list() {
        let result = construct_quest(
            Game::Iidx,
            Playtype::Single,
            "Empty".to_string(),
            None,
            Vec::new(),
        );

        assert!(result.is_err());
    }
}
