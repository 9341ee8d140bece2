use std::collections::HashSet;
use tracing::{info, warn};

use crate::clock::now_ms;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::events::Event;
use crate::model::enums::{Game, Playtype};
use crate::model::{Goal, GoalCharts, GoalCriteria, GoalDelta, GoalMode, GoalSubscription, TargetState};

/// Deterministic goal identity over the goal's semantic content, so two
/// users creating "the same" goal share one document.
pub fn create_goal_id(
    game: Game,
    playtype: Playtype,
    charts: &GoalCharts,
    criteria: &GoalCriteria,
) -> Result<String> {
    let input = format!(
        "{game}|{playtype}|{}|{}",
        serde_json::to_string(charts)?,
        serde_json::to_string(criteria)?,
    );

    Ok(format!("G{:x}", md5::compute(input)))
}

/// Validates and builds a goal document. Does not persist it.
pub async fn construct_goal(
    ctx: &Context,
    game: Game,
    playtype: Playtype,
    name: String,
    charts: GoalCharts,
    criteria: GoalCriteria,
) -> Result<Goal> {
    if !ctx.games.supports(game, playtype) {
        return Err(Error::InvalidGoal(format!(
            "{game} does not support playtype {playtype}."
        )));
    }

    validate_criteria(ctx, &charts, &criteria).await?;

    Ok(Goal {
        goal_id: create_goal_id(game, playtype, &charts, &criteria)?,
        game,
        playtype,
        name,
        charts,
        criteria,
        time_added: now_ms(),
    })
}

async fn validate_criteria(
    ctx: &Context,
    charts: &GoalCharts,
    criteria: &GoalCriteria,
) -> Result<()> {
    if let GoalCharts::Multi(chart_ids) = charts
        && chart_ids.len() < 2
    {
        return Err(Error::InvalidGoal(
            "A multi goal must cover at least two charts.".to_string(),
        ));
    }

    match criteria.mode {
        GoalMode::Single => {
            if !matches!(charts, GoalCharts::Single(_)) {
                return Err(Error::InvalidGoal(
                    "Single mode requires a single-chart goal.".to_string(),
                ));
            }
            if criteria.count_num.is_some() {
                return Err(Error::InvalidGoal(
                    "countNum is forbidden for single mode.".to_string(),
                ));
            }
        }
        GoalMode::Absolute => {
            let Some(count) = criteria.count_num else {
                return Err(Error::InvalidGoal(
                    "Absolute mode requires countNum.".to_string(),
                ));
            };
            if count.fract() != 0.0 || count < 1.0 {
                return Err(Error::InvalidGoal(format!(
                    "Absolute countNum must be an integer >= 1, got {count}."
                )));
            }

            let chart_count = resolve_goal_charts(ctx, charts).await?.len();
            if count as usize > chart_count {
                return Err(Error::InvalidGoal(format!(
                    "Absolute countNum {count} exceeds the goal's {chart_count} charts."
                )));
            }
        }
        GoalMode::Proportion => {
            let Some(ratio) = criteria.count_num else {
                return Err(Error::InvalidGoal(
                    "Proportion mode requires countNum.".to_string(),
                ));
            };
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::InvalidGoal(format!(
                    "Proportion countNum must be in (0, 1], got {ratio}."
                )));
            }
        }
    }

    Ok(())
}

/// The concrete chartIDs a goal ranges over. A folder goal pointing at a
/// missing folder is a fatal reference error.
pub async fn resolve_goal_charts(ctx: &Context, charts: &GoalCharts) -> Result<Vec<String>> {
    match charts {
        GoalCharts::Single(chart_id) => Ok(vec![chart_id.clone()]),
        GoalCharts::Multi(chart_ids) => Ok(chart_ids.clone()),
        GoalCharts::Folder(folder_id) => {
            let folder = ctx
                .store
                .get_folder(folder_id)
                .await?
                .ok_or_else(|| Error::FolderNotFound(folder_id.clone()))?;

            Ok(folder.chart_ids)
        }
    }
}

/// Evaluates a goal against a user's current PBs.
///
/// Single mode: progress is the PB's value on the criteria metric (None
/// with no PB), outOf is the threshold. Absolute and proportion modes:
/// progress is the count of qualifying charts, outOf the required count.
pub async fn evaluate_goal_for_user(
    ctx: &Context,
    goal: &Goal,
    user_id: i64,
) -> Result<TargetState> {
    let chart_ids = resolve_goal_charts(ctx, &goal.charts).await?;
    let pbs = ctx.store.pbs_for_user_on_charts(user_id, &chart_ids).await?;

    match goal.criteria.mode {
        GoalMode::Single => {
            let progress = pbs
                .first()
                .map(|pb| pb.score_data.metric_value(goal.criteria.key));

            Ok(TargetState {
                progress,
                out_of: goal.criteria.value,
                achieved: progress.is_some_and(|p| p >= goal.criteria.value),
            })
        }
        GoalMode::Absolute | GoalMode::Proportion => {
            let qualifying = pbs
                .iter()
                .filter(|pb| pb.score_data.metric_value(goal.criteria.key) >= goal.criteria.value)
                .count() as f64;

            let count_num = goal.criteria.count_num.unwrap_or(1.0);
            let out_of = match goal.criteria.mode {
                GoalMode::Proportion => (count_num * chart_ids.len() as f64).floor().max(1.0),
                _ => count_num,
            };

            Ok(TargetState {
                progress: Some(qualifying),
                out_of,
                achieved: qualifying >= out_of,
            })
        }
    }
}

/// Outcome of a subscription attempt.
#[derive(Debug, Clone)]
pub enum SubscribeGoalResult {
    Subscribed(GoalSubscription),
    AlreadySubscribed,
    /// The user already meets the goal and asked not to subscribe to
    /// instantly-achieved goals.
    AlreadyAchieved,
}

/// Subscribes a user to a goal, evaluating it immediately so the
/// subscription is born consistent with their PBs.
pub async fn subscribe_to_goal(
    ctx: &Context,
    user_id: i64,
    goal: &Goal,
    cancel_if_achieved: bool,
) -> Result<SubscribeGoalResult> {
    if ctx.store.get_goal_sub(&goal.goal_id, user_id).await?.is_some() {
        return Ok(SubscribeGoalResult::AlreadySubscribed);
    }

    let state = evaluate_goal_for_user(ctx, goal, user_id).await?;

    if state.achieved && cancel_if_achieved {
        return Ok(SubscribeGoalResult::AlreadyAchieved);
    }

    let now = now_ms();
    let sub = GoalSubscription {
        goal_id: goal.goal_id.clone(),
        user_id,
        game: goal.game,
        playtype: goal.playtype,
        progress: state.progress,
        out_of: state.out_of,
        achieved: state.achieved,
        time_set: now,
        time_achieved: state.achieved.then_some(now),
        last_interaction: None,
        was_instantly_achieved: state.achieved,
    };

    ctx.store.upsert_goal(goal).await?;
    ctx.store.upsert_goal_sub(&sub).await?;

    Ok(SubscribeGoalResult::Subscribed(sub))
}

/// Re-evaluates the user's goal subscriptions whose chart set intersects
/// the touched charts, returning a delta per subscription that actually
/// changed. Newly achieved goals emit an event; event failure is logged
/// and never poisons the cascade.
pub async fn update_user_goals(
    ctx: &Context,
    user_id: i64,
    game: Game,
    touched_charts: &HashSet<String>,
) -> Result<Vec<GoalDelta>> {
    if touched_charts.is_empty() {
        return Ok(Vec::new());
    }

    let subs = ctx.store.goal_subs_for_user(user_id, game).await?;
    let mut deltas = Vec::new();

    for sub in subs {
        match process_goal_sub(ctx, sub, touched_charts).await {
            Ok(Some(delta)) => deltas.push(delta),
            Ok(None) => {}
            Err(err) => {
                warn!("Failed to re-evaluate a goal for user {user_id}: {err}. Skipping.");
            }
        }
    }

    Ok(deltas)
}

async fn process_goal_sub(
    ctx: &Context,
    sub: GoalSubscription,
    touched_charts: &HashSet<String>,
) -> Result<Option<GoalDelta>> {
    let Some(goal) = ctx.store.get_goal(&sub.goal_id).await? else {
        warn!(
            "Subscription to goal {} has no goal document. Skipping.",
            sub.goal_id
        );
        return Ok(None);
    };

    let chart_ids = resolve_goal_charts(ctx, &goal.charts).await?;
    if !chart_ids.iter().any(|c| touched_charts.contains(c)) {
        return Ok(None);
    }

    let old = TargetState {
        progress: sub.progress,
        out_of: sub.out_of,
        achieved: sub.achieved,
    };
    let new = evaluate_goal_for_user(ctx, &goal, sub.user_id).await?;

    if new.progress == old.progress && new.out_of == old.out_of {
        return Ok(None);
    }

    let now = now_ms();
    let mut updated = sub;
    updated.progress = new.progress;
    updated.out_of = new.out_of;
    updated.achieved = new.achieved;
    updated.last_interaction = Some(now);

    match (old.achieved, new.achieved) {
        (false, true) => {
            updated.time_achieved = Some(now);

            info!("User {} achieved goal {}.", updated.user_id, goal.goal_id);

            let event = Event::GoalAchieved {
                user_id: updated.user_id,
                goal_id: goal.goal_id.clone(),
                game: goal.game,
                playtype: goal.playtype,
                old,
                new,
            };
            if let Err(err) = ctx.events.emit(event) {
                warn!("Failed to emit goal achievement for {}: {err}.", goal.goal_id);
            }
        }
        (true, false) => {
            // Progress regressed below the threshold, typically after a
            // score deletion. The subscription reverts to unachieved.
            updated.time_achieved = None;
            updated.was_instantly_achieved = false;
        }
        _ => {}
    }

    ctx.store.upsert_goal_sub(&updated).await?;

    Ok(Some(GoalDelta {
        goal_id: goal.goal_id,
        old,
        new,
    }))
}
