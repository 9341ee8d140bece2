//! Goal and quest behavior: construction rules, subscription outcomes and
//! the re-evaluation that runs inside the import and delete cascades.

mod common;

use common::{incoming, seeded_context, USER_MAIN};
use saiten_core::events::Event;
use saiten_core::model::enums::{Game, Lamp, Metric, Playtype};
use saiten_core::model::{GoalCharts, GoalCriteria, GoalMode};
use saiten_core::mutation::{delete_multiple_scores, import_scores};
use saiten_core::targets::{
    construct_goal, construct_quest, subscribe_to_goal, subscribe_to_quest, SubscribeGoalResult,
};
use saiten_core::Context;

fn percent_criteria(value: f64) -> GoalCriteria {
    GoalCriteria {
        key: Metric::Percent,
        value,
        mode: GoalMode::Single,
        count_num: None,
    }
}

async fn single_chart_goal(ctx: &Context, chart_id: &str, value: f64) -> saiten_core::model::Goal {
    construct_goal(
        ctx,
        Game::Iidx,
        Playtype::Single,
        format!("{value}% on {chart_id}"),
        GoalCharts::Single(chart_id.to_string()),
        percent_criteria(value),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn construct_goal_rejects_bad_criteria() {
    let (ctx, _) = seeded_context().await;

    // Single mode never takes a countNum.
    let result = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "bad".into(),
        GoalCharts::Single("chart-a".into()),
        GoalCriteria {
            key: Metric::Percent,
            value: 90.0,
            mode: GoalMode::Single,
            count_num: Some(1.0),
        },
    )
    .await;
    assert!(result.is_err());

    // Absolute countNum cannot exceed the chart set.
    let result = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "bad".into(),
        GoalCharts::Folder("folder-all".into()),
        GoalCriteria {
            key: Metric::Percent,
            value: 90.0,
            mode: GoalMode::Absolute,
            count_num: Some(4.0),
        },
    )
    .await;
    assert!(result.is_err());

    // Proportion must be in (0, 1].
    let result = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "bad".into(),
        GoalCharts::Folder("folder-all".into()),
        GoalCriteria {
            key: Metric::Percent,
            value: 90.0,
            mode: GoalMode::Proportion,
            count_num: Some(1.5),
        },
    )
    .await;
    assert!(result.is_err());

    // A multi goal over one chart should have been a single goal.
    let result = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "bad".into(),
        GoalCharts::Multi(vec!["chart-a".into()]),
        percent_criteria(90.0),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn subscribing_before_any_play_starts_unachieved() {
    let (ctx, _) = seeded_context().await;
    let goal = single_chart_goal(&ctx, "chart-a", 90.0).await;

    let result = subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();

    match result {
        SubscribeGoalResult::Subscribed(sub) => {
            assert_eq!(sub.progress, None);
            assert_eq!(sub.out_of, 90.0);
            assert!(!sub.achieved);
            assert!(!sub.was_instantly_achieved);
        }
        other => panic!("expected a subscription, got {other:?}"),
    }

    let again = subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();
    assert!(matches!(again, SubscribeGoalResult::AlreadySubscribed));
}

#[tokio::test]
async fn achieving_a_goal_updates_the_sub_and_emits() {
    let (ctx, sink) = seeded_context().await;
    let goal = single_chart_goal(&ctx, "chart-a", 90.0).await;
    subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();

    let result = import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-a", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    assert_eq!(result.goal_info.len(), 1);
    assert_eq!(result.goal_info[0].goal_id, goal.goal_id);
    assert!(result.goal_info[0].new.achieved);

    let sub = ctx
        .store
        .get_goal_sub(&goal.goal_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert!(sub.achieved);
    assert_eq!(sub.progress, Some(95.0));
    assert!(sub.time_achieved.is_some());
    assert!(sub.last_interaction.is_some());

    let events = sink.drain();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::GoalAchieved { goal_id, user_id, .. }
            if goal_id == &goal.goal_id && *user_id == USER_MAIN
    )));
}

#[tokio::test]
async fn instantly_achieved_goal_can_be_declined() {
    let (ctx, _) = seeded_context().await;

    import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-a", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    let goal = single_chart_goal(&ctx, "chart-a", 90.0).await;

    let declined = subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();
    assert!(matches!(declined, SubscribeGoalResult::AlreadyAchieved));

    let accepted = subscribe_to_goal(&ctx, USER_MAIN, &goal, false).await.unwrap();
    match accepted {
        SubscribeGoalResult::Subscribed(sub) => {
            assert!(sub.achieved);
            assert!(sub.was_instantly_achieved);
            assert!(sub.time_achieved.is_some());
        }
        other => panic!("expected a subscription, got {other:?}"),
    }
}

#[tokio::test]
async fn absolute_folder_goal_counts_qualifying_charts() {
    let (ctx, _) = seeded_context().await;

    let goal = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "Clear 2 of the folder".into(),
        GoalCharts::Folder("folder-all".into()),
        GoalCriteria {
            key: Metric::Lamp,
            value: f64::from(Lamp::Clear.index()),
            mode: GoalMode::Absolute,
            count_num: Some(2.0),
        },
    )
    .await
    .unwrap();
    subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();

    import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-a", 80.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    let sub = ctx
        .store
        .get_goal_sub(&goal.goal_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.progress, Some(1.0));
    assert_eq!(sub.out_of, 2.0);
    assert!(!sub.achieved);

    import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-b", 75.0, Lamp::HardClear, None)],
    )
    .await
    .unwrap();

    let sub = ctx
        .store
        .get_goal_sub(&goal.goal_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.progress, Some(2.0));
    assert!(sub.achieved);
}

#[tokio::test]
async fn proportion_goal_scales_with_the_folder() {
    let (ctx, _) = seeded_context().await;

    let goal = construct_goal(
        &ctx,
        Game::Iidx,
        Playtype::Single,
        "Clear the whole folder".into(),
        GoalCharts::Folder("folder-all".into()),
        GoalCriteria {
            key: Metric::Lamp,
            value: f64::from(Lamp::Clear.index()),
            mode: GoalMode::Proportion,
            count_num: Some(1.0),
        },
    )
    .await
    .unwrap();

    let result = subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();
    match result {
        SubscribeGoalResult::Subscribed(sub) => {
            // The folder has three charts, so full proportion means all 3.
            assert_eq!(sub.out_of, 3.0);
            assert_eq!(sub.progress, Some(0.0));
        }
        other => panic!("expected a subscription, got {other:?}"),
    }
}

#[tokio::test]
async fn quest_progress_counts_achieved_goals() {
    let (ctx, sink) = seeded_context().await;

    let goal_a = single_chart_goal(&ctx, "chart-a", 90.0).await;
    let goal_b = single_chart_goal(&ctx, "chart-b", 90.0).await;
    ctx.store.upsert_goal(&goal_a).await.unwrap();
    ctx.store.upsert_goal(&goal_b).await.unwrap();

    let quest = construct_quest(
        Game::Iidx,
        Playtype::Single,
        "Both charts".into(),
        None,
        vec![goal_a.goal_id.clone(), goal_b.goal_id.clone()],
    )
    .unwrap();

    let sub = subscribe_to_quest(&ctx, USER_MAIN, &quest).await.unwrap();
    assert_eq!(sub.progress, 0);
    assert!(!sub.achieved);

    import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-a", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    let sub = ctx
        .store
        .get_quest_sub(&quest.quest_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.progress, 1);
    assert!(!sub.achieved);

    let result = import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-b", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    assert_eq!(result.quest_info.len(), 1);
    assert!(result.quest_info[0].new.achieved);

    let sub = ctx
        .store
        .get_quest_sub(&quest.quest_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sub.progress, 2);
    assert!(sub.achieved);
    assert!(sub.time_achieved.is_some());

    let events = sink.drain();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::QuestAchieved { quest_id, .. } if quest_id == &quest.quest_id
    )));
}

#[tokio::test]
async fn deletion_regresses_goals_and_quests() {
    let (ctx, _) = seeded_context().await;

    let goal = single_chart_goal(&ctx, "chart-a", 90.0).await;
    subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();

    let result = import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-a", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    delete_multiple_scores(&ctx, &result.created, false)
        .await
        .unwrap();

    let sub = ctx
        .store
        .get_goal_sub(&goal.goal_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert!(!sub.achieved);
    assert_eq!(sub.progress, None);
    assert!(sub.time_achieved.is_none());
    assert!(!sub.was_instantly_achieved);
}

#[tokio::test]
async fn unrelated_imports_leave_goals_untouched() {
    let (ctx, sink) = seeded_context().await;

    let goal = single_chart_goal(&ctx, "chart-a", 90.0).await;
    subscribe_to_goal(&ctx, USER_MAIN, &goal, true).await.unwrap();

    let result = import_scores(
        &ctx,
        USER_MAIN,
        Game::Iidx,
        vec![incoming("chart-b", 95.0, Lamp::Clear, None)],
    )
    .await
    .unwrap();

    assert!(result.goal_info.is_empty());
    assert!(result.quest_info.is_empty());

    let sub = ctx
        .store
        .get_goal_sub(&goal.goal_id, USER_MAIN)
        .await
        .unwrap()
        .unwrap();
    assert!(sub.last_interaction.is_none());
    assert!(sink.is_empty());
}
