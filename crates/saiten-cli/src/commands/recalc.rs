//! Recalc command: rebuilds every derived document for one user and game
//! variant from their raw scores. The repair path when aggregates have
//! gone stale (interrupted cascade, manual database surgery).

use anyhow::Result;
use std::collections::HashSet;

use saiten_core::Context;
use saiten_core::model::enums::{Game, Playtype};
use saiten_core::pb::{process_pbs, update_chart_ranking, update_rival_rankings};
use saiten_core::session::recalc_sessions;
use saiten_core::stats::update_user_game_stats;

pub async fn run(ctx: &Context, user: i64, game: Game, playtype: Playtype) -> Result<()> {
    let chart_ids: HashSet<String> = ctx
        .store
        .scored_charts_for_user(user, game, playtype)
        .await?
        .into_iter()
        .collect();

    println!("Recomputing {} charts for user {user}.", chart_ids.len());

    process_pbs(ctx, user, &chart_ids).await?;

    for chart_id in &chart_ids {
        update_chart_ranking(ctx, chart_id).await?;
    }

    update_rival_rankings(ctx, user, game, playtype, &chart_ids).await?;

    let session_ids: Vec<String> = ctx
        .store
        .sessions_for_user(user, game, playtype)
        .await?
        .into_iter()
        .map(|s| s.session_id)
        .collect();
    recalc_sessions(ctx, &session_ids).await?;

    let deltas = update_user_game_stats(ctx, user, game, playtype).await?;
    for delta in &deltas {
        println!("Class {}: {:?} -> {}", delta.set, delta.old, delta.new);
    }

    println!("Recalc complete.");

    Ok(())
}
