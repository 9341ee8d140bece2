use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::context::Context;
use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::{BlacklistEntry, Score};
use crate::pb::{recompute_pb, update_chart_ranking, update_rival_rankings};
use crate::session::rebuild_from_members;
use crate::stats::update_user_game_stats;
use crate::targets::{update_user_goals, update_user_quests};

/// Deletes one score and repairs everything that referenced it.
///
/// Sessions and imports shrink or disappear with it, the PB is recomputed
/// from the surviving scores, and the chart reranked. Goals are not
/// re-evaluated here; batch entry points do that once per batch.
pub async fn delete_score(ctx: &Context, score: &Score, blacklist: bool) -> Result<()> {
    ctx.store.delete_score_doc(&score.score_id).await?;

    remove_from_sessions(ctx, score).await?;
    remove_from_imports(ctx, score).await?;

    recompute_pb(ctx, score.user_id, &score.chart_id).await?;
    update_chart_ranking(ctx, &score.chart_id).await?;

    let chart: HashSet<String> = [score.chart_id.clone()].into();
    update_rival_rankings(ctx, score.user_id, score.game, score.playtype, &chart).await?;

    update_user_game_stats(ctx, score.user_id, score.game, score.playtype).await?;

    if blacklist {
        blacklist_score(ctx, score).await?;
    }

    info!("Deleted score {} for user {}.", score.score_id, score.user_id);

    Ok(())
}

/// Deletes a batch of scores with one derived-data pass per affected
/// (user, chart) and (user, game, playtype), rather than a full cascade
/// per score. The end state matches deleting them one by one; goals and
/// quests are additionally re-evaluated, once per user and game variant.
pub async fn delete_multiple_scores(
    ctx: &Context,
    scores: &[Score],
    blacklist: bool,
) -> Result<()> {
    if scores.is_empty() {
        return Ok(());
    }

    for score in scores {
        ctx.store.delete_score_doc(&score.score_id).await?;
        remove_from_sessions(ctx, score).await?;
        remove_from_imports(ctx, score).await?;

        if blacklist {
            blacklist_score(ctx, score).await?;
        }
    }

    let user_charts: HashSet<(i64, String)> = scores
        .iter()
        .map(|s| (s.user_id, s.chart_id.clone()))
        .collect();

    for (user_id, chart_id) in &user_charts {
        recompute_pb(ctx, *user_id, chart_id).await?;
    }

    let charts: HashSet<&String> = scores.iter().map(|s| &s.chart_id).collect();
    for chart_id in charts {
        update_chart_ranking(ctx, chart_id).await?;
    }

    let mut variants: HashMap<(i64, Game, Playtype), HashSet<String>> = HashMap::new();
    for score in scores {
        variants
            .entry((score.user_id, score.game, score.playtype))
            .or_default()
            .insert(score.chart_id.clone());
    }

    for ((user_id, game, playtype), touched) in &variants {
        update_rival_rankings(ctx, *user_id, *game, *playtype, touched).await?;

        let goal_info = update_user_goals(ctx, *user_id, *game, touched).await?;
        update_user_quests(ctx, *user_id, *game, &goal_info).await?;

        update_user_game_stats(ctx, *user_id, *game, *playtype).await?;
    }

    info!("Deleted {} scores.", scores.len());

    Ok(())
}

/// Undoes an entire import by deleting every score it inserted, then the
/// ledger entry itself. A missing import is already reverted.
pub async fn revert_import(ctx: &Context, import_id: &str) -> Result<()> {
    let Some(import) = ctx.store.get_import(import_id).await? else {
        warn!("Asked to revert import {import_id}, but it does not exist.");
        return Ok(());
    };

    let scores = ctx.store.get_scores(&import.score_ids).await?;

    if scores.len() != import.score_ids.len() {
        warn!(
            "Import {import_id} lists {} scores but only {} still exist.",
            import.score_ids.len(),
            scores.len()
        );
    }

    delete_multiple_scores(ctx, &scores, false).await?;

    // The per-score import pulls usually remove the ledger entry already;
    // this covers imports whose scores were all gone.
    ctx.store.delete_import(import_id).await?;

    info!("Reverted import {import_id}.");

    Ok(())
}

/// Pulls the score out of every session of its user that contains it. A
/// session losing its last member is deleted, never left empty.
pub(crate) async fn remove_from_sessions(ctx: &Context, score: &Score) -> Result<()> {
    let sessions = ctx
        .store
        .sessions_containing_score(score.user_id, &score.score_id)
        .await?;

    for mut session in sessions {
        if session.score_ids.len() == 1 {
            ctx.store.delete_session(&session.session_id).await?;
            continue;
        }

        session.score_ids.retain(|id| id != &score.score_id);
        let members = ctx.store.get_scores(&session.score_ids).await?;

        if members.is_empty() {
            ctx.store.delete_session(&session.session_id).await?;
            continue;
        }

        rebuild_from_members(&mut session, members);
        ctx.store.upsert_session(&session).await?;
    }

    Ok(())
}

/// Pulls the score out of the import ledger. An import losing its last
/// score is deleted, keeping the no-empty-imports invariant.
pub(crate) async fn remove_from_imports(ctx: &Context, score: &Score) -> Result<()> {
    let imports = ctx
        .store
        .imports_containing_score(score.user_id, &score.score_id)
        .await?;

    for mut import in imports {
        if import.score_ids.len() == 1 {
            ctx.store.delete_import(&import.import_id).await?;
            continue;
        }

        import.score_ids.retain(|id| id != &score.score_id);
        ctx.store.upsert_import(&import).await?;
    }

    Ok(())
}

async fn blacklist_score(ctx: &Context, score: &Score) -> Result<()> {
    if ctx
        .store
        .is_blacklisted(score.user_id, &score.score_id)
        .await?
    {
        return Ok(());
    }

    ctx.store
        .insert_blacklist(&BlacklistEntry {
            user_id: score.user_id,
            score_id: score.score_id.clone(),
            score: score.clone(),
        })
        .await
}
