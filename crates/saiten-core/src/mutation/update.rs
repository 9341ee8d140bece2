use std::collections::HashSet;
use tracing::{info, warn};

use crate::context::Context;
use crate::error::Result;
use crate::model::score::create_score_id;
use crate::model::{CalculatedData, Score};
use crate::mutation::delete::delete_score;
use crate::pb::{recompute_pb, update_chart_ranking, update_rival_rankings};
use crate::session::rebuild_from_members;
use crate::stats::update_user_game_stats;

/// Replaces a score's content with re-derived identity.
///
/// The scoreID is always recomputed from the new content; a caller-filled
/// id on `new` is ignored with a warning. Chart-derived fields and ratings
/// are re-derived too. Every referencing document is rewritten to the new
/// id, and both the old and new chart's derived data is repaired.
///
/// If a score with the new identity already exists, the old score is
/// deleted and the existing one wins; the content is already represented.
pub async fn update_score(ctx: &Context, old: &Score, mut new: Score) -> Result<Score> {
    ctx.store.require_user(old.user_id).await?;
    let chart = ctx.store.require_chart(&new.chart_id).await?;

    let new_id = create_score_id(old.user_id, &chart.chart_id, &new.score_data);
    if !new.score_id.is_empty() && new.score_id != new_id {
        warn!(
            "Caller-supplied scoreID {} does not match derived identity. Overwriting.",
            new.score_id
        );
    }

    new.score_id = new_id;
    new.user_id = old.user_id;
    new.game = chart.game;
    new.playtype = chart.playtype;
    new.song_id = chart.song_id;
    new.calculated_data = CalculatedData::derive(&chart, &new.score_data);

    if new.score_id == old.score_id {
        // Identity unchanged, so nothing references a stale id. Derived
        // data still moves if non-identity fields (timestamp etc) did.
        ctx.store.upsert_score(&new).await?;
        refresh_derived(ctx, old, &new).await?;
        return Ok(new);
    }

    if let Some(existing) = ctx.store.get_score(&new.score_id).await? {
        warn!(
            "Updating {} collides with existing score {}. Deleting the old score instead.",
            old.score_id, new.score_id
        );
        delete_score(ctx, old, false).await?;
        return Ok(existing);
    }

    ctx.store.upsert_score(&new).await?;
    ctx.store.delete_score_doc(&old.score_id).await?;

    rewrite_sessions(ctx, old, &new).await?;
    rewrite_imports(ctx, old, &new).await?;

    refresh_derived(ctx, old, &new).await?;

    info!("Updated score {} to {}.", old.score_id, new.score_id);

    Ok(new)
}

/// Repairs PBs, rankings and stats for every chart and variant the update
/// touched. Distinct old and new charts each get a pass.
async fn refresh_derived(ctx: &Context, old: &Score, new: &Score) -> Result<()> {
    let mut charts = HashSet::new();
    charts.insert(old.chart_id.clone());
    charts.insert(new.chart_id.clone());

    for chart_id in &charts {
        recompute_pb(ctx, old.user_id, chart_id).await?;
        update_chart_ranking(ctx, chart_id).await?;
    }

    update_rival_rankings(ctx, new.user_id, new.game, new.playtype, &charts).await?;
    update_user_game_stats(ctx, new.user_id, new.game, new.playtype).await?;

    if (old.game, old.playtype) != (new.game, new.playtype) {
        update_user_game_stats(ctx, old.user_id, old.game, old.playtype).await?;
    }

    Ok(())
}

/// Substitutes the new scoreID into sessions holding the old one. A score
/// that lost its timestamp can no longer sit in a session and is dropped
/// instead, deleting the session if that empties it.
async fn rewrite_sessions(ctx: &Context, old: &Score, new: &Score) -> Result<()> {
    let sessions = ctx
        .store
        .sessions_containing_score(old.user_id, &old.score_id)
        .await?;

    for mut session in sessions {
        session.score_ids.retain(|id| id != &old.score_id);

        if new.time_achieved.is_some() && new.playtype == session.playtype {
            session.score_ids.push(new.score_id.clone());
        }

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

async fn rewrite_imports(ctx: &Context, old: &Score, new: &Score) -> Result<()> {
    let imports = ctx
        .store
        .imports_containing_score(old.user_id, &old.score_id)
        .await?;

    for mut import in imports {
        for id in import.score_ids.iter_mut() {
            if id == &old.score_id {
                *id = new.score_id.clone();
            }
        }
        ctx.store.upsert_import(&import).await?;
    }

    Ok(())
}
