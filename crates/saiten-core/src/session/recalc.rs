use tracing::{info, warn};

use crate::context::Context;
use crate::error::Result;
use crate::session::rebuild_from_members;

/// Recalculates sessions after their member set changed.
///
/// Member scoreIDs that no longer resolve are dropped with a warning, so a
/// session that references deleted scores heals itself here. A session left
/// with no members is deleted outright.
pub async fn recalc_sessions(ctx: &Context, session_ids: &[String]) -> Result<()> {
    for session_id in session_ids {
        let Some(mut session) = ctx.store.get_session(session_id).await? else {
            warn!("Asked to recalc session {session_id}, but it does not exist. Skipping.");
            continue;
        };

        let members = ctx.store.get_scores(&session.score_ids).await?;

        if members.len() != session.score_ids.len() {
            warn!(
                "Session {session_id} referenced {} scores but only {} resolve. Dropping the rest.",
                session.score_ids.len(),
                members.len()
            );
        }

        if members.is_empty() {
            info!("Session {session_id} has no members left, deleting it.");
            ctx.store.delete_session(session_id).await?;
            continue;
        }

        rebuild_from_members(&mut session, members);
        ctx.store.upsert_session(&session).await?;
    }

    Ok(())
}
