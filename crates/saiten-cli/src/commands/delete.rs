//! Delete command: removes one score and repairs everything derived.

use anyhow::Result;

use saiten_core::Context;
use saiten_core::mutation::delete_score;

pub async fn run(ctx: &Context, score_id: &str, blacklist: bool) -> Result<()> {
    let Some(score) = ctx.store.get_score(score_id).await? else {
        println!("Score {score_id} does not exist.");
        return Ok(());
    };

    delete_score(ctx, &score, blacklist).await?;

    println!("Deleted {score_id}.");
    if blacklist {
        println!("Content blacklisted; identical re-imports will be skipped.");
    }

    Ok(())
}
