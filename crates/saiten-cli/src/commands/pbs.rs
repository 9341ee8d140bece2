//! Pbs command: prints a user's personal bests for one game variant.

use anyhow::Result;

use saiten_core::Context;
use saiten_core::model::enums::{Game, Playtype};

pub async fn run(ctx: &Context, user: i64, game: Game, playtype: Playtype) -> Result<()> {
    let mut pbs = ctx.store.pbs_for_user(user, game, playtype).await?;

    if pbs.is_empty() {
        println!("No personal bests for user {user} on {game} {playtype}.");
        return Ok(());
    }

    pbs.sort_by(|a, b| a.chart_id.cmp(&b.chart_id));

    for pb in &pbs {
        println!(
            "{}  {:>7.2}%  {:<14}  rank {}/{}",
            pb.chart_id,
            pb.score_data.percent,
            pb.score_data.lamp.to_string(),
            pb.ranking_data.rank,
            pb.ranking_data.out_of
        );
    }

    if let Some(stats) = ctx.store.get_user_game_stats(user, game, playtype).await? {
        println!("Profile rating: {:.2}", stats.rating);
        for (set, value) in &stats.classes {
            println!("Class {set}: {value}");
        }
    }

    Ok(())
}
