use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::Result;
use crate::model::enums::{Game, Metric, Playtype};

/// Recomputes rank and outOf for every PB on a chart in one full pass.
///
/// A PB's rank is 1 plus the number of PBs strictly better on the game's
/// primary metric, so equal values share a rank. Writes are one row per PB
/// with no cross-document locking; a reader racing this pass can observe a
/// mix of old and new ranks, which the next pass corrects.
pub async fn update_chart_ranking(ctx: &Context, chart_id: &str) -> Result<()> {
    let pbs = ctx.store.pbs_for_chart(chart_id).await?;

    if pbs.is_empty() {
        return Ok(());
    }

    let metric = ctx.games.primary_metric(pbs[0].game, pbs[0].playtype);
    let out_of = pbs.len() as u32;

    for pb in &pbs {
        let value = pb.score_data.metric_value(metric);
        let better = pbs
            .iter()
            .filter(|other| other.score_data.metric_value(metric) > value)
            .count() as u32;

        let mut updated = pb.clone();
        updated.ranking_data.rank = 1 + better;
        updated.ranking_data.out_of = out_of;

        ctx.store.upsert_pb(&updated).await?;
    }

    debug!("Reranked {out_of} PBs on {chart_id}.");

    Ok(())
}

/// Refreshes rivalRank on the user's PBs for every chart in the set,
/// against the user's declared rivals.
///
/// Eventually consistent by design: a rival's concurrent write can leave a
/// stale rivalRank until either side's next recompute touches the chart.
pub async fn update_rival_rankings(
    ctx: &Context,
    user_id: i64,
    game: Game,
    playtype: Playtype,
    chart_ids: &HashSet<String>,
) -> Result<()> {
    let rival_ids = ctx.store.get_rivals(user_id, game, playtype).await?;

    if rival_ids.is_empty() {
        return Ok(());
    }

    let metric = ctx.games.primary_metric(game, playtype);

    let futures = chart_ids.iter().map(|chart_id| {
        let rival_ids = &rival_ids;
        async move {
            let result =
                rerank_against_rivals(ctx, user_id, chart_id, rival_ids, metric).await;
            (chart_id, result)
        }
    });

    for (chart_id, result) in join_all(futures).await {
        if let Err(err) = result {
            warn!("Failed to update rival rank for user {user_id} on {chart_id}: {err}.");
        }
    }

    Ok(())
}

async fn rerank_against_rivals(
    ctx: &Context,
    user_id: i64,
    chart_id: &str,
    rival_ids: &[i64],
    metric: Metric,
) -> Result<()> {
    let Some(pb) = ctx.store.get_pb(user_id, chart_id).await? else {
        return Ok(());
    };

    let value = pb.score_data.metric_value(metric);
    let mut better = 0u32;

    for rival_id in rival_ids {
        if let Some(rival_pb) = ctx.store.get_pb(*rival_id, chart_id).await?
            && rival_pb.score_data.metric_value(metric) > value
        {
            better += 1;
        }
    }

    let mut updated = pb;
    updated.ranking_data.rival_rank = Some(1 + better);
    ctx.store.upsert_pb(&updated).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::{Grade, Lamp, Metric};
    use crate::model::{
        CalculatedData, ComposedFrom, Judgements, PersonalBest, RankingData, ScoreData,
    };

    fn rank_of(pbs: &[PersonalBest], value: f64, metric: Metric) -> u32 {
        1 + pbs
            .iter()
            .filter(|pb| pb.score_data.metric_value(metric) > value)
            .count() as u32
    }

    fn pb(user_id: i64, percent: f64) -> PersonalBest {
        PersonalBest {
            user_id,
            chart_id: "chart".to_string(),
            song_id: 1,
            game: Game::Iidx,
            playtype: Playtype::Single,
            score_data: ScoreData {
                score: (percent * 20.0) as u32,
                percent,
                grade: Grade::from_percent(percent),
                lamp: Lamp::Clear,
                judgements: Judgements::default(),
            },
            calculated_data: CalculatedData::default(),
            time_achieved: None,
            composed_from: ComposedFrom {
                score_pb: format!("S{user_id}"),
                lamp_pb: format!("S{user_id}"),
            },
            ranking_data: RankingData::default(),
            highlight: false,
            comments: Vec::new(),
        }
    }

    #[test]
    fn test_ties_share_rank() {
        let pbs = vec![pb(1, 100.0), pb(2, 95.0), pb(3, 90.0), pb(4, 90.0)];

        let ranks: Vec<u32> = pbs
            .iter()
            .map(|p| rank_of(&pbs, p.score_data.metric_value(Metric::Percent), Metric::Percent))
            .collect();

        assert_eq!(ranks, vec![1, 2, 3, 3]);
    }

    #[test]
    fn test_sole_pb_ranks_first() {
        let pbs = vec![pb(1, 42.0)];
        assert_eq!(rank_of(&pbs, 42.0, Metric::Percent), 1);
    }
}
