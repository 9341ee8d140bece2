use futures::future::join_all;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::Result;
use crate::model::enums::Metric;
use crate::model::{ComposedFrom, PersonalBest, RankingData, Score};

/// Rebuilds the PB for (user, chart) as a pure projection of the user's
/// current scores on the chart.
///
/// Each tracked metric is won independently: the score with the best
/// primary numeric metric supplies score/percent/grade, the score with the
/// best lamp supplies the lamp, and `composedFrom` records both. If no
/// scores remain the PB is deleted. The computed document replaces the
/// prior one as a single row write, so readers never observe a partial PB.
pub async fn recompute_pb(
    ctx: &Context,
    user_id: i64,
    chart_id: &str,
) -> Result<Option<PersonalBest>> {
    let scores = ctx.store.scores_for_user_chart(user_id, chart_id).await?;

    if scores.is_empty() {
        debug!("No scores remain for user {user_id} on {chart_id}, deleting PB.");
        ctx.store.delete_pb(user_id, chart_id).await?;
        return Ok(None);
    }

    let metric = ctx
        .games
        .primary_metric(scores[0].game, scores[0].playtype);

    let Some(score_pb) = scores.iter().min_by(|a, b| pb_precedence(a, b, metric)) else {
        return Ok(None);
    };
    let Some(lamp_pb) = scores.iter().min_by(|a, b| pb_precedence(a, b, Metric::Lamp)) else {
        return Ok(None);
    };

    // Refreshing a PB must not wipe its denormalized ranking; the ranking
    // maintainer overwrites it in its own pass.
    let ranking_data = ctx
        .store
        .get_pb(user_id, chart_id)
        .await?
        .map(|prior| prior.ranking_data)
        .unwrap_or_default();

    let pb = merge_score_lamp_into_pb(score_pb, lamp_pb, ranking_data);
    ctx.store.upsert_pb(&pb).await?;

    Ok(Some(pb))
}

/// Recomputes PBs for one user over a set of charts, fanned out
/// concurrently. One chart failing is logged and skipped; the rest of the
/// batch completes.
pub async fn process_pbs(ctx: &Context, user_id: i64, chart_ids: &HashSet<String>) -> Result<()> {
    let futures = chart_ids
        .iter()
        .map(|chart_id| async move { (chart_id, recompute_pb(ctx, user_id, chart_id).await) });

    for (chart_id, result) in join_all(futures).await {
        if let Err(err) = result {
            warn!("Failed to recompute PB for user {user_id} on {chart_id}: {err}. Skipping.");
        }
    }

    Ok(())
}

/// Orders scores so the PB winner for a metric sorts first: best metric
/// value, then earliest timestamp (untimestamped plays lose ties), then
/// lowest scoreID as the final deterministic rule.
fn pb_precedence(a: &Score, b: &Score, metric: Metric) -> Ordering {
    let a_value = a.score_data.metric_value(metric);
    let b_value = b.score_data.metric_value(metric);

    b_value
        .partial_cmp(&a_value)
        .unwrap_or(Ordering::Equal)
        .then_with(|| match (a.time_achieved, b.time_achieved) {
            (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.score_id.cmp(&b.score_id))
}

fn merge_score_lamp_into_pb(
    score_pb: &Score,
    lamp_pb: &Score,
    ranking_data: RankingData,
) -> PersonalBest {
    let time_achieved = match (score_pb.time_achieved, lamp_pb.time_achieved) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    let mut score_data = score_pb.score_data.clone();
    score_data.lamp = lamp_pb.score_data.lamp;

    let mut calculated_data = score_pb.calculated_data;
    calculated_data.lamp_rating = lamp_pb.calculated_data.lamp_rating;

    let mut comments: Vec<String> = Vec::new();
    for comment in [&score_pb.comment, &lamp_pb.comment].into_iter().flatten() {
        if !comments.contains(comment) {
            comments.push(comment.clone());
        }
    }

    PersonalBest {
        user_id: score_pb.user_id,
        chart_id: score_pb.chart_id.clone(),
        song_id: score_pb.song_id,
        game: score_pb.game,
        playtype: score_pb.playtype,
        score_data,
        calculated_data,
        time_achieved,
        composed_from: ComposedFrom {
            score_pb: score_pb.score_id.clone(),
            lamp_pb: lamp_pb.score_id.clone(),
        },
        ranking_data,
        highlight: score_pb.highlight || lamp_pb.highlight,
        comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::{Game, Grade, Lamp, Playtype};
    use crate::model::{CalculatedData, Judgements, ScoreData};

    fn score(id: &str, percent: f64, lamp: Lamp, time: Option<i64>) -> Score {
        Score {
            score_id: id.to_string(),
            user_id: 1,
            game: Game::Iidx,
            playtype: Playtype::Single,
            chart_id: "chart".to_string(),
            song_id: 1,
            score_data: ScoreData {
                score: (percent * 20.0) as u32,
                percent,
                grade: Grade::from_percent(percent),
                lamp,
                judgements: Judgements::default(),
            },
            calculated_data: CalculatedData::default(),
            time_achieved: time,
            service: "test".to_string(),
            comment: None,
            highlight: false,
        }
    }

    #[test]
    fn test_precedence_prefers_better_value() {
        let a = score("Sa", 90.0, Lamp::Clear, Some(100));
        let b = score("Sb", 95.0, Lamp::Clear, Some(200));

        assert_eq!(pb_precedence(&b, &a, Metric::Percent), Ordering::Less);
        assert_eq!(pb_precedence(&a, &b, Metric::Percent), Ordering::Greater);
    }

    #[test]
    fn test_precedence_tie_breaks_on_earliest_time() {
        let earlier = score("Sb", 90.0, Lamp::Clear, Some(100));
        let later = score("Sa", 90.0, Lamp::Clear, Some(200));

        assert_eq!(
            pb_precedence(&earlier, &later, Metric::Percent),
            Ordering::Less
        );
    }

    #[test]
    fn test_precedence_untimestamped_loses_ties() {
        let timestamped = score("Sz", 90.0, Lamp::Clear, Some(100));
        let untimestamped = score("Sa", 90.0, Lamp::Clear, None);

        assert_eq!(
            pb_precedence(&timestamped, &untimestamped, Metric::Percent),
            Ordering::Less
        );
    }

    #[test]
    fn test_precedence_final_tie_break_is_lowest_id() {
        let a = score("Sa", 90.0, Lamp::Clear, None);
        let b = score("Sb", 90.0, Lamp::Clear, None);

        assert_eq!(pb_precedence(&a, &b, Metric::Percent), Ordering::Less);
    }

    #[test]
    fn test_merge_takes_lamp_from_lamp_pb() {
        let score_pb = score("Sscore", 95.0, Lamp::EasyClear, Some(100));
        let lamp_pb = score("Slamp", 85.0, Lamp::FullCombo, Some(200));

        let pb = merge_score_lamp_into_pb(&score_pb, &lamp_pb, RankingData::default());

        assert_eq!(pb.score_data.percent, 95.0);
        assert_eq!(pb.score_data.lamp, Lamp::FullCombo);
        assert_eq!(pb.composed_from.score_pb, "Sscore");
        assert_eq!(pb.composed_from.lamp_pb, "Slamp");
        assert_eq!(pb.time_achieved, Some(200));
    }
}
