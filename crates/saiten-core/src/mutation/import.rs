use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::clock::now_ms;
use crate::context::Context;
use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::score::create_score_id;
use crate::model::{
    CalculatedData, ClassDelta, GoalDelta, Import, IncomingScore, QuestDelta, Score, SessionInfo,
};
use crate::pb::{process_pbs, update_chart_ranking, update_rival_rankings};
use crate::session::create_sessions;
use crate::stats::update_user_game_stats;
use crate::targets::{update_user_goals, update_user_quests};

/// Everything one import produced. `import` is None when nothing was
/// actually inserted, because an import with zero scores must not exist.
#[derive(Debug)]
pub struct ImportResult {
    pub import: Option<Import>,
    pub created: Vec<Score>,
    pub skipped: usize,
    pub sessions: Vec<SessionInfo>,
    pub goal_info: Vec<GoalDelta>,
    pub quest_info: Vec<QuestDelta>,
    pub class_deltas: Vec<ClassDelta>,
}

/// Imports a batch of converted scores for one user and game, running the
/// full cascade over everything derived from them.
///
/// Per-score problems (unknown chart, wrong game, blacklisted or duplicate
/// content) skip that score and keep the batch going. A missing user or
/// song is a reference-data error and aborts the whole import.
pub async fn import_scores(
    ctx: &Context,
    user_id: i64,
    game: Game,
    incoming: Vec<IncomingScore>,
) -> Result<ImportResult> {
    let time_started = now_ms();

    ctx.store.require_user(user_id).await?;

    let blacklisted: HashSet<String> = ctx
        .store
        .blacklisted_score_ids(user_id)
        .await?
        .into_iter()
        .collect();

    let mut created: Vec<Score> = Vec::new();
    let mut skipped = 0usize;

    for entry in incoming {
        match insert_one(ctx, user_id, game, entry, &blacklisted).await? {
            Some(score) => created.push(score),
            None => skipped += 1,
        }
    }

    if created.is_empty() {
        debug!("Import for user {user_id} inserted nothing, writing no ledger entry.");
        return Ok(ImportResult {
            import: None,
            created,
            skipped,
            sessions: Vec::new(),
            goal_info: Vec::new(),
            quest_info: Vec::new(),
            class_deltas: Vec::new(),
        });
    }

    let sessions = create_sessions(ctx, user_id, game, &created).await?;

    let touched_charts: HashSet<String> =
        created.iter().map(|s| s.chart_id.clone()).collect();
    process_pbs(ctx, user_id, &touched_charts).await?;

    for chart_id in &touched_charts {
        update_chart_ranking(ctx, chart_id).await?;
    }

    let mut charts_by_playtype: HashMap<Playtype, HashSet<String>> = HashMap::new();
    for score in &created {
        charts_by_playtype
            .entry(score.playtype)
            .or_default()
            .insert(score.chart_id.clone());
    }

    for (playtype, charts) in &charts_by_playtype {
        update_rival_rankings(ctx, user_id, game, *playtype, charts).await?;
    }

    let goal_info = update_user_goals(ctx, user_id, game, &touched_charts).await?;
    let quest_info = update_user_quests(ctx, user_id, game, &goal_info).await?;

    let mut class_deltas = Vec::new();
    for playtype in charts_by_playtype.keys() {
        class_deltas.extend(update_user_game_stats(ctx, user_id, game, *playtype).await?);
    }

    let score_ids: Vec<String> = created.iter().map(|s| s.score_id.clone()).collect();
    let import = Import {
        import_id: create_import_id(user_id, time_started, &score_ids),
        user_id,
        game,
        playtypes: charts_by_playtype.keys().copied().collect(),
        score_ids,
        created_sessions: sessions.clone(),
        time_started,
        time_finished: now_ms(),
        goal_info: goal_info.clone(),
        class_deltas: class_deltas.clone(),
    };
    ctx.store.upsert_import(&import).await?;

    info!(
        "Imported {} scores for user {user_id} on {game} ({skipped} skipped).",
        created.len()
    );

    Ok(ImportResult {
        import: Some(import),
        created,
        skipped,
        sessions,
        goal_info,
        quest_info,
        class_deltas,
    })
}

/// Resolves and inserts one converted score. Ok(None) means it was
/// skipped; fatal reference errors propagate.
async fn insert_one(
    ctx: &Context,
    user_id: i64,
    game: Game,
    entry: IncomingScore,
    blacklisted: &HashSet<String>,
) -> Result<Option<Score>> {
    let Some(chart) = ctx.store.get_chart(&entry.chart_id).await? else {
        warn!("Score references unknown chart {}. Skipping.", entry.chart_id);
        return Ok(None);
    };

    if chart.game != game {
        warn!(
            "Chart {} belongs to {}, not {game}. Skipping.",
            chart.chart_id, chart.game
        );
        return Ok(None);
    }

    if !ctx.games.supports(chart.game, chart.playtype) {
        warn!(
            "Unsupported pair {game} {} on chart {}. Skipping.",
            chart.playtype, chart.chart_id
        );
        return Ok(None);
    }

    let score_id = create_score_id(user_id, &chart.chart_id, &entry.score_data);

    if blacklisted.contains(&score_id) {
        debug!("Score {score_id} is blacklisted for user {user_id}. Skipping.");
        return Ok(None);
    }

    if ctx.store.score_exists(&score_id).await? {
        debug!("Score {score_id} already exists. Skipping duplicate.");
        return Ok(None);
    }

    // The chart referencing a missing song is corrupt reference data, not
    // a bad score.
    ctx.store.require_song(chart.song_id).await?;

    let score = Score {
        score_id,
        user_id,
        game: chart.game,
        playtype: chart.playtype,
        chart_id: chart.chart_id.clone(),
        song_id: chart.song_id,
        calculated_data: CalculatedData::derive(&chart, &entry.score_data),
        score_data: entry.score_data,
        time_achieved: entry.time_achieved,
        service: entry.service,
        comment: entry.comment,
        highlight: false,
    };

    ctx.store.upsert_score(&score).await?;

    Ok(Some(score))
}

fn create_import_id(user_id: i64, time_started: i64, score_ids: &[String]) -> String {
    let input = format!("{user_id}|{time_started}|{}", score_ids.join(","));
    format!("I{:x}", md5::compute(input))
}
