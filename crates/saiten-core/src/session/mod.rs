//! Session grouping and recalculation.
//!
//! Sessions cluster a user's timestamped scores per game variant. Scores
//! without a timestamp never join a session. A session with no members is
//! deleted rather than kept empty.

pub mod recalc;

pub use recalc::recalc_sessions;

use chrono::DateTime;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::clock::now_ms;
use crate::context::Context;
use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::{Score, Session, SessionInfo};

/// Folds newly inserted scores into sessions.
///
/// Scores are split per playtype, restricted to timestamped ones, and
/// grouped so that consecutive scores within the session window belong
/// together. Each group is then appended to an existing session whose span
/// lies within the window of the group, or becomes a new session.
pub async fn create_sessions(
    ctx: &Context,
    user_id: i64,
    game: Game,
    scores: &[Score],
) -> Result<Vec<SessionInfo>> {
    let mut by_playtype: HashMap<Playtype, Vec<&Score>> = HashMap::new();

    for score in scores {
        if score.time_achieved.is_some() {
            by_playtype.entry(score.playtype).or_default().push(score);
        }
    }

    let mut infos = Vec::new();

    for (playtype, mut timestamped) in by_playtype {
        timestamped.sort_by_key(|s| s.time_achieved);

        for group in window_groups(&timestamped, ctx.config.session_window_ms) {
            let info = apply_group(ctx, user_id, game, playtype, group).await?;
            infos.push(info);
        }
    }

    Ok(infos)
}

/// Splits time-sorted scores wherever the gap between two consecutive
/// timestamps exceeds the window.
fn window_groups<'a>(sorted: &[&'a Score], window_ms: i64) -> Vec<Vec<&'a Score>> {
    let mut groups: Vec<Vec<&Score>> = Vec::new();

    for &score in sorted {
        let time = score.time_achieved.unwrap_or_default();

        match groups.last_mut() {
            Some(group)
                if group
                    .last()
                    .and_then(|s| s.time_achieved)
                    .is_some_and(|last| time - last <= window_ms) =>
            {
                group.push(score);
            }
            _ => groups.push(vec![score]),
        }
    }

    groups
}

async fn apply_group(
    ctx: &Context,
    user_id: i64,
    game: Game,
    playtype: Playtype,
    group: Vec<&Score>,
) -> Result<SessionInfo> {
    let group_start = group
        .first()
        .and_then(|s| s.time_achieved)
        .unwrap_or_else(now_ms);
    let group_end = group
        .last()
        .and_then(|s| s.time_achieved)
        .unwrap_or(group_start);

    let window = ctx.config.session_window_ms;
    let existing = ctx.store.sessions_for_user(user_id, game, playtype).await?;

    let nearby = existing.into_iter().find(|session| {
        group_start <= session.time_ended + window && group_end >= session.time_started - window
    });

    match nearby {
        Some(session) => {
            let session_id = session.session_id.clone();
            append_to_session(ctx, session, &group).await?;
            debug!("Appended {} scores to session {session_id}.", group.len());
            Ok(SessionInfo::Appended { session_id })
        }
        None => {
            let session = new_session(ctx, user_id, game, playtype, &group).await?;
            info!("Created session {} for user {user_id}.", session.session_id);
            Ok(SessionInfo::Created {
                session_id: session.session_id,
            })
        }
    }
}

async fn append_to_session(ctx: &Context, mut session: Session, group: &[&Score]) -> Result<()> {
    for score in group {
        if !session.contains_score(&score.score_id) {
            session.score_ids.push(score.score_id.clone());
        }
    }

    let members = ctx.store.get_scores(&session.score_ids).await?;
    rebuild_from_members(&mut session, members);

    ctx.store.upsert_session(&session).await
}

async fn new_session(
    ctx: &Context,
    user_id: i64,
    game: Game,
    playtype: Playtype,
    group: &[&Score],
) -> Result<Session> {
    let time_started = group
        .first()
        .and_then(|s| s.time_achieved)
        .unwrap_or_else(now_ms);

    let mut session = Session {
        session_id: create_session_id(user_id, game, playtype, time_started),
        user_id,
        game,
        playtype,
        name: session_name(time_started),
        score_ids: group.iter().map(|s| s.score_id.clone()).collect(),
        time_started,
        time_ended: time_started,
        highlight: false,
        calculated_data: Default::default(),
    };

    let members: Vec<Score> = group.iter().map(|s| (*s).clone()).collect();
    rebuild_from_members(&mut session, members);

    ctx.store.upsert_session(&session).await?;

    Ok(session)
}

/// Rewrites member order, time bounds and aggregates from the given member
/// scores. Callers guarantee `members` is exactly the resolved score set.
pub(crate) fn rebuild_from_members(session: &mut Session, mut members: Vec<Score>) {
    members.sort_by_key(|s| s.time_achieved);

    session.score_ids = members.iter().map(|s| s.score_id.clone()).collect();
    session.time_started = members
        .iter()
        .filter_map(|s| s.time_achieved)
        .min()
        .unwrap_or(session.time_started);
    session.time_ended = members
        .iter()
        .filter_map(|s| s.time_achieved)
        .max()
        .unwrap_or(session.time_started);
    session.calculated_data = derive_calculated(&members);
}

/// Aggregates over time-ordered members. A lamp or grade raise counts a
/// member that strictly beats the best an earlier member set on the same
/// chart within this session.
pub(crate) fn derive_calculated(members: &[Score]) -> crate::model::SessionCalculatedData {
    let mut best_lamp: HashMap<&str, u8> = HashMap::new();
    let mut best_grade: HashMap<&str, u8> = HashMap::new();
    let mut lamp_raises = 0;
    let mut grade_raises = 0;
    let mut total_score = 0u64;

    for score in members {
        total_score += u64::from(score.score_data.score);

        let lamp = score.score_data.lamp.index();
        match best_lamp.get(score.chart_id.as_str()) {
            Some(&prior) if lamp > prior => {
                lamp_raises += 1;
                best_lamp.insert(&score.chart_id, lamp);
            }
            None => {
                best_lamp.insert(&score.chart_id, lamp);
            }
            Some(_) => {}
        }

        let grade = score.score_data.grade.index();
        match best_grade.get(score.chart_id.as_str()) {
            Some(&prior) if grade > prior => {
                grade_raises += 1;
                best_grade.insert(&score.chart_id, grade);
            }
            None => {
                best_grade.insert(&score.chart_id, grade);
            }
            Some(_) => {}
        }
    }

    crate::model::SessionCalculatedData {
        score_count: members.len() as u32,
        lamp_raises,
        grade_raises,
        total_score,
    }
}

fn create_session_id(user_id: i64, game: Game, playtype: Playtype, time_started: i64) -> String {
    let input = format!("{user_id}|{game}|{playtype}|{time_started}");
    format!("T{:x}", md5::compute(input))
}

fn session_name(time_started: i64) -> String {
    match DateTime::from_timestamp_millis(time_started) {
        Some(dt) => format!("Session {}", dt.format("%Y-%m-%d")),
        None => "Session".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::{Grade, Lamp};
    use crate::model::{CalculatedData, Judgements, ScoreData};

    fn score(id: &str, chart: &str, lamp: Lamp, grade: Grade, time: i64) -> Score {
        Score {
            score_id: id.to_string(),
            user_id: 1,
            game: Game::Iidx,
            playtype: Playtype::Single,
            chart_id: chart.to_string(),
            song_id: 1,
            score_data: ScoreData {
                score: 1000,
                percent: 80.0,
                grade,
                lamp,
                judgements: Judgements::default(),
            },
            calculated_data: CalculatedData::default(),
            time_achieved: Some(time),
            service: "test".to_string(),
            comment: None,
            highlight: false,
        }
    }

    const HOUR: i64 = 3_600_000;

    #[test]
    fn test_window_groups_split_on_gap() {
        let a = score("Sa", "c1", Lamp::Clear, Grade::A, 0);
        let b = score("Sb", "c1", Lamp::Clear, Grade::A, HOUR);
        let c = score("Sc", "c1", Lamp::Clear, Grade::A, 5 * HOUR);
        let sorted = vec![&a, &b, &c];

        let groups = window_groups(&sorted, 2 * HOUR);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_window_groups_chain_extends_span() {
        // Each gap is within the window even though the total span is not.
        let a = score("Sa", "c1", Lamp::Clear, Grade::A, 0);
        let b = score("Sb", "c1", Lamp::Clear, Grade::A, HOUR);
        let c = score("Sc", "c1", Lamp::Clear, Grade::A, 2 * HOUR);
        let d = score("Sd", "c1", Lamp::Clear, Grade::A, 3 * HOUR);
        let sorted = vec![&a, &b, &c, &d];

        let groups = window_groups(&sorted, 2 * HOUR);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_derive_calculated_counts_strict_raises() {
        let members = vec![
            score("Sa", "c1", Lamp::EasyClear, Grade::B, 0),
            score("Sb", "c1", Lamp::HardClear, Grade::A, 100),
            score("Sc", "c1", Lamp::HardClear, Grade::A, 200),
            score("Sd", "c2", Lamp::Failed, Grade::F, 300),
        ];

        let calc = derive_calculated(&members);

        assert_eq!(calc.score_count, 4);
        assert_eq!(calc.lamp_raises, 1);
        assert_eq!(calc.grade_raises, 1);
        assert_eq!(calc.total_score, 4000);
    }

    #[test]
    fn test_first_play_on_chart_is_not_a_raise() {
        let members = vec![score("Sa", "c1", Lamp::Perfect, Grade::Aaa, 0)];

        let calc = derive_calculated(&members);

        assert_eq!(calc.lamp_raises, 0);
        assert_eq!(calc.grade_raises, 0);
    }

    #[test]
    fn test_session_id_prefix_and_determinism() {
        let a = create_session_id(1, Game::Iidx, Playtype::Single, 1000);
        let b = create_session_id(1, Game::Iidx, Playtype::Single, 1000);

        assert_eq!(a, b);
        assert!(a.starts_with('T'));
        assert_ne!(a, create_session_id(1, Game::Iidx, Playtype::Single, 2000));
    }
}
