//! Shared fixtures: an in-memory context seeded with a small chart pool.

#![allow(dead_code)]

use std::sync::Arc;

use saiten_core::events::MemorySink;
use saiten_core::model::enums::{Game, Grade, Lamp, Playtype};
use saiten_core::model::{
    Chart, Folder, IncomingScore, Judgements, RivalSet, ScoreData, Song, User,
};
use saiten_core::{Config, Context, Store};

pub const USER_MAIN: i64 = 1;
pub const USER_RIVAL: i64 = 2;

/// Two hours in milliseconds, matching the default session window.
pub const HOUR_MS: i64 = 3_600_000;

/// A context over an in-memory store, seeded with two users, one song and
/// three IIDX SP charts, plus a folder covering all of them. Events go to
/// the returned sink.
pub async fn seeded_context() -> (Context, Arc<MemorySink>) {
    let store = Store::connect_in_memory().await.unwrap();
    let sink = Arc::new(MemorySink::new());
    let ctx = Context::new(store, Config::default()).with_events(sink.clone());

    for (user_id, username) in [(USER_MAIN, "alpha"), (USER_RIVAL, "beta")] {
        ctx.store
            .upsert_user(&User {
                user_id,
                username: username.to_string(),
            })
            .await
            .unwrap();
    }

    ctx.store
        .upsert_song(&Song {
            song_id: 100,
            game: Game::Iidx,
            title: "Test Song".to_string(),
            artist: "Test Artist".to_string(),
        })
        .await
        .unwrap();

    for (chart_id, level_num) in [("chart-a", 10.0), ("chart-b", 11.0), ("chart-c", 12.0)] {
        ctx.store
            .upsert_chart(&Chart {
                chart_id: chart_id.to_string(),
                song_id: 100,
                game: Game::Iidx,
                playtype: Playtype::Single,
                level: format!("{level_num}"),
                level_num,
            })
            .await
            .unwrap();
    }

    ctx.store
        .upsert_folder(&Folder {
            folder_id: "folder-all".to_string(),
            game: Game::Iidx,
            playtype: Playtype::Single,
            title: "Everything".to_string(),
            chart_ids: vec![
                "chart-a".to_string(),
                "chart-b".to_string(),
                "chart-c".to_string(),
            ],
        })
        .await
        .unwrap();

    (ctx, sink)
}

pub async fn declare_rivalry(ctx: &Context, user_id: i64, rival_ids: Vec<i64>) {
    ctx.store
        .set_rivals(&RivalSet {
            user_id,
            game: Game::Iidx,
            playtype: Playtype::Single,
            rival_ids,
        })
        .await
        .unwrap();
}

pub fn incoming(chart_id: &str, percent: f64, lamp: Lamp, time: Option<i64>) -> IncomingScore {
    IncomingScore {
        chart_id: chart_id.to_string(),
        score_data: ScoreData {
            score: (percent * 20.0) as u32,
            percent,
            grade: Grade::from_percent(percent),
            lamp,
            judgements: Judgements::default(),
        },
        time_achieved: time,
        service: "test".to_string(),
        comment: None,
    }
}
