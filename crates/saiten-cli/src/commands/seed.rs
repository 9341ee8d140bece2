//! Seed command: loads reference data into the store.

use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use saiten_core::Context;
use saiten_core::model::{Chart, Folder, Song, User};

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    songs: Vec<Song>,
    #[serde(default)]
    charts: Vec<Chart>,
    #[serde(default)]
    folders: Vec<Folder>,
}

pub async fn run(ctx: &Context, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path).context("Failed to read seed file")?;
    let seed: SeedFile = serde_json::from_str(&raw).context("Failed to parse seed JSON")?;

    for user in &seed.users {
        ctx.store.upsert_user(user).await?;
    }
    for song in &seed.songs {
        ctx.store.upsert_song(song).await?;
    }
    for chart in &seed.charts {
        ctx.store.upsert_chart(chart).await?;
    }
    for folder in &seed.folders {
        ctx.store.upsert_folder(folder).await?;
    }

    println!(
        "Seeded {} users, {} songs, {} charts, {} folders.",
        seed.users.len(),
        seed.songs.len(),
        seed.charts.len(),
        seed.folders.len()
    );

    Ok(())
}
