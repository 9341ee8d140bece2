//! Import command: feeds a JSON batch of converted scores into the core.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use saiten_core::Context;
use saiten_core::model::IncomingScore;
use saiten_core::model::enums::Game;
use saiten_core::mutation::import_scores;

pub async fn run(ctx: &Context, path: &Path, user: i64, game: Game) -> Result<()> {
    let raw = fs::read_to_string(path).context("Failed to read score file")?;
    let incoming: Vec<IncomingScore> =
        serde_json::from_str(&raw).context("Failed to parse score JSON")?;

    let total = incoming.len();
    let result = import_scores(ctx, user, game, incoming).await?;

    println!(
        "Imported {} of {total} scores ({} skipped).",
        result.created.len(),
        result.skipped
    );

    if let Some(import) = &result.import {
        println!("Import id: {}", import.import_id);
    }
    for session in &result.sessions {
        println!("Session: {session:?}");
    }
    for delta in &result.goal_info {
        println!(
            "Goal {}: achieved {} -> {}",
            delta.goal_id, delta.old.achieved, delta.new.achieved
        );
    }
    for delta in &result.class_deltas {
        println!("Class {}: {:?} -> {}", delta.set, delta.old, delta.new);
    }

    Ok(())
}
