use anyhow::Result;
use clap::{Parser, Subcommand};
use saiten_core::events::LogSink;
use saiten_core::model::enums::{Game, Playtype};
use saiten_core::{Config, Context, Store};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "saiten")]
#[command(about = "Rhythm game score tracker")]
struct Args {
    #[arg(short, long, default_value = "saiten.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load reference data (users, songs, charts, folders) from a JSON file
    Seed {
        /// Path to the seed JSON
        file: PathBuf,
    },
    /// Import a batch of converted scores from a JSON file
    Import {
        /// Path to a JSON array of scores
        file: PathBuf,
        #[arg(short, long)]
        user: i64,
        #[arg(short, long)]
        game: Game,
    },
    /// Delete a single score by id
    Delete {
        score_id: String,
        /// Also blacklist the content so re-imports skip it
        #[arg(long)]
        blacklist: bool,
    },
    /// Undo an entire import by id
    Revert { import_id: String },
    /// Recompute PBs, rankings and stats for a user from their raw scores
    Recalc {
        #[arg(short, long)]
        user: i64,
        #[arg(short, long)]
        game: Game,
        #[arg(short, long)]
        playtype: Playtype,
    },
    /// Print a user's personal bests
    Pbs {
        #[arg(short, long)]
        user: i64,
        #[arg(short, long)]
        game: Game,
        #[arg(short, long)]
        playtype: Playtype,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("saiten=info".parse()?))
        .init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(c) => {
            info!("Loaded config from {:?}", args.config);
            c
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };

    let store = Store::connect(&config.database_path).await?;
    let ctx = Context::new(store, config).with_events(Arc::new(LogSink));

    match args.command {
        Command::Seed { file } => commands::seed::run(&ctx, &file).await,
        Command::Import { file, user, game } => commands::import::run(&ctx, &file, user, game).await,
        Command::Delete {
            score_id,
            blacklist,
        } => commands::delete::run(&ctx, &score_id, blacklist).await,
        Command::Revert { import_id } => commands::revert::run(&ctx, &import_id).await,
        Command::Recalc {
            user,
            game,
            playtype,
        } => commands::recalc::run(&ctx, user, game, playtype).await,
        Command::Pbs {
            user,
            game,
            playtype,
        } => commands::pbs::run(&ctx, user, game, playtype).await,
    }
}
