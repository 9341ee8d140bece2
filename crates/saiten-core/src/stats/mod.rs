//! Per-user game stats: profile rating and class badges.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::context::Context;
use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::{ClassDelta, PersonalBest, UserGameStats};

/// What a class handler gets to look at.
pub struct StatsInput<'a> {
    pub rating: f64,
    pub pbs: &'a [PersonalBest],
}

/// Derives class badge values for one game. Badge values only ever move
/// up; the recompute enforces that, not the handler.
pub type ClassHandler = fn(&StatsInput<'_>) -> BTreeMap<String, u32>;

/// Immutable map from game to its class handler. Games without a handler
/// simply carry no badges.
#[derive(Clone)]
pub struct ClassRegistry {
    handlers: HashMap<Game, ClassHandler>,
}

impl ClassRegistry {
    pub fn builtin() -> Self {
        let mut handlers: HashMap<Game, ClassHandler> = HashMap::new();

        handlers.insert(Game::Iidx, |input| rating_tiers("dan", input.rating));
        handlers.insert(Game::Sdvx, |input| rating_tiers("class", input.rating));
        handlers.insert(Game::Bms, |input| rating_tiers("class", input.rating));

        Self { handlers }
    }

    pub fn handler(&self, game: Game) -> Option<&ClassHandler> {
        self.handlers.get(&game)
    }
}

const RATING_TIERS: [f64; 10] = [
    10.0, 25.0, 45.0, 70.0, 100.0, 140.0, 190.0, 250.0, 320.0, 400.0,
];

/// Tier index for a rating: the count of thresholds met. Zero means no
/// badge yet, and those are omitted from the result.
fn rating_tiers(set: &str, rating: f64) -> BTreeMap<String, u32> {
    let tier = RATING_TIERS.iter().filter(|&&t| rating >= t).count() as u32;

    let mut classes = BTreeMap::new();
    if tier > 0 {
        classes.insert(set.to_string(), tier);
    }
    classes
}

/// Recomputes the user's rating and classes for one game variant from
/// their current PBs.
///
/// The rating is the mean of the top N PB ratings, N from config. Classes
/// are monotonic: a recompute that would lower a badge keeps the old
/// value, and only upgrades are reported as deltas.
pub async fn update_user_game_stats(
    ctx: &Context,
    user_id: i64,
    game: Game,
    playtype: Playtype,
) -> Result<Vec<ClassDelta>> {
    let pbs = ctx.store.pbs_for_user(user_id, game, playtype).await?;
    let rating = profile_rating(&pbs, ctx.config.rating_depth);

    let prior = ctx.store.get_user_game_stats(user_id, game, playtype).await?;
    let prior_classes = prior.map(|s| s.classes).unwrap_or_default();

    let computed = match ctx.classes.handler(game) {
        Some(handler) => handler(&StatsInput {
            rating,
            pbs: &pbs,
        }),
        None => BTreeMap::new(),
    };

    let mut classes = prior_classes.clone();
    let mut deltas = Vec::new();

    for (set, value) in computed {
        let old = prior_classes.get(&set).copied();

        if old.is_some_and(|prior| prior >= value) {
            continue;
        }

        info!("User {user_id} reached {set} {value} on {game} {playtype}.");
        classes.insert(set.clone(), value);
        deltas.push(ClassDelta {
            set,
            old,
            new: value,
        });
    }

    let stats = UserGameStats {
        user_id,
        game,
        playtype,
        rating,
        classes,
    };
    ctx.store.upsert_user_game_stats(&stats).await?;

    debug!("Recomputed stats for user {user_id} on {game} {playtype}: rating {rating:.2}.");

    Ok(deltas)
}

/// Mean of the top `depth` PB ratings. No rated PBs means 0.
fn profile_rating(pbs: &[PersonalBest], depth: usize) -> f64 {
    let mut ratings: Vec<f64> = pbs
        .iter()
        .filter_map(|pb| pb.calculated_data.rating)
        .collect();

    if ratings.is_empty() || depth == 0 {
        return 0.0;
    }

    ratings.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    ratings.truncate(depth);

    ratings.iter().sum::<f64>() / ratings.len() as f64
}
