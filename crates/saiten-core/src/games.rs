//! Per-game configuration.
//!
//! The registry is constructed once and passed by reference through
//! [`Context`](crate::Context) rather than living in a module-level global.

use std::collections::HashMap;

use crate::model::enums::{Game, Metric, Playtype};

/// Static configuration for one (game, playtype) pair.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// The metric chart rankings (global and rival) compare on.
    pub primary_metric: Metric,
}

/// Immutable map of every supported (game, playtype) pair.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    configs: HashMap<(Game, Playtype), GameConfig>,
}

impl GameRegistry {
    pub fn builtin() -> Self {
        let mut configs = HashMap::new();

        for playtype in [Playtype::Single, Playtype::Double] {
            configs.insert(
                (Game::Iidx, playtype),
                GameConfig {
                    primary_metric: Metric::Percent,
                },
            );
        }

        configs.insert(
            (Game::Sdvx, Playtype::Single),
            GameConfig {
                primary_metric: Metric::Score,
            },
        );

        for playtype in [Playtype::Seven, Playtype::Fourteen] {
            configs.insert(
                (Game::Bms, playtype),
                GameConfig {
                    primary_metric: Metric::Percent,
                },
            );
        }

        Self { configs }
    }

    pub fn config(&self, game: Game, playtype: Playtype) -> Option<&GameConfig> {
        self.configs.get(&(game, playtype))
    }

    /// Falls back to percent for unknown pairs so a ranking pass over
    /// stray data stays deterministic instead of erroring.
    pub fn primary_metric(&self, game: Game, playtype: Playtype) -> Metric {
        self.config(game, playtype)
            .map(|c| c.primary_metric)
            .unwrap_or(Metric::Percent)
    }

    pub fn supports(&self, game: Game, playtype: Playtype) -> bool {
        self.configs.contains_key(&(game, playtype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = GameRegistry::builtin();

        assert!(registry.supports(Game::Iidx, Playtype::Single));
        assert!(registry.supports(Game::Bms, Playtype::Fourteen));
        assert!(!registry.supports(Game::Iidx, Playtype::Seven));

        assert_eq!(
            registry.primary_metric(Game::Sdvx, Playtype::Single),
            Metric::Score
        );
        assert_eq!(
            registry.primary_metric(Game::Iidx, Playtype::Double),
            Metric::Percent
        );
    }
}
