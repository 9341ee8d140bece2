use std::sync::Arc;

use crate::config::Config;
use crate::events::{EventSink, NullSink};
use crate::games::GameRegistry;
use crate::stats::ClassRegistry;
use crate::store::Store;

/// Everything a cascade needs: the store, the immutable registries and the
/// event sink. Constructed once and passed by reference; no module-level
/// singletons.
pub struct Context {
    pub store: Store,
    pub games: GameRegistry,
    pub classes: ClassRegistry,
    pub events: Arc<dyn EventSink>,
    pub config: Config,
}

impl Context {
    /// A context with the builtin registries and no event delivery.
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            games: GameRegistry::builtin(),
            classes: ClassRegistry::builtin(),
            events: Arc::new(NullSink),
            config,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }
}
