//! Normalized events handed to an external dispatcher.
//!
//! Delivery failure must never roll back the state change that triggered
//! the event; callers log a warning and move on.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::model::enums::{Game, Playtype};
use crate::model::target::{QuestState, TargetState};

/// Every event this core emits for out-of-scope collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename = "goal-achieved")]
    GoalAchieved {
        #[serde(rename = "userID")]
        user_id: i64,
        #[serde(rename = "goalID")]
        goal_id: String,
        game: Game,
        playtype: Playtype,
        old: TargetState,
        new: TargetState,
    },
    #[serde(rename = "quest-achieved")]
    QuestAchieved {
        #[serde(rename = "userID")]
        user_id: i64,
        #[serde(rename = "questID")]
        quest_id: String,
        game: Game,
        playtype: Playtype,
        old: QuestState,
        new: QuestState,
    },
}

/// Where emitted events go. The webhook transport implements this
/// out-of-scope; the core only ever sees the trait.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event) -> Result<()>;
}

/// Drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) -> Result<()> {
        Ok(())
    }
}

/// Logs every event. Used by the CLI.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) -> Result<()> {
        info!("event: {}", serde_json::to_string(&event)?);
        Ok(())
    }
}

/// Buffers events in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut self.events.lock().expect("event buffer poisoned"))
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event buffer poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) -> Result<()> {
        self.events
            .lock()
            .expect("event buffer poisoned")
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_buffers() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit(Event::QuestAchieved {
            user_id: 1,
            quest_id: "Qabc".into(),
            game: Game::Iidx,
            playtype: Playtype::Single,
            old: QuestState {
                progress: 3,
                achieved: false,
            },
            new: QuestState {
                progress: 4,
                achieved: true,
            },
        })
        .unwrap();

        let events = sink.drain();
        assert_eq!(events.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_event_wire_tagging() {
        let event = Event::GoalAchieved {
            user_id: 7,
            goal_id: "Gdef".into(),
            game: Game::Bms,
            playtype: Playtype::Seven,
            old: TargetState {
                progress: None,
                out_of: 3.0,
                achieved: false,
            },
            new: TargetState {
                progress: Some(3.0),
                out_of: 3.0,
                achieved: true,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "goal-achieved");
        assert_eq!(json["content"]["userID"], 7);
    }
}
