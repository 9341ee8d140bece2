//! Document models for every persisted collection, plus the shared enums.

pub mod chart;
pub mod enums;
pub mod import;
pub mod pb;
pub mod score;
pub mod session;
pub mod stats;
pub mod target;

pub use chart::{Chart, Folder, Song, User};
pub use enums::{Game, Grade, Lamp, Metric, Playtype};
pub use import::{BlacklistEntry, Import};
pub use pb::{ComposedFrom, PersonalBest, RankingData};
pub use score::{CalculatedData, IncomingScore, Judgements, Score, ScoreData, create_score_id};
pub use session::{Session, SessionCalculatedData, SessionInfo};
pub use stats::{ClassDelta, RivalSet, UserGameStats};
pub use target::{
    Goal, GoalCharts, GoalCriteria, GoalDelta, GoalMode, GoalSubscription, Quest, QuestDelta,
    QuestState, QuestSubscription, TargetState,
};
