//! Goals and quests: user-subscribed targets evaluated against PBs.

pub mod goals;
pub mod quests;

pub use goals::{
    construct_goal, evaluate_goal_for_user, resolve_goal_charts, subscribe_to_goal,
    update_user_goals, SubscribeGoalResult,
};
pub use quests::{construct_quest, subscribe_to_quest, update_user_quests};
