use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mood::Mood;
use crate::types::{GoalStatus, Priority};

/// One profile per external user identity. Created lazily on first contact,
/// mutated only by the engine, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    /// Persisted `ConversationState` JSON. Kept raw here so a state written
    /// by an incompatible version survives a read-modify-write untouched.
    pub state: String,
    /// Last explicit coaching session; input to the rate limiter.
    pub last_coaching_at: Option<DateTime<Utc>>,
    /// Free-form preference data.
    pub preferences: Value,
}

/// A goal being tracked for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: String,
    pub text: String,
    pub date_set: DateTime<Utc>,
    pub status: GoalStatus,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
}

/// One mood log entry: the normalized tag plus the user's original words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: String,
    pub mood: Mood,
    pub original_text: String,
    pub timestamp: DateTime<Utc>,
}

/// Profile persistence.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile, creating a default (`Idle`) one on first access.
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Profile>;
    async fn save_profile(&self, profile: &Profile) -> anyhow::Result<()>;
}

/// Goal persistence. Every mutation is scoped by `(goal_id, user_id)` and
/// reports affected rows so the caller can distinguish "not found / not
/// yours" from success.
#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn insert_goal(&self, user_id: &str, text: &str) -> anyhow::Result<i64>;
    async fn list_goals(&self, user_id: &str) -> anyhow::Result<Vec<Goal>>;
    async fn update_goal_text(&self, goal_id: i64, user_id: &str, text: &str)
        -> anyhow::Result<u64>;
    async fn complete_goal(&self, goal_id: i64, user_id: &str) -> anyhow::Result<u64>;
    async fn set_goal_priority(
        &self,
        goal_id: i64,
        user_id: &str,
        priority: Priority,
    ) -> anyhow::Result<u64>;
    async fn set_goal_deadline(
        &self,
        goal_id: i64,
        user_id: &str,
        deadline: NaiveDate,
    ) -> anyhow::Result<u64>;
    async fn set_goal_category(
        &self,
        goal_id: i64,
        user_id: &str,
        category: &str,
    ) -> anyhow::Result<u64>;
    async fn delete_goal(&self, goal_id: i64, user_id: &str) -> anyhow::Result<u64>;
}

/// Mood-log persistence, same scoping rules as goals.
#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn insert_mood(
        &self,
        user_id: &str,
        mood: Mood,
        original_text: &str,
    ) -> anyhow::Result<i64>;
    async fn list_recent_moods(&self, user_id: &str, limit: i64)
        -> anyhow::Result<Vec<MoodEntry>>;
    async fn update_mood(
        &self,
        mood_id: i64,
        user_id: &str,
        mood: Mood,
        original_text: &str,
    ) -> anyhow::Result<u64>;
    async fn delete_mood(&self, mood_id: i64, user_id: &str) -> anyhow::Result<u64>;
}

/// Append-only audit trail of coaching sessions. Never read back by the
/// engine.
#[async_trait]
pub trait CoachingLogStore: Send + Sync {
    async fn append_coaching_record(
        &self,
        user_id: &str,
        prompt: &str,
        response: &str,
    ) -> anyhow::Result<()>;
}

/// Facade over the focused store traits so the engine can hold one trait
/// object. Blanket-implemented for any type providing all four.
pub trait StateStore: ProfileStore + GoalStore + MoodStore + CoachingLogStore {}

impl<T: ProfileStore + GoalStore + MoodStore + CoachingLogStore> StateStore for T {}

/// Chat-completion provider — one prompt in, one reply out. Errors cross
/// this boundary; the coaching gateway absorbs them.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<String>;
}
