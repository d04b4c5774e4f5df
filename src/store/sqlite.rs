use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use async_trait::async_trait;
use tracing::warn;

use crate::mood::Mood;
use crate::store::migrations;
use crate::traits::{
    CoachingLogStore, Goal, GoalStore, MoodEntry, MoodStore, Profile, ProfileStore,
};
use crate::types::{ConversationState, GoalStatus, Priority};

/// SQLite-backed entity store. All operations are single auto-committing
/// statements on a shared pool; there is no cross-statement transaction
/// spanning a profile read and an entity write.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(db_path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        migrations::migrate(&pool).await?;

        Ok(Self { pool })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!(raw, error = %e, "Unparseable timestamp in store, substituting now");
        Utc::now()
    })
}

fn goal_from_row(row: &sqlx::sqlite::SqliteRow) -> Goal {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let date_set: String = row.get("date_set");
    let deadline: Option<String> = row.get("deadline");
    Goal {
        id: row.get("goal_id"),
        user_id: row.get("user_id"),
        text: row.get("goal_text"),
        date_set: parse_timestamp(&date_set),
        status: GoalStatus::from_db(&status),
        priority: Priority::from_db(&priority),
        deadline: deadline.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        category: row.get("category"),
    }
}

fn mood_from_row(row: &sqlx::sqlite::SqliteRow) -> MoodEntry {
    let mood: String = row.get("mood");
    let timestamp: String = row.get("timestamp");
    MoodEntry {
        id: row.get("mood_id"),
        user_id: row.get("user_id"),
        mood: Mood::from_db(&mood),
        original_text: row.get("original_text"),
        timestamp: parse_timestamp(&timestamp),
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn get_profile(&self, user_id: &str) -> anyhow::Result<Profile> {
        let row = sqlx::query(
            "SELECT state, last_coaching_at, preferences FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let state: String = row.get("state");
            let last_coaching_at: Option<String> = row.get("last_coaching_at");
            let preferences: String = row.get("preferences");
            return Ok(Profile {
                user_id: user_id.to_string(),
                state,
                last_coaching_at: last_coaching_at.map(|s| parse_timestamp(&s)),
                preferences: serde_json::from_str(&preferences)
                    .unwrap_or_else(|_| serde_json::json!({})),
            });
        }

        // First contact: create the default profile.
        let profile = Profile {
            user_id: user_id.to_string(),
            state: ConversationState::Idle.encoded(),
            last_coaching_at: None,
            preferences: serde_json::json!({}),
        };
        sqlx::query("INSERT INTO users (user_id, state, preferences) VALUES (?, ?, ?)")
            .bind(&profile.user_id)
            .bind(&profile.state)
            .bind(profile.preferences.to_string())
            .execute(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn save_profile(&self, profile: &Profile) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET state = ?, last_coaching_at = ?, preferences = ?
             WHERE user_id = ?",
        )
        .bind(&profile.state)
        .bind(profile.last_coaching_at.map(|t| t.to_rfc3339()))
        .bind(profile.preferences.to_string())
        .bind(&profile.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl GoalStore for SqliteStore {
    async fn insert_goal(&self, user_id: &str, text: &str) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO goals (user_id, goal_text, date_set, status, priority)
             VALUES (?, ?, ?, 'active', 'medium')",
        )
        .bind(user_id)
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_goals(&self, user_id: &str) -> anyhow::Result<Vec<Goal>> {
        let rows = sqlx::query(
            "SELECT goal_id, user_id, goal_text, date_set, status, priority, deadline, category
             FROM goals WHERE user_id = ? ORDER BY goal_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(goal_from_row).collect())
    }

    async fn update_goal_text(
        &self,
        goal_id: i64,
        user_id: &str,
        text: &str,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE goals SET goal_text = ? WHERE goal_id = ? AND user_id = ?")
            .bind(text)
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn complete_goal(&self, goal_id: i64, user_id: &str) -> anyhow::Result<u64> {
        let result =
            sqlx::query("UPDATE goals SET status = 'completed' WHERE goal_id = ? AND user_id = ?")
                .bind(goal_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn set_goal_priority(
        &self,
        goal_id: i64,
        user_id: &str,
        priority: Priority,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE goals SET priority = ? WHERE goal_id = ? AND user_id = ?")
            .bind(priority.as_str())
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn set_goal_deadline(
        &self,
        goal_id: i64,
        user_id: &str,
        deadline: NaiveDate,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE goals SET deadline = ? WHERE goal_id = ? AND user_id = ?")
            .bind(deadline.format("%Y-%m-%d").to_string())
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn set_goal_category(
        &self,
        goal_id: i64,
        user_id: &str,
        category: &str,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE goals SET category = ? WHERE goal_id = ? AND user_id = ?")
            .bind(category)
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_goal(&self, goal_id: i64, user_id: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM goals WHERE goal_id = ? AND user_id = ?")
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MoodStore for SqliteStore {
    async fn insert_mood(
        &self,
        user_id: &str,
        mood: Mood,
        original_text: &str,
    ) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO mood_log (user_id, mood, original_text, timestamp)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(mood.as_str())
        .bind(original_text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_recent_moods(
        &self,
        user_id: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<MoodEntry>> {
        let rows = sqlx::query(
            "SELECT mood_id, user_id, mood, original_text, timestamp
             FROM mood_log WHERE user_id = ?
             ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(mood_from_row).collect())
    }

    async fn update_mood(
        &self,
        mood_id: i64,
        user_id: &str,
        mood: Mood,
        original_text: &str,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            "UPDATE mood_log SET mood = ?, original_text = ?
             WHERE mood_id = ? AND user_id = ?",
        )
        .bind(mood.as_str())
        .bind(original_text)
        .bind(mood_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_mood(&self, mood_id: i64, user_id: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM mood_log WHERE mood_id = ? AND user_id = ?")
            .bind(mood_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CoachingLogStore for SqliteStore {
    async fn append_coaching_record(
        &self,
        user_id: &str,
        prompt: &str,
        response: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO coaching_history (user_id, timestamp, prompt, response)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(Utc::now().to_rfc3339())
        .bind(prompt)
        .bind(response)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
