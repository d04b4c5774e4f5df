use sqlx::SqlitePool;
use tracing::info;

/// Schema provisioning for the SQLite store.
///
/// Each statement is idempotent (`IF NOT EXISTS`), so migration runs safely
/// on every startup. Failure here is fatal by design: the process must not
/// start conversations against a half-provisioned store.
pub(crate) async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            state TEXT NOT NULL,
            last_coaching_at TEXT,
            preferences TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS goals (
            goal_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id),
            goal_text TEXT NOT NULL,
            date_set TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            priority TEXT NOT NULL DEFAULT 'medium',
            deadline TEXT,
            category TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mood_log (
            mood_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id),
            mood TEXT NOT NULL,
            original_text TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_mood_log_user_time
         ON mood_log(user_id, timestamp DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coaching_history (
            coaching_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id),
            timestamp TEXT NOT NULL,
            prompt TEXT NOT NULL,
            response TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_coaching_history_user
         ON coaching_history(user_id, timestamp DESC)",
    )
    .execute(pool)
    .await?;

    info!("Store migrations complete");
    Ok(())
}
