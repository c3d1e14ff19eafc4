//! Database initialization
//!
//! Creates the `karaoke_queue` table and its indexes when missing. Safe to
//! run on every startup.

use crate::Result;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Initialize all required database structures
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    info!("Initializing database structures");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS karaoke_queue (
            id TEXT PRIMARY KEY,
            singer TEXT NOT NULL,
            artist TEXT NOT NULL,
            music TEXT NOT NULL,
            position INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'waiting',
            is_playing INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Every view filters on status and orders by position
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_karaoke_queue_status_position
         ON karaoke_queue (status, position)",
    )
    .execute(pool)
    .await?;

    info!("Database initialization complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_init_creates_queue_table() {
        let pool = setup_test_db().await;

        init_schema(&pool).await.unwrap();

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='karaoke_queue')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let pool = setup_test_db().await;

        init_schema(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO karaoke_queue (id, singer, artist, music, position, status, is_playing)
             VALUES ('a', 'Ana', 'Beatles', 'Let It Be', 1, 'waiting', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        // Second run must not drop existing rows
        init_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM karaoke_queue")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_status_defaults_to_waiting() {
        let pool = setup_test_db().await;
        init_schema(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO karaoke_queue (id, singer, artist, music, position)
             VALUES ('b', 'Bruno', 'Queen', 'Somebody to Love', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let status: String =
            sqlx::query_scalar("SELECT status FROM karaoke_queue WHERE id = 'b'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "waiting");
    }
}
