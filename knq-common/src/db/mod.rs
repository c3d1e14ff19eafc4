//! Database access layer for KNQ
//!
//! The whole queue lives in a single `karaoke_queue` table; this module owns
//! the connection and schema, models live in [`models`], and queue operations
//! live in the service crate.

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

mod init;
pub mod models;

pub use init::init_schema;

/// Connect to the queue database, creating the file if missing
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    // mode=rwc: read-write, create if missing
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&db_url).await?;
    info!("Connected to database: {}", db_path.display());

    Ok(pool)
}
