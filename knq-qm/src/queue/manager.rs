//! Queue manager for the karaoke_queue table
//!
//! All queue mutations go through this type so callers never see the
//! intermediate states of a promotion: the demote/renumber/promote sequence
//! runs inside a single transaction, and change events are emitted only
//! after commit.

use knq_common::db::models::{EntryRow, EntryStatus, QueueEntry};
use knq_common::events::{EventBus, QueueEvent};
use knq_common::{Error, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::throttle::SubmissionThrottle;

const ENTRY_SELECT: &str =
    "SELECT id, singer, artist, music, position, status, is_playing, created_at FROM karaoke_queue";

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The entry as inserted
    pub entry: QueueEntry,
    /// Entries currently waiting or playing, the new one included
    /// ("you are Nth in line" feedback)
    pub in_line: i64,
}

/// Queue manager handles all operations against the karaoke_queue table
#[derive(Clone)]
pub struct QueueManager {
    db: SqlitePool,
    events: Arc<EventBus>,
    throttle: Arc<Mutex<SubmissionThrottle>>,
}

impl QueueManager {
    /// Create a new queue manager
    pub fn new(db: SqlitePool, events: Arc<EventBus>) -> Self {
        Self {
            db,
            events,
            throttle: Arc::new(Mutex::new(SubmissionThrottle::new())),
        }
    }

    /// All entries that are not done, ordered by position ascending
    ///
    /// The playing entry (position 0) comes first, then the waiting entries
    /// in singing order.
    pub async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "{ENTRY_SELECT} WHERE status != 'done' ORDER BY position ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(QueueEntry::from_row).collect()
    }

    /// Submit a new entry at the end of the waiting queue
    ///
    /// Fields are trimmed and must be non-empty. The next position is one
    /// past the highest waiting position (1 for an empty queue).
    pub async fn submit(&self, singer: &str, artist: &str, music: &str) -> Result<SubmitOutcome> {
        let singer = singer.trim();
        let artist = artist.trim();
        let music = music.trim();

        if singer.is_empty() {
            return Err(Error::InvalidInput("singer must not be empty".to_string()));
        }
        if artist.is_empty() {
            return Err(Error::InvalidInput("artist must not be empty".to_string()));
        }
        if music.is_empty() {
            return Err(Error::InvalidInput("music must not be empty".to_string()));
        }

        self.throttle.lock().await.check(singer, Instant::now())?;

        let max_position: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(position) FROM karaoke_queue WHERE status = 'waiting'",
        )
        .fetch_one(&self.db)
        .await?;
        let next_position = max_position.unwrap_or(0) + 1;

        let entry = QueueEntry {
            id: Uuid::new_v4().to_string(),
            singer: singer.to_string(),
            artist: artist.to_string(),
            music: music.to_string(),
            position: next_position,
            status: EntryStatus::Waiting,
            is_playing: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO karaoke_queue (id, singer, artist, music, position, status, is_playing, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.singer)
        .bind(&entry.artist)
        .bind(&entry.music)
        .bind(entry.position)
        .bind(entry.status.as_str())
        .bind(entry.is_playing as i64)
        .bind(&entry.created_at)
        .execute(&self.db)
        .await?;

        let in_line: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM karaoke_queue WHERE status IN ('waiting', 'playing')",
        )
        .fetch_one(&self.db)
        .await?;

        self.throttle.lock().await.record(singer, Instant::now());

        info!(
            "Enqueued {} singing \"{}\" at position {}",
            entry.singer, entry.music, entry.position
        );
        self.events.emit_lossy(QueueEvent::entry_inserted(entry.clone()));

        Ok(SubmitOutcome { entry, in_line })
    }

    /// Promote a waiting entry to playing
    ///
    /// Demotes the current playing entry (if any) to done, renumbers the
    /// remaining waiting entries to a dense 1..N preserving their order, and
    /// sets the target to playing at position 0. The whole sequence is one
    /// transaction; events fire after commit.
    pub async fn promote(&self, id: &str) -> Result<QueueEntry> {
        let mut tx = self.db.begin().await?;

        let target = sqlx::query_as::<_, EntryRow>(&format!("{ENTRY_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .map(QueueEntry::from_row)
            .transpose()?
            .ok_or_else(|| Error::NotFound(format!("queue entry {id}")))?;

        if target.status != EntryStatus::Waiting {
            return Err(Error::InvalidState(format!(
                "entry {} is {}; only waiting entries can be promoted",
                target.id, target.status
            )));
        }

        // Demote whoever is on the mic
        let previous = sqlx::query_as::<_, EntryRow>(&format!(
            "{ENTRY_SELECT} WHERE status = 'playing' LIMIT 1"
        ))
        .fetch_optional(&mut *tx)
        .await?
        .map(QueueEntry::from_row)
        .transpose()?;

        if let Some(prev) = &previous {
            sqlx::query("UPDATE karaoke_queue SET status = 'done', is_playing = 0 WHERE id = ?")
                .bind(&prev.id)
                .execute(&mut *tx)
                .await?;
        }

        // Close the gap left by the target: renumber the rest densely,
        // preserving their relative order
        let waiting = sqlx::query_as::<_, EntryRow>(&format!(
            "{ENTRY_SELECT} WHERE status = 'waiting' AND id != ? ORDER BY position ASC"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(QueueEntry::from_row)
        .collect::<Result<Vec<_>>>()?;

        let mut renumbered = Vec::new();
        for (i, entry) in waiting.into_iter().enumerate() {
            let new_position = (i + 1) as i64;
            if entry.position != new_position {
                sqlx::query("UPDATE karaoke_queue SET position = ? WHERE id = ?")
                    .bind(new_position)
                    .bind(&entry.id)
                    .execute(&mut *tx)
                    .await?;
                renumbered.push((entry, new_position));
            }
        }

        sqlx::query(
            "UPDATE karaoke_queue SET status = 'playing', is_playing = 1, position = 0 WHERE id = ?",
        )
        .bind(&target.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if let Some(prev) = previous {
            let mut done = prev.clone();
            done.status = EntryStatus::Done;
            done.is_playing = false;
            debug!("Demoted {} to done", prev.id);
            self.events.emit_lossy(QueueEvent::entry_updated(prev, done));
        }

        for (old, new_position) in renumbered {
            let mut new = old.clone();
            new.position = new_position;
            self.events.emit_lossy(QueueEvent::entry_updated(old, new));
        }

        let mut promoted = target.clone();
        promoted.status = EntryStatus::Playing;
        promoted.is_playing = true;
        promoted.position = 0;

        info!(
            "Promoted {} singing \"{}\" to the mic",
            promoted.singer, promoted.music
        );
        self.events
            .emit_lossy(QueueEvent::entry_updated(target, promoted.clone()));

        Ok(promoted)
    }

    /// Remove an entry by id
    ///
    /// No renumbering happens here; a gap left in the waiting positions
    /// closes on the next promotion.
    pub async fn remove(&self, id: &str) -> Result<QueueEntry> {
        let old = sqlx::query_as::<_, EntryRow>(&format!("{ENTRY_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(QueueEntry::from_row)
            .transpose()?
            .ok_or_else(|| Error::NotFound(format!("queue entry {id}")))?;

        sqlx::query("DELETE FROM karaoke_queue WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        info!("Removed {} singing \"{}\"", old.singer, old.music);
        self.events.emit_lossy(QueueEvent::entry_deleted(old.clone()));

        Ok(old)
    }
}
