//! Database models

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a queue entry
///
/// waiting → playing → done; entries may be deleted at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Waiting,
    Playing,
    Done,
}

impl EntryStatus {
    /// Status as stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::Playing => "playing",
            EntryStatus::Done => "done",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waiting" => Ok(EntryStatus::Waiting),
            "playing" => Ok(EntryStatus::Playing),
            "done" => Ok(EntryStatus::Done),
            other => Err(Error::Internal(format!("unknown entry status: {other}"))),
        }
    }
}

/// A row in the `karaoke_queue` table
///
/// `position` 0 is reserved for the currently playing entry; positive values
/// give the waiting order (1 = up next). `is_playing` is kept redundant with
/// `status == playing` for display clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: String,
    pub singer: String,
    pub artist: String,
    pub music: String,
    pub position: i64,
    pub status: EntryStatus,
    pub is_playing: bool,
    pub created_at: String,
}

/// Raw row tuple as selected from `karaoke_queue`
pub type EntryRow = (String, String, String, String, i64, String, i64, String);

impl QueueEntry {
    /// Build an entry from a raw row tuple
    pub fn from_row(row: EntryRow) -> Result<Self> {
        Ok(QueueEntry {
            id: row.0,
            singer: row.1,
            artist: row.2,
            music: row.3,
            position: row.4,
            status: row.5.parse()?,
            is_playing: row.6 != 0,
            created_at: row.7,
        })
    }
}
