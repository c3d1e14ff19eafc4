//! Event types for the KNQ change stream
//!
//! Provides the shared event definitions and EventBus. Every mutation of the
//! `karaoke_queue` table is published here as a row-level event carrying old
//! and new row snapshots; SSE fans these out to connected views, and each
//! view responds by re-fetching the full active list.

use crate::db::models::QueueEntry;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Row-level queue change events
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueueEvent {
    /// Entry inserted (new submission)
    ///
    /// Triggers:
    /// - SSE: Views re-fetch; admin and display show a "new song" toast
    EntryInserted {
        /// Row as inserted
        new: QueueEntry,
        /// When the insert happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Entry updated (promotion, demotion, or renumbering)
    ///
    /// Triggers:
    /// - SSE: Views re-fetch to pick up the new ordering
    EntryUpdated {
        /// Row before the update
        old: QueueEntry,
        /// Row after the update
        new: QueueEntry,
        /// When the update happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Entry deleted
    ///
    /// Triggers:
    /// - SSE: Views re-fetch; display shows a "removed" toast
    EntryDeleted {
        /// Row before deletion
        old: QueueEntry,
        /// When the delete happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl QueueEvent {
    /// Get event type as string for SSE event naming and filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            QueueEvent::EntryInserted { .. } => "EntryInserted",
            QueueEvent::EntryUpdated { .. } => "EntryUpdated",
            QueueEvent::EntryDeleted { .. } => "EntryDeleted",
        }
    }

    /// Create EntryInserted with the current timestamp
    pub fn entry_inserted(new: QueueEntry) -> Self {
        QueueEvent::EntryInserted {
            new,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create EntryUpdated with the current timestamp
    pub fn entry_updated(old: QueueEntry, new: QueueEntry) -> Self {
        QueueEvent::EntryUpdated {
            old,
            new,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create EntryDeleted with the current timestamp
    pub fn entry_deleted(old: QueueEntry) -> Self {
        QueueEvent::EntryDeleted {
            old,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Central event distribution bus for queue change events
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers (one per open SSE connection)
/// - Automatic cleanup when subscribers drop
pub struct EventBus {
    tx: broadcast::Sender<QueueEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: QueueEvent,
    ) -> Result<usize, broadcast::error::SendError<QueueEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Queue mutations are persisted first, so a missed event only delays a
    /// view until the next one arrives.
    pub fn emit_lossy(&self, event: QueueEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
