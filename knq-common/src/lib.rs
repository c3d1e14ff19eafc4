//! # KNQ Common Library
//!
//! Shared code for the KNQ karaoke queue manager:
//! - Queue entry model and status enum
//! - Database connection and schema initialization
//! - Event types (QueueEvent enum) and EventBus
//! - Configuration resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use error::{Error, Result};
