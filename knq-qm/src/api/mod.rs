//! HTTP API handlers for knq-qm

pub mod buildinfo;
pub mod handlers;
pub mod health;
pub mod sse;
pub mod ui;

pub use buildinfo::get_build_info;
pub use handlers::{get_queue, play_now, remove_entry, submit_entry};
pub use health::health_routes;
pub use sse::event_stream;
pub use ui::{serve_admin, serve_admin_js, serve_app_js, serve_index, serve_ui_css};
