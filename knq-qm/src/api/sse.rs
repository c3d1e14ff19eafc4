//! Server-Sent Events (SSE) change stream
//!
//! Streams row-level queue change events to connected views. Each connection
//! subscribes to the shared EventBus; dropping the connection drops the
//! subscription.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::AppState;

/// GET /api/events - SSE change stream
///
/// Streams events:
/// - ConnectionStatus (sent once on connect)
/// - EntryInserted / EntryUpdated / EntryDeleted (old/new row snapshots)
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        "New SSE client connected, total clients: {}",
        state.events.subscriber_count() + 1
    );

    let rx = state.events.subscribe();

    let stream = async_stream::stream! {
        // Initial connected status so views can show a live indicator
        yield Ok(Event::default().event("ConnectionStatus").data("connected"));

        let mut events = BroadcastStream::new(rx);
        while let Some(result) = events.next().await {
            match result {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        debug!("Broadcasting SSE event: {}", event.event_type());
                        yield Ok(Event::default().event(event.event_type()).data(json));
                    }
                    Err(e) => warn!("Failed to serialize event: {}", e),
                },
                Err(e) => {
                    // Lagged subscriber; the next event triggers a full
                    // re-fetch anyway
                    warn!("SSE stream error: {:?}", e);
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
