//! Server-sent event stream of BOM notifications.
//!
//! Clients hold this stream open instead of polling the pending-count
//! endpoints. Events are filtered per subscriber: students see their own
//! requests, guides their supervised requests, lab and admin everything.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::app::AppState;
use crate::extractors::UserAuth;

/// GET /api/v1/notifications/stream
pub async fn stream(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.notifications.subscribe();
    let user_id = auth.user_id;
    let role = auth.role;

    tracing::debug!(user_id = %user_id, "Notification stream opened");

    let stream = BroadcastStream::new(receiver).filter_map(move |result| {
        match result {
            Ok(event) if event.visible_to(user_id, role) => {
                let sse_event = Event::default()
                    .event("bom")
                    .json_data(&event)
                    .unwrap_or_else(|_| Event::default().event("bom"));
                Some(Ok(sse_event))
            }
            // Events for other users, or a lagged receiver: skip silently.
            _ => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
