//! Server-sent event stream over the in-process [`EventBus`].
//!
//! [`EventBus`]: productflow_events::EventBus

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// GET /api/v1/events
///
/// One SSE message per platform event, named by its `event_type`. A
/// client that falls behind skips the events it missed.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.event_bus.subscribe();
    tracing::debug!(subscribers = state.event_bus.subscriber_count(), "Event stream opened");

    let stream = BroadcastStream::new(receiver).filter_map(|message| match message {
        Ok(event) => match Event::default().event(event.event_type.clone()).json_data(&event) {
            Ok(sse) => Some(Ok(sse)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode event");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Event stream lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
