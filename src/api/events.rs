//! Server-sent event stream of run snapshots and cues

use std::{convert::Infallible, sync::Arc, time::Duration};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, ServerEvent};

/// Handle GET /events
///
/// Each client first receives the current snapshot, then every event as it
/// happens. Slow clients skip what they missed rather than stall the timer.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();
    let initial = state
        .snapshot()
        .ok()
        .map(ServerEvent::Run)
        .and_then(|event| encode(&event));
    debug!("Event stream client connected");

    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(encoded) = encode(&event) {
                        return Some((Ok::<_, Infallible>(encoded), rx));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let stream = stream::iter(initial.map(Ok::<_, Infallible>)).chain(updates);
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

fn encode(event: &ServerEvent) -> Option<Event> {
    match Event::default().event(event.name()).json_data(event) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            warn!("Failed to encode {} event: {}", event.name(), e);
            None
        }
    }
}

