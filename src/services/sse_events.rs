use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        session::SessionSnapshotResponse,
        sse::{ServerEvent, SessionWonEvent},
    },
    state::{SseHub, session::SessionSnapshot},
};

/// Name of the event carrying a full session snapshot.
pub const EVENT_SESSION_SNAPSHOT: &str = "session.snapshot";
/// Name of the event fired once when a session is won.
pub const EVENT_SESSION_WON: &str = "session.won";
/// Name of the event sent to a freshly connected client.
pub const EVENT_HANDSHAKE: &str = "handshake";

/// Broadcast the current state of a session to every subscriber.
pub fn broadcast_snapshot(hub: &SseHub, snapshot: &SessionSnapshot) {
    let payload = SessionSnapshotResponse::from(snapshot);
    send_event(hub, EVENT_SESSION_SNAPSHOT, &payload);
}

/// Broadcast the result of a completed session.
pub fn broadcast_won(hub: &SseHub, event: &SessionWonEvent) {
    send_event(hub, EVENT_SESSION_WON, event);
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
