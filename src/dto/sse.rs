use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{format_elapsed, format_grade};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE `event:` name; unnamed events reach the default handler.
    pub event: Option<String>,
    /// Serialized `data:` payload.
    pub data: String,
}

impl ServerEvent {
    /// Event carrying raw text data.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Active session at connection time, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once when the last target of a session is found.
pub struct SessionWonEvent {
    /// Session that was completed.
    pub session_id: Uuid,
    /// Quiz that was completed.
    pub quiz_id: String,
    /// Grade rounded to one decimal.
    pub grade: f64,
    /// Grade formatted with one decimal.
    pub grade_display: String,
    /// Run time in milliseconds.
    pub elapsed_ms: u64,
    /// Run time as `m:ss`.
    pub elapsed_display: String,
    /// Whether the run replaced the stored best record.
    pub new_best: bool,
}

impl SessionWonEvent {
    /// Build the event for a finished run.
    pub fn new(session_id: Uuid, quiz_id: String, grade: f64, elapsed_ms: u64, new_best: bool) -> Self {
        Self {
            session_id,
            quiz_id,
            grade,
            grade_display: format_grade(grade),
            elapsed_ms,
            elapsed_display: format_elapsed(elapsed_ms),
            new_best,
        }
    }
}
