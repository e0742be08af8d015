//! Session lifecycle over the single active-session slot.
//!
//! Opening a session installs it in the loading phase before the catalog is
//! asked for names. A load that resolves after another session took the slot
//! finds its handle closed and is discarded.

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    services::{record_service, sse_events},
    state::{
        SessionHandle, SharedState,
        session::{CompletedRun, GuessOutcome, SessionError, SessionSnapshot},
    },
};

/// Everything a caller learns from one guess.
#[derive(Debug, Clone)]
pub struct GuessResult {
    /// What the guess did.
    pub outcome: GuessOutcome,
    /// Session state right after the guess.
    pub snapshot: SessionSnapshot,
    /// On the completing guess, whether the run became the best record.
    pub new_best: Option<bool>,
}

/// Open a session for `quiz_id`, replacing the active one, and load its names.
pub async fn init_session(
    state: &SharedState,
    quiz_id: &str,
) -> Result<SessionSnapshot, ServiceError> {
    let handle = state.create_session(quiz_id);
    if let Some(previous) = state.install_session(handle.clone()).await {
        debug!(
            session_id = %previous.id(),
            quiz_id = previous.quiz_id(),
            "superseded active session"
        );
    }
    info!(session_id = %handle.id(), quiz_id, "opening session");
    sse_events::broadcast_snapshot(state.public_sse(), &handle.snapshot().await);

    match state.catalog().load_feature_names(quiz_id).await {
        Ok(names) => start_session(&handle, names).await,
        Err(err) => {
            warn!(session_id = %handle.id(), quiz_id, error = %err, "failed to load quiz data");
            handle.fail_load(err.to_string()).await;
            Err(err.into())
        }
    }
}

async fn start_session(
    handle: &SessionHandle,
    names: Vec<String>,
) -> Result<SessionSnapshot, ServiceError> {
    let count = names.len();
    match handle.start(names).await {
        Ok(snapshot) => {
            info!(
                session_id = %handle.id(),
                quiz_id = handle.quiz_id(),
                targets = count,
                "session started"
            );
            Ok(snapshot)
        }
        Err(SessionError::Closed) => {
            debug!(
                session_id = %handle.id(),
                quiz_id = handle.quiz_id(),
                "discarding names loaded for a superseded session"
            );
            Err(SessionError::Closed.into())
        }
        Err(err) => {
            handle.fail_load(err.to_string()).await;
            Err(err.into())
        }
    }
}

/// Snapshot of the active session.
pub async fn current_snapshot(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    let handle = state
        .current_session()
        .await
        .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;
    Ok(handle.snapshot().await)
}

/// Apply a guess to the active session `session_id`.
///
/// Guesses are trimmed like catalog names. The completing guess also offers
/// the run to the best-record store, exactly once.
pub async fn submit_guess(
    state: &SharedState,
    session_id: Uuid,
    name: &str,
) -> Result<GuessResult, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("guess names no feature".into()));
    }

    let handle = active_handle(state, session_id).await?;
    let (outcome, snapshot) = handle.submit_guess(name).await;

    let new_best = match outcome.completion.clone() {
        Some(run) => Some(persist_completion(state, &snapshot, run).await),
        None => None,
    };

    Ok(GuessResult {
        outcome,
        snapshot,
        new_best,
    })
}

/// Record the finished run on its own task, so it completes even when the
/// caller stops waiting.
async fn persist_completion(
    state: &SharedState,
    snapshot: &SessionSnapshot,
    run: CompletedRun,
) -> bool {
    let task = tokio::spawn({
        let state = state.clone();
        let snapshot = snapshot.clone();
        async move { record_service::record_completion(&state, &snapshot, &run).await }
    });

    match task.await {
        Ok(new_best) => new_best,
        Err(err) => {
            error!(session_id = %snapshot.session_id, error = %err, "best record task failed");
            false
        }
    }
}

/// Leave the session `session_id`, dropping it and its pending flashes.
pub async fn close_session(state: &SharedState, session_id: Uuid) -> Result<(), ServiceError> {
    let handle = state
        .take_session(session_id)
        .await
        .ok_or_else(|| not_active(session_id))?;
    info!(session_id = %handle.id(), quiz_id = handle.quiz_id(), "session closed");
    Ok(())
}

async fn active_handle(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionHandle, ServiceError> {
    state
        .current_session()
        .await
        .filter(|handle| handle.id() == session_id)
        .ok_or_else(|| not_active(session_id))
}

fn not_active(session_id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("session {session_id} is not active"))
}
