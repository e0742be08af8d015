use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session::{GuessRequest, GuessResponse, SessionSnapshotResponse, StartSessionRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Session lifecycle endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/current", get(current_session))
        .route("/sessions/{id}/guess", post(submit_guess))
        .route("/sessions/{id}", delete(close_session))
}

#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = SessionSnapshotResponse),
        (status = 400, description = "Malformed quiz identifier"),
        (status = 404, description = "Unknown quiz"),
        (status = 409, description = "Superseded by a newer session while loading"),
        (status = 422, description = "Quiz data has no usable names"),
        (status = 503, description = "Catalog unavailable")
    )
)]
/// Open a session for a quiz, replacing the active one.
pub async fn start_session(
    State(state): State<SharedState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionSnapshotResponse>, AppError> {
    payload.validate()?;
    let snapshot = session_service::init_session(&state, &payload.quiz_id).await?;
    Ok(Json(snapshot.into()))
}

#[utoipa::path(
    get,
    path = "/sessions/current",
    tag = "sessions",
    responses(
        (status = 200, description = "Active session", body = SessionSnapshotResponse),
        (status = 404, description = "No active session")
    )
)]
/// Return the state of the active session.
pub async fn current_session(
    State(state): State<SharedState>,
) -> Result<Json<SessionSnapshotResponse>, AppError> {
    let snapshot = session_service::current_snapshot(&state).await?;
    Ok(Json(snapshot.into()))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/guess",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the active session")),
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess judged", body = GuessResponse),
        (status = 400, description = "Malformed guess"),
        (status = 404, description = "Session is not active")
    )
)]
/// Submit the feature the player picked.
pub async fn submit_guess(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    payload.validate()?;
    let result = session_service::submit_guess(&state, id, &payload.name).await?;
    Ok(Json(GuessResponse::new(
        &result.outcome,
        &result.snapshot,
        result.new_best,
    )))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the active session")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session is not active")
    )
)]
/// Leave the quiz, dropping the session.
pub async fn close_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session_service::close_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
