use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::{record::BestRecordResponse, validation::validate_quiz_id},
    error::AppError,
    services::record_service,
    state::SharedState,
};

/// Best-record lookups.
pub fn router() -> Router<SharedState> {
    Router::new().route("/records/{quiz_id}", get(get_best_record))
}

#[utoipa::path(
    get,
    path = "/records/{quiz_id}",
    tag = "records",
    params(("quiz_id" = String, Path, description = "Quiz identifier")),
    responses(
        (status = 200, description = "Best record for the quiz", body = BestRecordResponse),
        (status = 400, description = "Malformed quiz identifier"),
        (status = 404, description = "No record stored yet")
    )
)]
/// Return the best grade and time stored for a quiz.
pub async fn get_best_record(
    State(state): State<SharedState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<BestRecordResponse>, AppError> {
    validate_quiz_id(&quiz_id).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let record = record_service::get_best_record(&state, &quiz_id).await?;
    Ok(Json(record.into()))
}
