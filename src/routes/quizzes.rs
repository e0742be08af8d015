use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::quiz::QuizListResponse, error::AppError, services::catalog_service, state::SharedState,
};

/// Catalog browsing endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/quizzes", get(list_quizzes))
}

#[utoipa::path(
    get,
    path = "/quizzes",
    tag = "quizzes",
    responses(
        (status = 200, description = "Quizzes served by the catalog", body = QuizListResponse),
        (status = 503, description = "Catalog unavailable")
    )
)]
/// List the quizzes the catalog can serve.
pub async fn list_quizzes(
    State(state): State<SharedState>,
) -> Result<Json<QuizListResponse>, AppError> {
    let quizzes = catalog_service::list_quizzes(&state).await?;
    Ok(Json(QuizListResponse { quizzes }))
}
