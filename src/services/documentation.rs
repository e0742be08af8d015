use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for GeoQuiz Back.
#[openapi(
    info(
        title = "GeoQuiz Back",
        description = "Geography quiz sessions: target prompts, tiered scoring and best records."
    ),
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::session_stream,
        crate::routes::quizzes::list_quizzes,
        crate::routes::records::get_best_record,
        crate::routes::session::start_session,
        crate::routes::session::current_session,
        crate::routes::session::submit_guess,
        crate::routes::session::close_session,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::quiz::QuizListResponse,
            crate::dto::record::BestRecordResponse,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::GuessRequest,
            crate::dto::session::GuessResponse,
            crate::dto::session::GuessVerdict,
            crate::dto::session::SessionSnapshotResponse,
            crate::dto::phase::VisibleSessionStatus,
            crate::dto::phase::AnswerStatusDto,
            crate::dto::phase::GradeBand,
            crate::dto::sse::Handshake,
            crate::dto::sse::SessionWonEvent,
            crate::state::scoring::Tier,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "quizzes", description = "Quiz catalog"),
        (name = "records", description = "Best records per quiz"),
        (name = "sessions", description = "Quiz session lifecycle and guesses"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/sse/session",
            "/quizzes",
            "/records/{quiz_id}",
            "/sessions",
            "/sessions/current",
            "/sessions/{id}/guess",
            "/sessions/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
