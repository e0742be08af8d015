use serde::Serialize;
use utoipa::ToSchema;

/// Quizzes the catalog can serve.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizListResponse {
    /// Quiz identifiers, sorted.
    pub quizzes: Vec<String>,
}
