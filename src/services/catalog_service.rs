use crate::{error::ServiceError, state::SharedState};

/// Identifiers of every quiz the configured catalog can serve.
pub async fn list_quizzes(state: &SharedState) -> Result<Vec<String>, ServiceError> {
    Ok(state.catalog().list_quizzes().await?)
}
