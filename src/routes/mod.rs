use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod quizzes;
pub mod records;
pub mod session;
pub mod sse;

/// Compose the quiz API and its documentation, then bind the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(quizzes::router())
        .merge(session::router())
        .merge(records::router())
        .merge(sse::router())
        .merge(docs::router())
        .with_state(state)
}
