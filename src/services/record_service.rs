use tracing::{info, warn};

use crate::{
    dao::best_record::BestRecord,
    dto::sse::SessionWonEvent,
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        scoring::round_grade,
        session::{CompletedRun, SessionSnapshot},
    },
};

/// Stored best record for `quiz_id`.
pub async fn get_best_record(
    state: &SharedState,
    quiz_id: &str,
) -> Result<BestRecord, ServiceError> {
    state
        .records()
        .get(quiz_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no record for quiz `{quiz_id}`")))
}

/// Offer a finished run to the best-record store and announce the win.
///
/// Persistence is best-effort: a failed write is logged and reported as "not
/// a new best" so the win itself always goes through.
pub async fn record_completion(
    state: &SharedState,
    snapshot: &SessionSnapshot,
    run: &CompletedRun,
) -> bool {
    let new_best = match state
        .records()
        .submit(&run.quiz_id, run.grade, run.elapsed_ms)
        .await
    {
        Ok(update) => update.is_new_best(),
        Err(err) => {
            warn!(quiz_id = %run.quiz_id, error = %err, "failed to persist best record");
            false
        }
    };

    let grade = round_grade(run.grade);
    info!(
        quiz_id = %run.quiz_id,
        session_id = %snapshot.session_id,
        grade,
        elapsed_ms = run.elapsed_ms,
        new_best,
        "quiz completed"
    );

    sse_events::broadcast_won(
        state.public_sse(),
        &SessionWonEvent::new(
            snapshot.session_id,
            run.quiz_id.clone(),
            grade,
            run.elapsed_ms,
            new_best,
        ),
    );

    new_best
}
