use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        format_elapsed, format_grade, format_system_time,
        phase::{AnswerStatusDto, GradeBand, VisibleSessionStatus},
        validation::validate_quiz_id,
    },
    state::{
        scoring::{Tier, round_grade},
        session::{GuessKind, GuessOutcome, SessionSnapshot},
    },
};

/// Request opening a new session for a quiz.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartSessionRequest {
    /// Identifier of the quiz to play.
    #[validate(custom(function = "validate_quiz_id"))]
    pub quiz_id: String,
}

/// A guess naming the feature the player picked.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GuessRequest {
    /// Feature name, compared after trimming surrounding whitespace.
    #[validate(length(min = 1, max = 256))]
    pub name: String,
}

/// Full view of a session as rendered by clients.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SessionSnapshotResponse {
    /// Identifier to send guesses to.
    pub session_id: Uuid,
    /// Quiz being played.
    pub quiz_id: String,
    /// Lifecycle status.
    pub status: VisibleSessionStatus,
    /// Targets found so far.
    pub score: usize,
    /// Targets in the quiz.
    pub total: usize,
    /// Name the player must find; absent while loading and once won.
    pub current_target: Option<String>,
    /// Display status per feature name, in first-write order.
    #[schema(value_type = Object)]
    pub answers: IndexMap<String, AnswerStatusDto>,
    /// Prompt or status line shown to the player.
    pub message: String,
    /// Accumulated tier points.
    pub points: f64,
    /// Grade on the 0-10 scale.
    pub grade: f64,
    /// Grade with one decimal, as shown on the victory panel.
    pub grade_display: String,
    /// Band used to style the grade.
    pub grade_band: GradeBand,
    /// Milliseconds since the first prompt, frozen once won.
    pub elapsed_ms: u64,
    /// Elapsed time as `m:ss`.
    pub elapsed_display: String,
    /// RFC 3339 timestamp of the first prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Reason the name list could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SessionSnapshot> for SessionSnapshotResponse {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let grade = round_grade(snapshot.grade);
        Self {
            session_id: snapshot.session_id,
            quiz_id: snapshot.quiz_id.clone(),
            status: snapshot.phase.into(),
            score: snapshot.score,
            total: snapshot.total,
            current_target: snapshot.current_target.clone(),
            answers: snapshot
                .answers
                .iter()
                .map(|(name, status)| (name.clone(), (*status).into()))
                .collect(),
            message: snapshot.message.clone(),
            points: snapshot.points,
            grade: snapshot.grade,
            grade_display: format_grade(grade),
            grade_band: GradeBand::for_grade(grade),
            elapsed_ms: snapshot.elapsed_ms,
            elapsed_display: format_elapsed(snapshot.elapsed_ms),
            started_at: snapshot.started_at.map(format_system_time),
            error: snapshot.error.clone(),
        }
    }
}

impl From<SessionSnapshot> for SessionSnapshotResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self::from(&snapshot)
    }
}

/// How a guess was judged.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuessVerdict {
    /// No target was active.
    Ignored,
    /// The name had already been found.
    AlreadySolved,
    /// The prompted target was found.
    Correct {
        /// Tier awarded.
        tier: Tier,
        /// Points credited.
        points: f64,
    },
    /// Wrong name.
    Incorrect {
        /// Misses against the current target, including this one.
        attempts: u32,
        /// Whether this miss revealed the target.
        hint: bool,
    },
}

impl From<&GuessKind> for GuessVerdict {
    fn from(value: &GuessKind) -> Self {
        match *value {
            GuessKind::Ignored => GuessVerdict::Ignored,
            GuessKind::AlreadySolved => GuessVerdict::AlreadySolved,
            GuessKind::Correct { tier, points } => GuessVerdict::Correct { tier, points },
            GuessKind::Incorrect { attempts, hint } => GuessVerdict::Incorrect { attempts, hint },
        }
    }
}

/// Verdict of a guess plus the session state after it.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuessResponse {
    /// What the guess did.
    pub verdict: GuessVerdict,
    /// Set on the guess that completed the quiz when it beat the stored best record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_best: Option<bool>,
    /// Session state right after the guess.
    pub session: SessionSnapshotResponse,
}

impl GuessResponse {
    /// Assemble the response for `outcome`.
    pub fn new(outcome: &GuessOutcome, snapshot: &SessionSnapshot, new_best: Option<bool>) -> Self {
        Self {
            verdict: (&outcome.kind).into(),
            new_best,
            session: snapshot.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use serde_json::json;

    use super::*;
    use crate::state::{answers::AnswerStatus, state_machine::SessionPhase};

    fn won_snapshot() -> SessionSnapshot {
        let mut answers = IndexMap::new();
        answers.insert("Alpha".to_string(), AnswerStatus::Correct(Tier::Correct));
        answers.insert("Beta".to_string(), AnswerStatus::Correct(Tier::Tier3));
        SessionSnapshot {
            session_id: Uuid::nil(),
            quiz_id: "demo".into(),
            score: 2,
            total: 2,
            current_target: None,
            phase: SessionPhase::Won,
            answers,
            message: "Victory! You completed the map!".into(),
            points: 1.0,
            grade: 5.0,
            elapsed_ms: 75_500,
            started_at: Some(UNIX_EPOCH + Duration::from_secs(60)),
            error: None,
        }
    }

    #[test]
    fn snapshot_response_renders_victory_fields() {
        let response = SessionSnapshotResponse::from(won_snapshot());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "won");
        assert_eq!(json["grade_display"], "5.0");
        assert_eq!(json["grade_band"], "pass");
        assert_eq!(json["elapsed_display"], "1:15");
        assert_eq!(json["started_at"], "1970-01-01T00:01:00Z");
        assert_eq!(
            json["answers"],
            json!({"Alpha": "correct", "Beta": "correct-tier3"})
        );
        assert!(json.get("error").is_none());
    }

    #[test]
    fn verdict_is_tagged() {
        let verdict = GuessVerdict::from(&GuessKind::Incorrect {
            attempts: 3,
            hint: true,
        });
        assert_eq!(
            serde_json::to_value(verdict).unwrap(),
            json!({"kind": "incorrect", "attempts": 3, "hint": true})
        );

        let verdict = GuessVerdict::from(&GuessKind::Correct {
            tier: Tier::Tier1,
            points: 0.66,
        });
        assert_eq!(
            serde_json::to_value(verdict).unwrap(),
            json!({"kind": "correct", "tier": "correct-tier1", "points": 0.66})
        );
    }

    #[test]
    fn quiz_id_must_be_a_slug() {
        assert!(StartSessionRequest { quiz_id: "spain-provinces".into() }.validate().is_ok());
        assert!(StartSessionRequest { quiz_id: "../etc".into() }.validate().is_err());
        assert!(GuessRequest { name: String::new() }.validate().is_err());
        assert!(GuessRequest { name: "Madrid".into() }.validate().is_ok());
    }
}
