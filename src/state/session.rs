//! Quiz session orchestrator: prompts targets, grades guesses and detects completion.
//!
//! [`GameSession`] is a plain value with no timers or I/O. Callers feed it the
//! current instant and act on the returned [`GuessOutcome`]: scheduling the
//! expiry of wrong-guess flashes and persisting the best record on completion
//! are left to [`crate::state::handle::SessionHandle`] and the services.

use std::time::{Instant, SystemTime};

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::state::{
    answers::{AnswerStateStore, AnswerStatus},
    attempts::AttemptTracker,
    scoring::{self, Tier, score_for_attempts},
    selector::{RandomSource, TargetSelector},
    state_machine::{InvalidTransition, SessionEvent, SessionPhase, SessionStateMachine},
};

/// Message shown while the name list is being fetched.
pub const LOADING_MESSAGE: &str = "Loading map data...";
/// Message shown when the name list could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading data.";
/// Message shown once every target has been found.
pub const WON_MESSAGE: &str = "Victory! You completed the map!";

/// Misses already counted when the next one triggers the hint reveal.
const HINT_AFTER_MISSES: u32 = 2;

/// Failures while starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The name list was empty after deduplication.
    #[error("quiz `{quiz_id}` has no targets")]
    NoTargets {
        /// Quiz the session was opened for.
        quiz_id: String,
    },
    /// The session was not waiting for its names.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// The session was closed or superseded before its names arrived.
    #[error("session was closed")]
    Closed,
}

/// What a single guess did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessKind {
    /// No target is active (loading or won); nothing changed.
    Ignored,
    /// The guessed name was already found; nothing changed.
    AlreadySolved,
    /// The current target was found.
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
        /// Whether this miss revealed the target as a hint.
        hint: bool,
    },
}

/// Result of a finished session, ready to be compared with the best record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    /// Quiz the run belongs to.
    pub quiz_id: String,
    /// Accumulated points.
    pub points: f64,
    /// Number of targets in the quiz.
    pub total: usize,
    /// Unrounded grade on the 0-10 scale.
    pub grade: f64,
    /// Time between the first prompt and the last correct guess.
    pub elapsed_ms: u64,
}

/// Effects of [`GameSession::submit_guess`] the caller must act on.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    /// Classification of the guess.
    pub kind: GuessKind,
    /// Names whose status was written by this guess; pending expiries for them are stale.
    pub touched: Vec<String>,
    /// Name that now flashes as incorrect and needs an expiry scheduled.
    pub flash: Option<String>,
    /// Present exactly once, on the guess that emptied the pool.
    pub completion: Option<CompletedRun>,
}

impl GuessOutcome {
    fn unchanged(kind: GuessKind) -> Self {
        Self {
            kind,
            touched: Vec::new(),
            flash: None,
            completion: None,
        }
    }

    /// Whether the session state changed.
    pub fn changed(&self) -> bool {
        !self.touched.is_empty()
    }
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Identifier of the session.
    pub session_id: Uuid,
    /// Quiz the session was opened for.
    pub quiz_id: String,
    /// Number of targets found.
    pub score: usize,
    /// Number of targets in the quiz.
    pub total: usize,
    /// Name currently prompted.
    pub current_target: Option<String>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Display status per feature, in first-write order.
    pub answers: IndexMap<String, AnswerStatus>,
    /// Prompt or status line for the player.
    pub message: String,
    /// Accumulated points.
    pub points: f64,
    /// Unrounded grade on the 0-10 scale.
    pub grade: f64,
    /// Elapsed play time.
    pub elapsed_ms: u64,
    /// Wall-clock time the first target was prompted.
    pub started_at: Option<SystemTime>,
    /// Load failure reason, if any.
    pub error: Option<String>,
}

/// One play-through of a quiz.
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    quiz_id: String,
    machine: SessionStateMachine,
    selector: TargetSelector,
    attempts: AttemptTracker,
    answers: AnswerStateStore,
    total: usize,
    score: usize,
    points: f64,
    current_target: Option<String>,
    message: String,
    error: Option<String>,
    started: Option<Instant>,
    started_at: Option<SystemTime>,
    ended: Option<Instant>,
}

impl GameSession {
    /// Open a session in the loading phase.
    pub fn new(id: Uuid, quiz_id: impl Into<String>, random: Box<dyn RandomSource>) -> Self {
        Self {
            id,
            quiz_id: quiz_id.into(),
            machine: SessionStateMachine::new(),
            selector: TargetSelector::new(random),
            attempts: AttemptTracker::new(),
            answers: AnswerStateStore::new(),
            total: 0,
            score: 0,
            points: 0.0,
            current_target: None,
            message: LOADING_MESSAGE.to_string(),
            error: None,
            started: None,
            started_at: None,
            ended: None,
        }
    }

    /// Seed the target pool and prompt the first target.
    pub fn start(
        &mut self,
        names: Vec<String>,
        now: Instant,
        wall_clock: SystemTime,
    ) -> Result<(), SessionError> {
        if self.machine.phase() != SessionPhase::Loading {
            return Err(InvalidTransition {
                from: self.machine.phase(),
                event: SessionEvent::NamesLoaded,
            }
            .into());
        }

        let names: IndexSet<String> = names.into_iter().collect();
        if names.is_empty() {
            return Err(SessionError::NoTargets {
                quiz_id: self.quiz_id.clone(),
            });
        }

        self.total = names.len();
        self.selector.initialize(names);
        self.answers = AnswerStateStore::new();
        self.score = 0;
        self.points = 0.0;
        self.error = None;
        self.started = Some(now);
        self.started_at = Some(wall_clock);
        self.ended = None;

        self.machine.apply(SessionEvent::NamesLoaded)?;
        let first = self.selector.pick_next();
        self.prompt(first);
        Ok(())
    }

    /// Record that the name list could not be loaded; the session stays in loading.
    pub fn fail_load(&mut self, reason: impl Into<String>) {
        if self.machine.phase() != SessionPhase::Loading {
            return;
        }
        self.error = Some(reason.into());
        self.message = LOAD_FAILED_MESSAGE.to_string();
    }

    /// Grade a guess against the current target.
    pub fn submit_guess(&mut self, name: &str, now: Instant) -> GuessOutcome {
        if self.machine.phase() != SessionPhase::Playing {
            return GuessOutcome::unchanged(GuessKind::Ignored);
        }
        let Some(target) = self.current_target.clone() else {
            return GuessOutcome::unchanged(GuessKind::Ignored);
        };

        if name == target {
            self.resolve_target(target, now)
        } else {
            self.record_miss(name, &target)
        }
    }

    /// Clear the wrong-guess flash for `name` if it is still showing.
    pub fn expire_flash(&mut self, name: &str) -> bool {
        self.answers.clear_incorrect(name)
    }

    fn resolve_target(&mut self, target: String, now: Instant) -> GuessOutcome {
        let (tier, points) = score_for_attempts(self.attempts.attempts());
        self.answers.mark_correct(&target, tier);
        self.points += points;
        self.score += 1;
        self.selector.remove(&target);

        let mut outcome = GuessOutcome {
            kind: GuessKind::Correct { tier, points },
            touched: vec![target],
            flash: None,
            completion: None,
        };

        match self.selector.pick_next() {
            Some(next) => {
                outcome.touched.extend(self.answers.clear_blinking());
                self.prompt(Some(next));
            }
            None => {
                if let Err(err) = self.machine.apply(SessionEvent::AllTargetsFound) {
                    error!(session_id = %self.id, error = %err, "completion rejected by state machine");
                    return outcome;
                }
                self.current_target = None;
                self.attempts.reset();
                self.ended = Some(now);
                self.message = WON_MESSAGE.to_string();
                outcome.completion = Some(CompletedRun {
                    quiz_id: self.quiz_id.clone(),
                    points: self.points,
                    total: self.total,
                    grade: scoring::grade(self.points, self.total),
                    elapsed_ms: self.elapsed_ms(now),
                });
            }
        }

        outcome
    }

    fn record_miss(&mut self, name: &str, target: &str) -> GuessOutcome {
        if self.answers.is_solved(name) {
            return GuessOutcome::unchanged(GuessKind::AlreadySolved);
        }

        let previous = self.attempts.record_miss();
        self.answers.mark_incorrect(name);
        let mut touched = vec![name.to_string()];

        let hint = previous == HINT_AFTER_MISSES;
        if hint {
            self.answers.mark_blinking(target);
            touched.push(target.to_string());
        }

        GuessOutcome {
            kind: GuessKind::Incorrect {
                attempts: previous + 1,
                hint,
            },
            touched,
            flash: Some(name.to_string()),
            completion: None,
        }
    }

    fn prompt(&mut self, target: Option<String>) {
        self.attempts.reset();
        self.message = match &target {
            Some(name) => format!("Find: {name}"),
            None => WON_MESSAGE.to_string(),
        };
        self.current_target = target;
    }

    fn elapsed_ms(&self, now: Instant) -> u64 {
        let Some(started) = self.started else {
            return 0;
        };
        let end = self.ended.unwrap_or(now);
        u64::try_from(end.saturating_duration_since(started).as_millis()).unwrap_or(u64::MAX)
    }

    /// Identifier of the session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Quiz the session was opened for.
    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Name currently prompted.
    pub fn current_target(&self) -> Option<&str> {
        self.current_target.as_deref()
    }

    /// Misses against the current target.
    pub fn attempts(&self) -> u32 {
        self.attempts.attempts()
    }

    /// Accumulated points.
    pub fn points(&self) -> f64 {
        self.points
    }

    /// Number of targets found.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of targets in the quiz.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Display statuses.
    pub fn answers(&self) -> &AnswerStateStore {
        &self.answers
    }

    /// Names still waiting to be found.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.selector.iter()
    }

    /// Capture a read-only view at `now`.
    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            quiz_id: self.quiz_id.clone(),
            score: self.score,
            total: self.total,
            current_target: self.current_target.clone(),
            phase: self.machine.phase(),
            answers: self
                .answers
                .iter()
                .map(|(name, status)| (name.to_string(), status))
                .collect(),
            message: self.message.clone(),
            points: self.points,
            grade: scoring::grade(self.points, self.total),
            elapsed_ms: self.elapsed_ms(now),
            started_at: self.started_at,
            error: self.error.clone(),
        }
    }
}
