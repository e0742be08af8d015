use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::debug;
use uuid::Uuid;

use crate::{
    services::sse_events,
    state::{
        SseHub,
        session::{GameSession, GuessKind, GuessOutcome, SessionError, SessionSnapshot},
    },
};

/// Default lifetime of a wrong-guess flash.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(1_000);

/// Shared, serialized access to one [`GameSession`] plus its pending flash expiries.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    id: Uuid,
    quiz_id: String,
    flash_duration: Duration,
    hub: SseHub,
    slot: Mutex<SessionSlot>,
}

struct SessionSlot {
    session: GameSession,
    timers: HashMap<String, JoinHandle<()>>,
    closed: bool,
}

impl SessionSlot {
    fn cancel_expiry(&mut self, name: &str) {
        if let Some(task) = self.timers.remove(name) {
            task.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
    }
}

/// Clock reading that follows tokio's (possibly paused) time source.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

impl SessionHandle {
    /// Wrap `session`, publishing every change on `hub`.
    pub fn new(session: GameSession, flash_duration: Duration, hub: SseHub) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id: session.id(),
                quiz_id: session.quiz_id().to_string(),
                flash_duration,
                hub,
                slot: Mutex::new(SessionSlot {
                    session,
                    timers: HashMap::new(),
                    closed: false,
                }),
            }),
        }
    }

    /// Identifier of the wrapped session.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Quiz the wrapped session was opened for.
    pub fn quiz_id(&self) -> &str {
        &self.inner.quiz_id
    }

    /// Seed the session with its names and prompt the first target.
    pub async fn start(&self, names: Vec<String>) -> Result<SessionSnapshot, SessionError> {
        let mut slot = self.inner.slot.lock().await;
        if slot.closed {
            return Err(SessionError::Closed);
        }
        slot.session.start(names, now(), SystemTime::now())?;
        let snapshot = slot.session.snapshot(now());
        sse_events::broadcast_snapshot(&self.inner.hub, &snapshot);
        Ok(snapshot)
    }

    /// Flag the session as failed to load. Closed sessions are left untouched.
    pub async fn fail_load(&self, reason: impl Into<String>) -> SessionSnapshot {
        let mut slot = self.inner.slot.lock().await;
        if !slot.closed {
            slot.session.fail_load(reason);
            let snapshot = slot.session.snapshot(now());
            sse_events::broadcast_snapshot(&self.inner.hub, &snapshot);
            return snapshot;
        }
        slot.session.snapshot(now())
    }

    /// Whether [`SessionHandle::close`] was called.
    pub async fn is_closed(&self) -> bool {
        self.inner.slot.lock().await.closed
    }

    /// Apply a guess, rescheduling flash expiries for every name it touched.
    pub async fn submit_guess(&self, name: &str) -> (GuessOutcome, SessionSnapshot) {
        let mut slot = self.inner.slot.lock().await;
        if slot.closed {
            let snapshot = slot.session.snapshot(now());
            return (
                GuessOutcome {
                    kind: GuessKind::Ignored,
                    touched: Vec::new(),
                    flash: None,
                    completion: None,
                },
                snapshot,
            );
        }

        let outcome = slot.session.submit_guess(name, now());
        for touched in &outcome.touched {
            slot.cancel_expiry(touched);
        }
        if let Some(flashed) = &outcome.flash {
            let task = self.spawn_expiry(flashed.clone());
            slot.timers.insert(flashed.clone(), task);
        }

        let snapshot = slot.session.snapshot(now());
        if outcome.changed() {
            sse_events::broadcast_snapshot(&self.inner.hub, &snapshot);
        }
        (outcome, snapshot)
    }

    /// Current view of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let slot = self.inner.slot.lock().await;
        slot.session.snapshot(now())
    }

    /// Number of flash expiries still scheduled.
    pub async fn pending_flashes(&self) -> usize {
        let slot = self.inner.slot.lock().await;
        slot.timers.len()
    }

    /// Stop accepting guesses and abort every pending expiry.
    pub async fn close(&self) {
        let mut slot = self.inner.slot.lock().await;
        slot.closed = true;
        slot.cancel_all();
    }

    fn spawn_expiry(&self, name: String) -> JoinHandle<()> {
        let handle = self.clone();
        let delay = self.inner.flash_duration;
        tokio::spawn(async move {
            sleep(delay).await;
            handle.expire_flash(&name).await;
        })
    }

    async fn expire_flash(&self, name: &str) {
        let mut slot = self.inner.slot.lock().await;
        slot.timers.remove(name);
        if slot.closed {
            return;
        }
        if slot.session.expire_flash(name) {
            debug!(session_id = %self.inner.id, name, "wrong-guess flash expired");
            let snapshot = slot.session.snapshot(now());
            sse_events::broadcast_snapshot(&self.inner.hub, &snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        answers::AnswerStatus, selector::tests::ScriptedSource, state_machine::SessionPhase,
    };

    fn handle(hub: SseHub) -> SessionHandle {
        let session = GameSession::new(
            Uuid::new_v4(),
            "test",
            Box::new(ScriptedSource::new(vec![0.0])),
        );
        SessionHandle::new(session, DEFAULT_FLASH_DURATION, hub)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn incorrect_flash_expires_after_delay() {
        let handle = handle(SseHub::new(16));
        handle.start(names(&["Alpha", "Beta"])).await.unwrap();

        let (_, snapshot) = handle.submit_guess("Beta").await;
        assert_eq!(snapshot.answers.get("Beta"), Some(&AnswerStatus::Incorrect));
        assert_eq!(handle.pending_flashes().await, 1);

        sleep(Duration::from_millis(999)).await;
        assert_eq!(
            handle.snapshot().await.answers.get("Beta"),
            Some(&AnswerStatus::Incorrect)
        );

        sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(handle.snapshot().await.answers.get("Beta"), None);
        assert_eq!(handle.pending_flashes().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_flash_restarts_the_delay() {
        let handle = handle(SseHub::new(16));
        handle.start(names(&["Alpha", "Beta"])).await.unwrap();

        handle.submit_guess("Beta").await;
        sleep(Duration::from_millis(600)).await;
        handle.submit_guess("Beta").await;
        assert_eq!(handle.pending_flashes().await, 1);

        sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            handle.snapshot().await.answers.get("Beta"),
            Some(&AnswerStatus::Incorrect)
        );

        sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(handle.snapshot().await.answers.get("Beta"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_status_cancels_pending_flash() {
        let handle = handle(SseHub::new(16));
        handle.start(names(&["Alpha", "Beta"])).await.unwrap();

        handle.submit_guess("Beta").await;
        let (_, snapshot) = handle.submit_guess("Alpha").await;
        assert_eq!(snapshot.current_target.as_deref(), Some("Beta"));
        assert_eq!(handle.pending_flashes().await, 1);

        let (_, snapshot) = handle.submit_guess("Beta").await;
        assert_eq!(snapshot.phase, SessionPhase::Won);
        assert_eq!(handle.pending_flashes().await, 0);

        sleep(Duration::from_secs(2)).await;
        assert!(
            handle
                .snapshot()
                .await
                .answers
                .get("Beta")
                .is_some_and(|status| status.is_correct())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn solved_guess_schedules_nothing() {
        let handle = handle(SseHub::new(16));
        handle.start(names(&["Alpha", "Beta"])).await.unwrap();
        handle.submit_guess("Alpha").await;

        handle.submit_guess("Alpha").await;
        assert_eq!(handle.pending_flashes().await, 0);
        assert_eq!(handle.snapshot().await.points, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn close_aborts_timers_and_ignores_guesses() {
        let handle = handle(SseHub::new(16));
        handle.start(names(&["Alpha", "Beta"])).await.unwrap();
        handle.submit_guess("Beta").await;

        handle.close().await;
        assert_eq!(handle.pending_flashes().await, 0);

        let (outcome, _) = handle.submit_guess("Alpha").await;
        assert!(!outcome.changed());
        sleep(Duration::from_secs(2)).await;
        assert_eq!(
            handle.snapshot().await.answers.get("Beta"),
            Some(&AnswerStatus::Incorrect)
        );
    }

    #[tokio::test]
    async fn closed_session_refuses_names() {
        let handle = handle(SseHub::new(16));
        handle.close().await;

        assert_eq!(
            handle.start(names(&["Alpha"])).await,
            Err(SessionError::Closed)
        );
        let snapshot = handle.fail_load("late").await;
        assert_eq!(snapshot.phase, SessionPhase::Loading);
        assert_eq!(snapshot.error, None);
        assert!(handle.is_closed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn changes_are_broadcast() {
        let hub = SseHub::new(16);
        let mut receiver = hub.subscribe();
        let handle = handle(hub);

        handle.start(names(&["Solo"])).await.unwrap();
        handle.submit_guess("Solo").await;

        let started = receiver.recv().await.unwrap();
        assert_eq!(started.event.as_deref(), Some(sse_events::EVENT_SESSION_SNAPSHOT));
        let finished = receiver.recv().await.unwrap();
        assert_eq!(finished.event.as_deref(), Some(sse_events::EVENT_SESSION_SNAPSHOT));
        assert!(finished.data.contains("\"status\":\"won\""));

        // Solved names are no-ops and publish nothing.
        handle.submit_guess("Solo").await;
        assert!(receiver.try_recv().is_err());
    }
}
