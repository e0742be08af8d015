pub mod answers;
pub mod attempts;
pub mod handle;
pub mod scoring;
pub mod selector;
pub mod session;
mod sse;
pub mod state_machine;

use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{catalog::QuizCatalog, dao::best_record::BestRecordStore};

pub use self::handle::{DEFAULT_FLASH_DURATION, SessionHandle};
pub use self::sse::SseHub;
use self::{selector::random_source, session::GameSession};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Capacity of the broadcast channel backing the session SSE stream.
const SSE_CAPACITY: usize = 64;

/// Knobs applied to every session created by the service.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// How long a wrong-guess flash stays visible.
    pub flash_duration: Duration,
    /// Fixed seed for target selection; sessions draw from the OS when unset.
    pub rng_seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            flash_duration: DEFAULT_FLASH_DURATION,
            rng_seed: None,
        }
    }
}

/// Central application state: the collaborators and the single active session slot.
pub struct AppState {
    catalog: Arc<dyn QuizCatalog>,
    records: BestRecordStore,
    sse: SseHub,
    current_session: RwLock<Option<SessionHandle>>,
    options: SessionOptions,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        catalog: Arc<dyn QuizCatalog>,
        records: BestRecordStore,
        options: SessionOptions,
    ) -> SharedState {
        Arc::new(Self {
            catalog,
            records,
            sse: SseHub::new(SSE_CAPACITY),
            current_session: RwLock::new(None),
            options,
        })
    }

    /// Source of feature names.
    pub fn catalog(&self) -> &Arc<dyn QuizCatalog> {
        &self.catalog
    }

    /// Persisted best records.
    pub fn records(&self) -> &BestRecordStore {
        &self.records
    }

    /// Broadcast hub used for the session SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Options applied to new sessions.
    pub fn session_options(&self) -> SessionOptions {
        self.options
    }

    /// Build a fresh, still loading session for `quiz_id`. It is not installed.
    pub fn create_session(&self, quiz_id: &str) -> SessionHandle {
        let session = GameSession::new(
            Uuid::new_v4(),
            quiz_id,
            random_source(self.options.rng_seed),
        );
        SessionHandle::new(session, self.options.flash_duration, self.sse.clone())
    }

    /// Handle to the active session, if any.
    pub async fn current_session(&self) -> Option<SessionHandle> {
        let guard = self.current_session.read().await;
        guard.as_ref().cloned()
    }

    /// Make `handle` the active session. The superseded session, if any, is
    /// closed before the slot is released and returned.
    pub async fn install_session(&self, handle: SessionHandle) -> Option<SessionHandle> {
        let mut guard = self.current_session.write().await;
        let previous = guard.replace(handle);
        if let Some(previous) = &previous {
            previous.close().await;
        }
        previous
    }

    /// Remove and close the active session when it is `id`.
    pub async fn take_session(&self, id: Uuid) -> Option<SessionHandle> {
        let mut guard = self.current_session.write().await;
        if !guard.as_ref().is_some_and(|handle| handle.id() == id) {
            return None;
        }
        let handle = guard.take()?;
        handle.close().await;
        Some(handle)
    }
}
