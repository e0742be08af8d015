use thiserror::Error;

/// High-level phases a quiz session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Feature names are being fetched, or the fetch failed.
    Loading,
    /// Targets are being prompted and guesses accepted.
    Playing,
    /// Every target has been found; terminal.
    Won,
}

impl SessionPhase {
    /// Status label exposed to clients.
    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Playing => "playing",
            SessionPhase::Won => "won",
        }
    }
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The name list arrived and the first target was picked.
    NamesLoaded,
    /// The last remaining target was found.
    AllTargetsFound,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// Forward-only lifecycle: loading, then playing, then won.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: SessionPhase,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Loading,
        }
    }
}

impl SessionStateMachine {
    /// Create a new state machine initialised in the loading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        Ok(next)
    }

    fn compute_transition(&self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (SessionPhase::Loading, SessionEvent::NamesLoaded) => SessionPhase::Playing,
            (SessionPhase::Playing, SessionEvent::AllTargetsFound) => SessionPhase::Won,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
