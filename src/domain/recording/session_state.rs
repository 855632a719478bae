//! Recording session lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Finished,
    Aborted,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Finished => "finished",
            Self::Aborted => "aborted",
        }
    }

    /// Whether the session has reached a terminal state
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Lifecycle of a single recording session.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING -> FINISHED (finish)
///   RECORDING -> ABORTED (abort)
///
/// Terminal states are never left: a session records at most once.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    /// Create a new lifecycle in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn begin(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Idle, SessionState::Recording, "start recording")
    }

    /// Transition from RECORDING to FINISHED
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Finished, "finish recording")
    }

    /// Transition from RECORDING to ABORTED
    pub fn abort(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Aborted, "abort recording")
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lifecycle_is_idle() {
        let lifecycle = SessionLifecycle::new();
        assert_eq!(lifecycle.state(), SessionState::Idle);
        assert!(!lifecycle.is_recording());
    }

    #[test]
    fn begin_then_finish() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.begin().unwrap();
        assert!(lifecycle.is_recording());

        lifecycle.finish().unwrap();
        assert_eq!(lifecycle.state(), SessionState::Finished);
        assert!(lifecycle.state().is_terminal());
    }

    #[test]
    fn begin_then_abort() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.begin().unwrap();
        lifecycle.abort().unwrap();
        assert_eq!(lifecycle.state(), SessionState::Aborted);
    }

    #[test]
    fn cannot_record_twice() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.begin().unwrap();
        lifecycle.finish().unwrap();

        let err = lifecycle.begin().unwrap_err();
        assert_eq!(err.current_state, SessionState::Finished);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn finish_from_idle_fails() {
        let mut lifecycle = SessionLifecycle::new();
        let err = lifecycle.finish().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn abort_after_finish_fails() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.begin().unwrap();
        lifecycle.finish().unwrap();
        assert!(lifecycle.abort().is_err());
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Aborted,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("aborted"));
    }
}
