//! Recording domain module

mod duration;
mod session_state;

pub use duration::{RecordingDuration, DEFAULT_DURATION_SECS};
pub use session_state::{InvalidStateTransition, SessionLifecycle, SessionState};
