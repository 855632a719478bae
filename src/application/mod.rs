//! Application layer - Use cases and port interfaces
//!
//! Contains the recording operations and trait definitions
//! for external system interactions.

pub mod devices;
pub mod ports;
pub mod record;
pub mod session;

// Re-export use cases
pub use devices::{list_audio_sources, SourceListing};
pub use record::{RecordCallbacks, RecordError, RecordInput, RecordMixUseCase, RecordOutput};
pub use session::{RecordingSession, SessionPlan};
