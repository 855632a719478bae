//! Domain layer - Core recording logic
//!
//! Contains value objects, the mixdown, the session lifecycle and domain
//! errors. This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod recording;

// Re-export common types
pub use audio::{AudioDevice, CapturedAudio, DeviceDirection, MixedAudioBuffer, OutputFormat};
pub use config::AppConfig;
pub use error::*;
pub use recording::{RecordingDuration, SessionLifecycle, SessionState};
