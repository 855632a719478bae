//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, hound and FFmpeg.

pub mod capture;
pub mod config;
pub mod encoding;

// Re-export adapters
pub use capture::{create_backend, CpalBackend};
pub use config::XdgConfigStore;
pub use encoding::{save, FileAudioWriter, Mp3Transcoder};
