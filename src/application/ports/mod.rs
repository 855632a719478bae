//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod writer;

// Re-export common types
pub use capture::{
    CaptureBackend, CaptureRequest, DeviceAccessError, FrameSink, ProgressCallback,
    RecordingError, StreamFault,
};
pub use config::ConfigStore;
pub use writer::{AudioWriter, EncodingError};
