//! Capture infrastructure module
//!
//! Provides cross-platform dual-source capture using cpal.

mod cpal_backend;

pub use cpal_backend::CpalBackend;

/// Create the capture backend for the current platform
pub fn create_backend() -> CpalBackend {
    CpalBackend::new()
}
