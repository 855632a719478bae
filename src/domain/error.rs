//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected whole seconds or <number>s, <number>m, <number>m<number>s (e.g., 30, 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Requested output format is not one we can encode.
///
/// Never fatal: callers fall back to WAV and surface this as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported format: \"{requested}\". Using WAV as default.")]
pub struct UnsupportedFormatError {
    pub requested: String,
}

/// Mixing was attempted while one or both streams captured nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Nothing recorded: microphone captured {input_samples} samples, system output captured {output_samples} samples")]
pub struct EmptyRecordingError {
    pub input_samples: usize,
    pub output_samples: usize,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
