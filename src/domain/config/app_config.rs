//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::audio::OutputFormat;
use crate::domain::recording::RecordingDuration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recording duration (e.g. "30", "30s", "1m")
    pub duration: Option<String>,
    /// Output format ("wav" or "mp3")
    pub format: Option<String>,
    /// Default microphone device index
    pub mic_device: Option<usize>,
    /// Default system-output device index
    pub system_device: Option<usize>,
    /// Directory relative output names are placed in
    pub output_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            duration: Some("10s".to_string()),
            format: Some("wav".to_string()),
            mic_device: None,
            system_device: None,
            output_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            duration: other.duration.or(self.duration),
            format: other.format.or(self.format),
            mic_device: other.mic_device.or(self.mic_device),
            system_device: other.system_device.or(self.system_device),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }

    /// Get duration as parsed RecordingDuration, or default if not set/invalid
    pub fn duration_or_default(&self) -> RecordingDuration {
        self.duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get format as parsed OutputFormat, or WAV if not set/invalid
    pub fn format_or_default(&self) -> OutputFormat {
        self.format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Resolve an output file name against the configured output directory.
    /// Absolute paths and names without a configured directory pass through.
    pub fn resolve_output_path(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        match self.output_dir.as_deref() {
            Some(dir) if path.is_relative() => PathBuf::from(dir).join(path),
            _ => path,
        }
    }
}
