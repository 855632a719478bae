//! Persistence port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{MixedAudioBuffer, OutputFormat};

/// Encoding and persistence errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("WAV encoding failed: {0}")]
    Wav(String),

    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },

    #[error("FFmpeg not found. MP3 export requires ffmpeg on PATH")]
    FfmpegNotFound,

    #[error("FFmpeg transcoding failed: {0}")]
    Ffmpeg(String),
}

/// Port for writing a mixed recording to storage
#[async_trait]
pub trait AudioWriter: Send + Sync {
    /// Encode `buffer` as `format` and write it to `path`
    async fn write(
        &self,
        buffer: &MixedAudioBuffer,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), EncodingError>;
}
