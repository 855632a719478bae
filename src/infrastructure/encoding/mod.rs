//! Encoding and persistence of mixed recordings
//!
//! WAV is written directly with hound. MP3 goes through an in-memory WAV
//! that FFmpeg transcodes to the destination path.

mod mp3;
mod wav;

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{AudioWriter, EncodingError};
use crate::domain::audio::{MixedAudioBuffer, OutputFormat};

pub use mp3::Mp3Transcoder;
pub use wav::{encode_to_wav, wav_spec, BITS_PER_SAMPLE, CHANNELS};

/// Writes recordings to the local filesystem
pub struct FileAudioWriter {
    transcoder: Mp3Transcoder,
}

impl FileAudioWriter {
    pub fn new() -> Self {
        Self {
            transcoder: Mp3Transcoder::new(),
        }
    }

    /// Use a custom MP3 transcoder
    pub fn with_transcoder(transcoder: Mp3Transcoder) -> Self {
        Self { transcoder }
    }

    async fn ensure_parent(path: &Path) -> Result<(), EncodingError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| EncodingError::Io {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                }),
            _ => Ok(()),
        }
    }
}

impl Default for FileAudioWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioWriter for FileAudioWriter {
    async fn write(
        &self,
        buffer: &MixedAudioBuffer,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), EncodingError> {
        Self::ensure_parent(path).await?;

        let wav = encode_to_wav(buffer)?;

        match format {
            OutputFormat::Wav => fs::write(path, wav).await.map_err(|e| EncodingError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            OutputFormat::Mp3 => self.transcoder.transcode(&wav, path).await,
        }
    }
}

/// Save a buffer with the default filesystem writer
pub async fn save(
    buffer: &MixedAudioBuffer,
    path: &Path,
    format: OutputFormat,
) -> Result<(), EncodingError> {
    FileAudioWriter::new().write(buffer, path, format).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_wav_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.wav");
        let buffer = MixedAudioBuffer::new(vec![1, 2, 3], 16000);

        save(&buffer, &path, OutputFormat::Wav).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, encode_to_wav(&buffer).unwrap());
    }

    #[tokio::test]
    async fn mp3_without_ffmpeg_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        let writer =
            FileAudioWriter::with_transcoder(Mp3Transcoder::with_program("no-such-ffmpeg-binary"));
        let buffer = MixedAudioBuffer::new(vec![0; 100], 44100);

        let err = writer
            .write(&buffer, &path, OutputFormat::Mp3)
            .await
            .unwrap_err();

        assert!(matches!(err, EncodingError::FfmpegNotFound));
        assert!(!path.exists());
    }
}
