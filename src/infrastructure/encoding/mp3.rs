//! MP3 transcoding through an FFmpeg subprocess
//!
//! The mixed buffer is first encoded to an in-memory WAV, which is piped
//! to FFmpeg's stdin and written to the destination as MP3 (libmp3lame).

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::EncodingError;

/// VBR quality passed to libmp3lame (0 best, 9 smallest)
const VBR_QUALITY: &str = "2";

/// FFmpeg-backed MP3 transcoder
pub struct Mp3Transcoder {
    program: String,
}

impl Mp3Transcoder {
    /// Use `ffmpeg` from PATH
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }

    /// Use a specific FFmpeg binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build FFmpeg args for WAV-on-stdin to MP3-file transcoding
    fn build_ffmpeg_args(output_path: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "wav".to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-ac".to_string(),
            "1".to_string(), // Mono
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-q:a".to_string(),
            VBR_QUALITY.to_string(),
            "-y".to_string(), // Overwrite output
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// Transcode an in-memory WAV file to MP3 at `output_path`
    pub async fn transcode(&self, wav: &[u8], output_path: &Path) -> Result<(), EncodingError> {
        let args = Self::build_ffmpeg_args(output_path);
        debug!(program = %self.program, ?args, "spawning ffmpeg");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncodingError::FfmpegNotFound
                } else {
                    EncodingError::Ffmpeg(e.to_string())
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EncodingError::Ffmpeg("stdin not captured".to_string()))?;

        let payload = wav.to_vec();
        let feeder = tokio::spawn(async move {
            let result = stdin.write_all(&payload).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EncodingError::Ffmpeg(e.to_string()))?;

        let fed = feeder
            .await
            .map_err(|e| EncodingError::Ffmpeg(format!("stdin task failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodingError::Ffmpeg(format!(
                "exited with {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        // A broken pipe only matters if FFmpeg did not succeed anyway
        fed.map_err(|e| EncodingError::Ffmpeg(format!("failed to feed input: {}", e)))?;

        Ok(())
    }
}

impl Default for Mp3Transcoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_read_wav_from_stdin() {
        let args = Mp3Transcoder::build_ffmpeg_args(Path::new("/tmp/out.mp3"));
        let joined = args.join(" ");
        assert!(joined.contains("-f wav -i pipe:0"));
        assert!(joined.contains("-c:a libmp3lame"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp3"));
    }

    #[tokio::test]
    async fn missing_binary_is_reported() {
        let transcoder = Mp3Transcoder::with_program("ffmpeg-definitely-not-installed");
        let err = transcoder
            .transcode(b"RIFF", Path::new("/tmp/never-written.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, EncodingError::FfmpegNotFound));
    }
}
