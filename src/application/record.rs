//! Record-and-mix use case

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::audio::{mix, OutputFormat};
use crate::domain::error::{EmptyRecordingError, UnsupportedFormatError};
use crate::domain::recording::RecordingDuration;

use super::ports::{AudioWriter, CaptureBackend, EncodingError, ProgressCallback, RecordingError};
use super::session::{RecordingSession, SessionPlan};

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error(transparent)]
    Empty(#[from] EmptyRecordingError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Input parameters for the record use case
#[derive(Debug, Clone)]
pub struct RecordInput {
    /// Microphone device index (input capable)
    pub mic_index: usize,
    /// System-output device index (output capable)
    pub system_index: usize,
    /// Recording duration
    pub duration: RecordingDuration,
    /// Output format as typed by the user
    pub format: String,
    /// Destination file
    pub output: PathBuf,
}

/// Output from the record use case
#[derive(Debug, Clone)]
pub struct RecordOutput {
    /// Where the recording was written
    pub path: PathBuf,
    /// Format actually used
    pub format: OutputFormat,
    /// Set when the requested format was replaced by WAV
    pub format_warning: Option<UnsupportedFormatError>,
    /// Number of mono samples written
    pub samples: usize,
    /// Sample rate of the written file
    pub sample_rate: u32,
    /// Playback length in seconds
    pub duration_secs: f64,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct RecordCallbacks {
    /// Called with the resolved devices before capture starts
    pub on_plan: Option<Box<dyn Fn(&SessionPlan) + Send + Sync>>,
    /// Called during recording with (remaining_secs, total_secs)
    pub on_progress: Option<ProgressCallback>,
    /// Called when capture ends, before mixing
    pub on_recording_end: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when the requested format was not recognized
    pub on_format_warning: Option<Box<dyn Fn(&UnsupportedFormatError) + Send + Sync>>,
}

/// Record both sources, mix them and save the result
pub struct RecordMixUseCase<B, W>
where
    B: CaptureBackend,
    W: AudioWriter,
{
    backend: Arc<B>,
    writer: W,
    running: Arc<AtomicBool>,
}

impl<B, W> RecordMixUseCase<B, W>
where
    B: CaptureBackend,
    W: AudioWriter,
{
    /// Create a new use case instance
    pub fn new(backend: Arc<B>, writer: W) -> Self {
        Self {
            backend,
            writer,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Running flag of the session currently in progress.
    ///
    /// Clearing it stops the countdown early; capture itself still runs
    /// until the duration elapses.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Execute the record, mix, save workflow
    pub async fn execute(
        &self,
        input: RecordInput,
        callbacks: RecordCallbacks,
    ) -> Result<RecordOutput, RecordError> {
        let resolved = OutputFormat::resolve(&input.format);
        if let Some(ref warning) = resolved.warning {
            warn!(requested = %warning.requested, "unsupported output format, using wav");
        }

        let mut session =
            RecordingSession::with_running_flag(Arc::clone(&self.backend), self.running_flag());
        let plan = session.plan(input.mic_index, input.system_index)?;

        if let Some(ref cb) = callbacks.on_plan {
            cb(&plan);
        }

        let captured = session
            .start(plan, input.duration, callbacks.on_progress.clone())
            .await?;

        if let Some(ref cb) = callbacks.on_recording_end {
            cb();
        }

        let buffer = mix(captured)?;

        if let Some(ref warning) = resolved.warning {
            if let Some(ref cb) = callbacks.on_format_warning {
                cb(warning);
            }
        }

        self.writer
            .write(&buffer, &input.output, resolved.format)
            .await?;

        info!(
            path = %input.output.display(),
            format = %resolved.format,
            samples = buffer.len(),
            "recording saved"
        );

        Ok(RecordOutput {
            path: input.output,
            format: resolved.format,
            format_warning: resolved.warning,
            samples: buffer.len(),
            sample_rate: buffer.sample_rate(),
            duration_secs: buffer.duration_secs(),
        })
    }
}
