//! Dual-source recording session
//!
//! Captures the microphone and the system output at the same time for a
//! fixed duration. Both streams run on backend callback threads and push
//! into their own channel; the blocking capture task owns both receivers
//! and drains them once the streams are closed. A countdown task reports
//! the remaining seconds until the shared running flag clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::domain::audio::{AudioDevice, CapturedAudio, DeviceDirection};
use crate::domain::recording::{RecordingDuration, SessionLifecycle, SessionState};

use super::ports::{
    CaptureBackend, CaptureRequest, FrameSink, ProgressCallback, RecordingError, StreamFault,
};

/// How often the capture thread checks for a stream fault
const FAULT_POLL_INTERVAL: StdDuration = StdDuration::from_millis(20);

/// How often the countdown checks the running flag
const COUNTDOWN_TICK: StdDuration = StdDuration::from_millis(100);

/// Devices and rate a session will record with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub mic: AudioDevice,
    pub system: AudioDevice,
    /// Negotiated from the microphone alone and applied to both streams.
    /// A system device running at another rate drifts in pitch.
    pub sample_rate: u32,
}

impl SessionPlan {
    /// Whether the system device's native rate differs from the session rate
    pub fn has_rate_mismatch(&self) -> bool {
        self.system.sample_rate != self.sample_rate
    }
}

/// One recording attempt over a capture backend
pub struct RecordingSession<B: CaptureBackend> {
    backend: Arc<B>,
    lifecycle: SessionLifecycle,
    running: Arc<AtomicBool>,
}

impl<B: CaptureBackend> RecordingSession<B> {
    /// Create an idle session
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_running_flag(backend, Arc::new(AtomicBool::new(false)))
    }

    /// Create an idle session driven by an externally owned running flag.
    ///
    /// Clearing the flag while recording stops the countdown; capture
    /// still runs until the duration elapses.
    pub fn with_running_flag(backend: Arc<B>, running: Arc<AtomicBool>) -> Self {
        Self {
            backend,
            lifecycle: SessionLifecycle::new(),
            running,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    /// Whether the streams are currently capturing
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shared running flag, for external cancellation
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Resolve both devices and the session sample rate
    pub fn plan(&self, mic_index: usize, system_index: usize) -> Result<SessionPlan, RecordingError> {
        let mic = self.backend.device(mic_index, DeviceDirection::Input)?;
        let system = self.backend.device(system_index, DeviceDirection::Output)?;
        let sample_rate = mic.sample_rate;

        Ok(SessionPlan {
            mic,
            system,
            sample_rate,
        })
    }

    /// Resolve devices and record in one call
    pub async fn record(
        &mut self,
        mic_index: usize,
        system_index: usize,
        duration: RecordingDuration,
        on_progress: Option<ProgressCallback>,
    ) -> Result<CapturedAudio, RecordingError> {
        let plan = self.plan(mic_index, system_index)?;
        self.start(plan, duration, on_progress).await
    }

    /// Record both streams for exactly `duration`.
    ///
    /// A session records at most once; a second call fails with
    /// `RecordingError::InvalidState`.
    pub async fn start(
        &mut self,
        plan: SessionPlan,
        duration: RecordingDuration,
        on_progress: Option<ProgressCallback>,
    ) -> Result<CapturedAudio, RecordingError> {
        self.lifecycle.begin()?;

        match self.run(plan, duration, on_progress).await {
            Ok(captured) => {
                self.lifecycle.finish()?;
                Ok(captured)
            }
            Err(e) => {
                self.lifecycle.abort()?;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        plan: SessionPlan,
        duration: RecordingDuration,
        on_progress: Option<ProgressCallback>,
    ) -> Result<CapturedAudio, RecordingError> {
        if plan.has_rate_mismatch() {
            warn!(
                session_rate = plan.sample_rate,
                system_rate = plan.system.sample_rate,
                "system device native rate differs from microphone rate; capturing at microphone rate"
            );
        }

        self.running.store(true, Ordering::SeqCst);

        let backend = Arc::clone(&self.backend);
        let running = Arc::clone(&self.running);
        let length = duration.as_std();

        // cpal streams are not Send: open, run and drop them on one thread
        let capture = tokio::task::spawn_blocking(move || {
            capture_both(backend.as_ref(), &plan, length, &running)
        });

        let countdown = on_progress.map(|progress| {
            tokio::spawn(countdown(
                Arc::clone(&self.running),
                duration.as_secs(),
                progress,
            ))
        });

        let result = capture
            .await
            .map_err(|e| RecordingError::TaskFailed(e.to_string()))
            .and_then(|r| r);

        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = countdown {
            let _ = handle.await;
        }

        result
    }
}

/// Open both streams, hold them for `length`, close them and collect blocks
fn capture_both<B: CaptureBackend>(
    backend: &B,
    plan: &SessionPlan,
    length: StdDuration,
    running: &AtomicBool,
) -> Result<CapturedAudio, RecordingError> {
    let fault = StreamFault::new();
    let (mic_sink, mic_blocks) = FrameSink::channel(fault.clone());
    let (system_sink, system_blocks) = FrameSink::channel(fault.clone());

    let streams = open_streams(backend, plan, mic_sink, system_sink);
    let (mic_stream, system_stream) = match streams {
        Ok(streams) => streams,
        Err(e) => {
            running.store(false, Ordering::SeqCst);
            return Err(e);
        }
    };

    info!(
        mic = %plan.mic.name,
        system = %plan.system.name,
        sample_rate = plan.sample_rate,
        seconds = length.as_secs(),
        "recording started"
    );

    let deadline = Instant::now() + length;
    loop {
        let now = Instant::now();
        if now >= deadline || fault.is_raised() {
            break;
        }
        std::thread::sleep((deadline - now).min(FAULT_POLL_INTERVAL));
    }

    drop(mic_stream);
    drop(system_stream);
    running.store(false, Ordering::SeqCst);

    if let Some(message) = fault.message() {
        warn!(error = %message, "recording aborted by stream error");
        return Err(RecordingError::StreamFailed(message));
    }

    let captured = CapturedAudio {
        input_blocks: mic_blocks.try_iter().collect(),
        output_blocks: system_blocks.try_iter().collect(),
        sample_rate: plan.sample_rate,
    };

    debug!(
        input_samples = captured.input_len(),
        output_samples = captured.output_len(),
        "recording stopped"
    );

    Ok(captured)
}

fn open_streams<B: CaptureBackend>(
    backend: &B,
    plan: &SessionPlan,
    mic_sink: FrameSink,
    system_sink: FrameSink,
) -> Result<(B::Stream, B::Stream), RecordingError> {
    let mic_request = CaptureRequest {
        device: plan.mic.clone(),
        sample_rate: plan.sample_rate,
    };
    let system_request = CaptureRequest {
        device: plan.system.clone(),
        sample_rate: plan.sample_rate,
    };

    let mic_stream = backend.open_capture(&mic_request, mic_sink)?;
    // On failure the microphone stream drops here and closes
    let system_stream = backend.open_capture(&system_request, system_sink)?;

    Ok((mic_stream, system_stream))
}

/// Report remaining whole seconds until the duration elapses or the
/// running flag clears
async fn countdown(running: Arc<AtomicBool>, total_secs: u64, on_progress: ProgressCallback) {
    let start = Instant::now();
    let mut ticker = interval(COUNTDOWN_TICK);
    let mut last_reported = None;

    while running.load(Ordering::SeqCst) {
        ticker.tick().await;
        let elapsed = start.elapsed().as_secs();
        if elapsed >= total_secs {
            break;
        }
        let remaining = total_secs - elapsed;
        if last_reported != Some(remaining) {
            on_progress(remaining, total_secs);
            last_reported = Some(remaining);
        }
    }
}
