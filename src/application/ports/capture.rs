//! Audio capture port interfaces

use std::sync::mpsc;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::domain::audio::{AudioDevice, DeviceDirection};
use crate::domain::recording::InvalidStateTransition;

/// Device enumeration and lookup errors
#[derive(Debug, Clone, Error)]
pub enum DeviceAccessError {
    #[error("Unable to access audio devices: {0}. Make sure a sound card is configured in the environment you are running in")]
    Unavailable(String),

    #[error("No {direction} device with index {index}")]
    InvalidDevice {
        index: usize,
        direction: DeviceDirection,
    },

    #[error("Failed to query device {index}: {message}")]
    Query { index: usize, message: String },
}

/// Recording session errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error(transparent)]
    Device(#[from] DeviceAccessError),

    #[error("Failed to open {direction} stream: {message}")]
    StreamOpen {
        direction: DeviceDirection,
        message: String,
    },

    #[error("Audio stream failed: {0}")]
    StreamFailed(String),

    #[error("Capture task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Countdown callback type.
/// Parameters: (remaining_secs, total_secs)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// First fault raised by either stream of a session
#[derive(Debug, Clone, Default)]
pub struct StreamFault {
    message: Arc<OnceLock<String>>,
}

impl StreamFault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fault. Later faults are ignored.
    pub fn raise(&self, message: impl Into<String>) {
        let _ = self.message.set(message.into());
    }

    pub fn is_raised(&self) -> bool {
        self.message.get().is_some()
    }

    pub fn message(&self) -> Option<String> {
        self.message.get().cloned()
    }
}

/// Write end of one stream's frame buffer.
///
/// Exactly one stream pushes into a sink; the session drains the matching
/// receiver only after that stream has been closed.
#[derive(Debug, Clone)]
pub struct FrameSink {
    sender: mpsc::Sender<Vec<i16>>,
    fault: StreamFault,
}

impl FrameSink {
    /// Create a sink and the receiver that collects its blocks
    pub fn channel(fault: StreamFault) -> (Self, mpsc::Receiver<Vec<i16>>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender, fault }, receiver)
    }

    /// Append one block of mono samples
    pub fn push(&self, block: Vec<i16>) {
        if block.is_empty() {
            return;
        }
        // Receiver gone means the session is already tearing down
        let _ = self.sender.send(block);
    }

    /// Report a stream error; the session stops early
    pub fn fail(&self, message: impl Into<String>) {
        self.fault.raise(message);
    }
}

/// Parameters for opening one capture stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Device to capture from. Output devices are tapped via loopback.
    pub device: AudioDevice,
    /// Rate to open the stream at (the session's negotiated rate)
    pub sample_rate: u32,
}

/// Port for the host audio subsystem.
///
/// Streams are opened and dropped on the same blocking thread, so the
/// stream handle itself need not be `Send`. Dropping it closes the stream.
pub trait CaptureBackend: Send + Sync + 'static {
    type Stream;

    /// Enumerate every device once per supported direction
    fn devices(&self) -> Result<Vec<AudioDevice>, DeviceAccessError>;

    /// Look up one device with the given capability
    fn device(
        &self,
        index: usize,
        direction: DeviceDirection,
    ) -> Result<AudioDevice, DeviceAccessError> {
        self.devices()?
            .into_iter()
            .find(|d| d.index == index && d.direction == direction)
            .ok_or(DeviceAccessError::InvalidDevice { index, direction })
    }

    /// Open and start a capture stream pushing mono blocks into `sink`
    fn open_capture(
        &self,
        request: &CaptureRequest,
        sink: FrameSink,
    ) -> Result<Self::Stream, RecordingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_preserves_arrival_order() {
        let (sink, receiver) = FrameSink::channel(StreamFault::new());
        sink.push(vec![1, 2]);
        sink.push(vec![]);
        sink.push(vec![3]);
        drop(sink);

        let blocks: Vec<Vec<i16>> = receiver.try_iter().collect();
        assert_eq!(blocks, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn first_fault_wins() {
        let fault = StreamFault::new();
        assert!(!fault.is_raised());

        let (sink, _receiver) = FrameSink::channel(fault.clone());
        sink.fail("device unplugged");
        sink.fail("second error");

        assert!(fault.is_raised());
        assert_eq!(fault.message().as_deref(), Some("device unplugged"));
    }

    #[test]
    fn push_after_receiver_dropped_is_silent() {
        let (sink, receiver) = FrameSink::channel(StreamFault::new());
        drop(receiver);
        sink.push(vec![1, 2, 3]);
    }

    #[test]
    fn invalid_device_message() {
        let err = DeviceAccessError::InvalidDevice {
            index: 7,
            direction: DeviceDirection::Output,
        };
        assert_eq!(err.to_string(), "No Output device with index 7");
    }
}
