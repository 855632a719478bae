//! Cross-platform capture backend using cpal
//!
//! Device indices are positions in the host's device list. System output
//! is captured by opening an input stream on the output device, which the
//! WASAPI host serves as a loopback tap. On PulseAudio/PipeWire hosts the
//! "Monitor of ..." sources are offered as output-side devices instead.
//! Any other output device is refused at open time, since an input stream
//! on it would read its capture side.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, SizedSample, StreamConfig};
use tracing::{debug, warn};

use crate::application::ports::{
    CaptureBackend, CaptureRequest, DeviceAccessError, FrameSink, RecordingError,
};
use crate::domain::audio::pcm::{downmix_to_mono, f32_to_i16, u16_to_i16};
use crate::domain::audio::{AudioDevice, DeviceDirection};

/// Capture backend over the default cpal host
pub struct CpalBackend {
    host_id: cpal::HostId,
}

impl CpalBackend {
    /// Create a backend bound to the platform's default host
    pub fn new() -> Self {
        Self {
            host_id: cpal::default_host().id(),
        }
    }

    /// Name of the host API in use (e.g. "ALSA", "WASAPI")
    pub fn host_name(&self) -> &'static str {
        self.host_id.name()
    }

    fn host(&self) -> Result<cpal::Host, DeviceAccessError> {
        cpal::host_from_id(self.host_id)
            .map_err(|e| DeviceAccessError::Unavailable(e.to_string()))
    }

    fn all_devices(&self) -> Result<Vec<cpal::Device>, DeviceAccessError> {
        let host = self.host()?;
        let devices = host
            .devices()
            .map_err(|e| DeviceAccessError::Unavailable(e.to_string()))?;
        Ok(devices.collect())
    }

    /// Describe one device once per direction it supports
    fn describe(index: usize, device: &cpal::Device) -> Vec<AudioDevice> {
        let name = device
            .name()
            .unwrap_or_else(|_| format!("Unknown device {}", index));
        let mut entries = Vec::with_capacity(2);

        let input = device.default_input_config().ok();
        if let Some(ref config) = input {
            entries.push(AudioDevice::new(
                index,
                name.clone(),
                DeviceDirection::Input,
                config.sample_rate().0,
                config.channels(),
            ));
        }

        if let Ok(config) = device.default_output_config() {
            entries.push(AudioDevice::new(
                index,
                name,
                DeviceDirection::Output,
                config.sample_rate().0,
                config.channels(),
            ));
        } else if let Some(config) = input.filter(|_| is_monitor_source(&name)) {
            entries.push(AudioDevice::new(
                index,
                name,
                DeviceDirection::Output,
                config.sample_rate().0,
                config.channels(),
            ));
        }

        entries
    }

    /// How a request is captured on this host, or why it cannot be
    fn capture_source(&self, request: &CaptureRequest) -> Result<CaptureSource, RecordingError> {
        let direction = request.device.direction;
        capture_source(self.host_name(), direction, &request.device.name).ok_or_else(|| {
            RecordingError::StreamOpen {
                direction,
                message: format!(
                    "\"{}\" cannot be captured as system output on the {} host; choose a monitor source",
                    request.device.name,
                    self.host_name()
                ),
            }
        })
    }

    /// Sample format the device delivers for the stream that will be built
    fn native_format(
        device: &cpal::Device,
        source: CaptureSource,
        direction: DeviceDirection,
    ) -> Result<SampleFormat, RecordingError> {
        let config = match source {
            CaptureSource::Input | CaptureSource::Monitor => device.default_input_config(),
            CaptureSource::Loopback => device.default_output_config(),
        };

        config
            .map(|c| c.sample_format())
            .map_err(|e| RecordingError::StreamOpen {
                direction,
                message: e.to_string(),
            })
    }

    /// Build an input stream whose callback converts, downmixes and pushes
    fn build_stream<T, F>(
        device: &cpal::Device,
        config: &StreamConfig,
        sink: FrameSink,
        convert: F,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: SizedSample,
        F: Fn(T) -> i16 + Send + 'static,
    {
        let channels = config.channels;
        let error_sink = sink.clone();

        device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let pcm: Vec<i16> = data.iter().map(|&s| convert(s)).collect();
                sink.push(downmix_to_mono(&pcm, channels));
            },
            move |err| {
                warn!(error = %err, "audio stream error");
                error_sink.fail(err.to_string());
            },
            None,
        )
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for CpalBackend {
    type Stream = cpal::Stream;

    fn devices(&self) -> Result<Vec<AudioDevice>, DeviceAccessError> {
        let devices = self.all_devices()?;
        let listing: Vec<AudioDevice> = devices
            .iter()
            .enumerate()
            .flat_map(|(index, device)| Self::describe(index, device))
            .collect();

        debug!(host = self.host_name(), count = listing.len(), "enumerated audio devices");
        Ok(listing)
    }

    fn open_capture(
        &self,
        request: &CaptureRequest,
        sink: FrameSink,
    ) -> Result<Self::Stream, RecordingError> {
        let direction = request.device.direction;
        let open_error = |message: String| RecordingError::StreamOpen { direction, message };
        let source = self.capture_source(request)?;

        let device = self
            .all_devices()?
            .into_iter()
            .nth(request.device.index)
            .ok_or(DeviceAccessError::InvalidDevice {
                index: request.device.index,
                direction,
            })?;

        let name = device.name().unwrap_or_default();
        if name != request.device.name {
            return Err(open_error(format!(
                "device list changed: index {} is now \"{}\"",
                request.device.index, name
            )));
        }

        let sample_format = Self::native_format(&device, source, direction)?;
        let config = StreamConfig {
            channels: request.device.channels,
            sample_rate: SampleRate(request.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match sample_format {
            SampleFormat::I16 => Self::build_stream(&device, &config, sink, |s: i16| s),
            SampleFormat::F32 => Self::build_stream(&device, &config, sink, f32_to_i16),
            SampleFormat::U16 => Self::build_stream(&device, &config, sink, u16_to_i16),
            other => {
                return Err(open_error(format!("Unsupported sample format: {}", other)));
            }
        }
        .map_err(|e| open_error(e.to_string()))?;

        stream.play().map_err(|e| open_error(e.to_string()))?;

        debug!(
            device = %request.device.name,
            %direction,
            ?source,
            sample_rate = request.sample_rate,
            channels = request.device.channels,
            format = %sample_format,
            "capture stream started"
        );

        Ok(stream)
    }
}

/// Host whose input streams on output devices are loopback taps
const LOOPBACK_HOST: &str = "WASAPI";

/// Which side of a device an input stream reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureSource {
    /// The device's own capture side
    Input,
    /// Playback side of an output device, tapped by the host
    Loopback,
    /// PulseAudio/PipeWire source mirroring a playback sink
    Monitor,
}

/// Decide how to capture a device in `direction` on `host_name`.
///
/// `None` means the host cannot tap that device's playback: opening an
/// input stream there would record its microphone side instead.
fn capture_source(host_name: &str, direction: DeviceDirection, name: &str) -> Option<CaptureSource> {
    match direction {
        DeviceDirection::Input => Some(CaptureSource::Input),
        DeviceDirection::Output if host_name == LOOPBACK_HOST => Some(CaptureSource::Loopback),
        DeviceDirection::Output if is_monitor_source(name) => Some(CaptureSource::Monitor),
        DeviceDirection::Output => None,
    }
}

/// PulseAudio/PipeWire loopback sources of playback sinks
fn is_monitor_source(name: &str) -> bool {
    name.to_lowercase().contains("monitor")
}
