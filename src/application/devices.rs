//! Device listing use case

use tracing::warn;

use crate::domain::audio::{AudioDevice, DeviceDirection};

use super::ports::{CaptureBackend, DeviceAccessError};

/// Result of a device enumeration.
///
/// Enumeration never fails: when the host audio subsystem is unreachable
/// the list is empty and `diagnostic` says why.
#[derive(Debug, Clone, Default)]
pub struct SourceListing {
    pub devices: Vec<AudioDevice>,
    pub diagnostic: Option<DeviceAccessError>,
}

impl SourceListing {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices usable as the microphone side
    pub fn inputs(&self) -> impl Iterator<Item = &AudioDevice> {
        self.by_direction(DeviceDirection::Input)
    }

    /// Devices usable as the system-output side
    pub fn outputs(&self) -> impl Iterator<Item = &AudioDevice> {
        self.by_direction(DeviceDirection::Output)
    }

    fn by_direction(&self, direction: DeviceDirection) -> impl Iterator<Item = &AudioDevice> {
        self.devices.iter().filter(move |d| d.direction == direction)
    }
}

/// Enumerate audio sources, failing soft
pub fn list_audio_sources<B: CaptureBackend>(backend: &B) -> SourceListing {
    match backend.devices() {
        Ok(devices) => SourceListing {
            devices,
            diagnostic: None,
        },
        Err(e) => {
            warn!(error = %e, "audio device enumeration failed");
            SourceListing {
                devices: Vec::new(),
                diagnostic: Some(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CaptureRequest, FrameSink, RecordingError};

    struct StaticBackend(Result<Vec<AudioDevice>, DeviceAccessError>);

    impl CaptureBackend for StaticBackend {
        type Stream = ();

        fn devices(&self) -> Result<Vec<AudioDevice>, DeviceAccessError> {
            self.0.clone()
        }

        fn open_capture(
            &self,
            _request: &CaptureRequest,
            _sink: FrameSink,
        ) -> Result<Self::Stream, RecordingError> {
            Ok(())
        }
    }

    #[test]
    fn lists_devices_per_direction() {
        let backend = StaticBackend(Ok(vec![
            AudioDevice::new(0, "Built-in", DeviceDirection::Input, 48000, 1),
            AudioDevice::new(0, "Built-in", DeviceDirection::Output, 48000, 2),
            AudioDevice::new(1, "HDMI", DeviceDirection::Output, 44100, 2),
        ]));

        let listing = list_audio_sources(&backend);
        assert!(listing.diagnostic.is_none());
        assert_eq!(listing.devices.len(), 3);
        assert_eq!(listing.inputs().count(), 1);
        assert_eq!(listing.outputs().count(), 2);
    }

    #[test]
    fn unreachable_host_returns_empty_with_diagnostic() {
        let backend = StaticBackend(Err(DeviceAccessError::Unavailable(
            "no sound server".to_string(),
        )));

        let listing = list_audio_sources(&backend);
        assert!(listing.is_empty());
        let diagnostic = listing.diagnostic.unwrap();
        assert!(diagnostic.to_string().contains("no sound server"));
    }

    #[test]
    fn host_without_devices_returns_empty() {
        let listing = list_audio_sources(&StaticBackend(Ok(Vec::new())));
        assert!(listing.is_empty());
        assert!(listing.diagnostic.is_none());
    }

    #[test]
    fn device_lookup_checks_direction() {
        let backend = StaticBackend(Ok(vec![AudioDevice::new(
            2,
            "Mic",
            DeviceDirection::Input,
            16000,
            1,
        )]));

        assert!(backend.device(2, DeviceDirection::Input).is_ok());
        let err = backend.device(2, DeviceDirection::Output).unwrap_err();
        assert!(matches!(
            err,
            DeviceAccessError::InvalidDevice {
                index: 2,
                direction: DeviceDirection::Output
            }
        ));
    }
}
