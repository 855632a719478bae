//! Audio device value objects

use std::fmt;

/// Which side of a hardware endpoint a listing entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceDirection {
    /// Capture-capable (microphone, line in)
    Input,
    /// Playback-capable (speakers, headphones); recorded via loopback
    Output,
}

impl DeviceDirection {
    /// Get the label used in device listings
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
        }
    }
}

impl fmt::Display for DeviceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One hardware endpoint in one direction.
///
/// A device with both input and output channels is described by two
/// `AudioDevice` values sharing the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub index: usize,
    pub name: String,
    pub direction: DeviceDirection,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioDevice {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        direction: DeviceDirection,
        sample_rate: u32,
        channels: u16,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            direction,
            sample_rate,
            channels,
        }
    }

    /// Line shown by the device listing
    pub fn listing_line(&self) -> String {
        format!("Index {}: {} ({})", self.index, self.name, self.direction)
    }

    /// Line describing the negotiated parameters of a selected device
    pub fn details_line(&self) -> String {
        format!(
            "{}, channels: {}, default samplerate: {}",
            self.name, self.channels, self.sample_rate
        )
    }
}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing_line())
    }
}
