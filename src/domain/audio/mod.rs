//! Audio domain module

mod device;
mod mix;
mod output_format;
pub mod pcm;

pub use device::{AudioDevice, DeviceDirection};
pub use mix::{mix, mix_streams, CapturedAudio, MixedAudioBuffer};
pub use output_format::{OutputFormat, ResolvedFormat};
