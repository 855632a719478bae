//! WAV container encoding
//!
//! Settings:
//! - Mono channel
//! - 16-bit signed integer samples
//! - Sample rate of the mixed buffer (the microphone's native rate)

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::application::ports::EncodingError;
use crate::domain::audio::MixedAudioBuffer;

/// Bits per sample (16-bit audio)
pub const BITS_PER_SAMPLE: u16 = 16;

/// Number of channels (mono)
pub const CHANNELS: u16 = 1;

/// Header layout for a buffer
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Encode a mixed buffer to an in-memory WAV file
pub fn encode_to_wav(buffer: &MixedAudioBuffer) -> Result<Vec<u8>, EncodingError> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.pcm_bytes()));

    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec(buffer.sample_rate()))
            .map_err(|e| EncodingError::Wav(e.to_string()))?;

        for &sample in buffer.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| EncodingError::Wav(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| EncodingError::Wav(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn encode_silence_header() {
        let buffer = MixedAudioBuffer::new(vec![0; 44100], 44100);
        let bytes = encode_to_wav(&buffer).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(reader.len(), 44100);
    }

    #[test]
    fn encode_preserves_samples() {
        let samples = vec![0i16, 1, -1, i16::MAX, i16::MIN, 1234];
        let buffer = MixedAudioBuffer::new(samples.clone(), 8000);
        let bytes = encode_to_wav(&buffer).unwrap();

        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn payload_is_two_bytes_per_sample() {
        let buffer = MixedAudioBuffer::new(vec![7; 1000], 48000);
        let bytes = encode_to_wav(&buffer).unwrap();
        // Canonical 44-byte header followed by the PCM payload
        assert_eq!(bytes.len(), 44 + 2 * 1000);
    }
}
