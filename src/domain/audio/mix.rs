//! Mono mixdown of the two captured streams

use crate::domain::error::EmptyRecordingError;

/// Raw capture handed from a finished session to the mixer.
///
/// Each side is the ordered list of mono frame blocks delivered by one
/// stream's callback.
#[derive(Debug, Clone, Default)]
pub struct CapturedAudio {
    pub input_blocks: Vec<Vec<i16>>,
    pub output_blocks: Vec<Vec<i16>>,
    pub sample_rate: u32,
}

impl CapturedAudio {
    /// Total samples captured from the microphone
    pub fn input_len(&self) -> usize {
        self.input_blocks.iter().map(Vec::len).sum()
    }

    /// Total samples captured from the system output
    pub fn output_len(&self) -> usize {
        self.output_blocks.iter().map(Vec::len).sum()
    }
}

/// Mono 16-bit recording at a fixed sample rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedAudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl MixedAudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Size of the PCM payload in bytes (16-bit mono)
    pub fn pcm_bytes(&self) -> usize {
        self.samples.len() * 2
    }
}

/// Mix the microphone and system-output capture into one mono buffer.
///
/// Both streams are flattened, truncated to the shorter one and averaged
/// sample by sample. No resampling happens: the session rate is the
/// nominal rate of both sides.
pub fn mix(captured: CapturedAudio) -> Result<MixedAudioBuffer, EmptyRecordingError> {
    let input: Vec<i16> = captured.input_blocks.concat();
    let output: Vec<i16> = captured.output_blocks.concat();
    mix_streams(&input, &output, captured.sample_rate)
}

/// Average two sample sequences, truncating to the shorter one
pub fn mix_streams(
    input: &[i16],
    output: &[i16],
    sample_rate: u32,
) -> Result<MixedAudioBuffer, EmptyRecordingError> {
    if input.is_empty() || output.is_empty() {
        return Err(EmptyRecordingError {
            input_samples: input.len(),
            output_samples: output.len(),
        });
    }

    let samples = input
        .iter()
        .zip(output.iter())
        .map(|(&a, &b)| average(a, b))
        .collect();

    Ok(MixedAudioBuffer::new(samples, sample_rate))
}

/// Mean of two samples, rounded half away from zero
fn average(a: i16, b: i16) -> i16 {
    let sum = a as i32 + b as i32;
    let rounded = if sum >= 0 { (sum + 1) / 2 } else { (sum - 1) / 2 };
    rounded as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(a: i16, b: i16) -> i16 {
        ((a as f64 + b as f64) / 2.0).round() as i16
    }

    #[test]
    fn output_length_is_shorter_stream() {
        let a = vec![1i16; 10];
        let b = vec![3i16; 7];
        let mixed = mix_streams(&a, &b, 44100).unwrap();
        assert_eq!(mixed.len(), 7);
        assert!(mixed.samples().iter().all(|&s| s == 2));

        let mixed = mix_streams(&b, &a, 44100).unwrap();
        assert_eq!(mixed.len(), 7);
    }

    #[test]
    fn samples_are_rounded_means() {
        let a = vec![0i16, 1, -1, 3, -3, i16::MAX, i16::MIN, i16::MAX, 12345];
        let b = vec![0i16, 0, 0, 0, 0, i16::MAX, i16::MIN, i16::MIN, -2];
        let mixed = mix_streams(&a, &b, 48000).unwrap();

        for (i, &s) in mixed.samples().iter().enumerate() {
            assert_eq!(s, expected(a[i], b[i]), "sample {}", i);
        }
        assert_eq!(mixed.samples()[1], 1);
        assert_eq!(mixed.samples()[2], -1);
        assert_eq!(mixed.samples()[5], i16::MAX);
        assert_eq!(mixed.samples()[6], i16::MIN);
    }

    #[test]
    fn silence_in_silence_out() {
        let zeros = vec![0i16; 4096];
        let mixed = mix_streams(&zeros, &zeros, 16000).unwrap();
        assert_eq!(mixed.len(), 4096);
        assert!(mixed.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = mix_streams(&[], &[1, 2, 3], 44100).unwrap_err();
        assert_eq!(err.input_samples, 0);
        assert_eq!(err.output_samples, 3);
    }

    #[test]
    fn empty_output_is_rejected() {
        let err = mix_streams(&[1, 2], &[], 44100).unwrap_err();
        assert_eq!(err.output_samples, 0);
    }

    #[test]
    fn mix_concatenates_blocks_in_order() {
        let captured = CapturedAudio {
            input_blocks: vec![vec![10, 20], vec![30], vec![40, 50]],
            output_blocks: vec![vec![0, 0, 0], vec![0]],
            sample_rate: 22050,
        };
        assert_eq!(captured.input_len(), 5);
        assert_eq!(captured.output_len(), 4);

        let mixed = mix(captured).unwrap();
        assert_eq!(mixed.samples(), &[5, 10, 15, 20]);
        assert_eq!(mixed.sample_rate(), 22050);
    }

    #[test]
    fn mix_with_only_empty_blocks_is_rejected() {
        let captured = CapturedAudio {
            input_blocks: vec![vec![], vec![]],
            output_blocks: vec![vec![1]],
            sample_rate: 44100,
        };
        assert!(mix(captured).is_err());
    }

    #[test]
    fn buffer_metrics() {
        let buffer = MixedAudioBuffer::new(vec![0; 44100], 44100);
        assert_eq!(buffer.pcm_bytes(), 88200);
        assert!((buffer.duration_secs() - 1.0).abs() < f64::EPSILON);
        assert!(!buffer.is_empty());
    }
}
