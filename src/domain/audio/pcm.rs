//! PCM sample helpers shared by the capture callbacks

/// Convert a normalized float sample to 16-bit PCM
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Convert an unsigned 16-bit sample (midpoint 32768) to signed PCM
pub fn u16_to_i16(sample: u16) -> i16 {
    (sample as i32 - 32768) as i16
}

/// Mix interleaved multi-channel samples down to mono
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}
