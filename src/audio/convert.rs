//! Inbound-frame format conversion
//!
//! Telephony frames arrive as μ-law bytes at 8 kHz; the transcription
//! connection is opened with linear PCM at a configured (higher) rate.
//! Conversion is frame-local: no resampler state survives between frames,
//! so a malformed frame can be dropped without corrupting its successors.

use super::mulaw;

pub const TELEPHONY_SAMPLE_RATE: u32 = 8000;

/// Convert one μ-law telephony frame to little-endian i16 PCM at
/// `target_rate`.
///
/// Returns `None` on malformed input (empty frame, unusable target rate);
/// the caller drops the frame. Output duration equals input duration:
/// sample count scales by `target_rate / 8000`.
pub fn convert_frame(mulaw_bytes: &[u8], target_rate: u32) -> Option<Vec<u8>> {
    if mulaw_bytes.is_empty() {
        return None;
    }
    if target_rate < TELEPHONY_SAMPLE_RATE || target_rate % TELEPHONY_SAMPLE_RATE != 0 {
        return None;
    }

    let pcm = mulaw::decode_buf(mulaw_bytes);
    let resampled = upsample(&pcm, (target_rate / TELEPHONY_SAMPLE_RATE) as usize);

    let mut out = Vec::with_capacity(resampled.len() * 2);
    for sample in resampled {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    Some(out)
}

/// Integer-ratio upsampling by linear interpolation. The final input sample
/// is held flat since the frame's successor is unknown.
fn upsample(samples: &[i16], ratio: usize) -> Vec<i16> {
    if ratio == 1 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len() * ratio);
    for (i, &current) in samples.iter().enumerate() {
        let next = samples.get(i + 1).copied().unwrap_or(current);
        for step in 0..ratio {
            let a = current as i32;
            let b = next as i32;
            let interpolated = a + (b - a) * step as i32 / ratio as i32;
            out.push(interpolated as i16);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_rejected() {
        assert!(convert_frame(&[], 16000).is_none());
    }

    #[test]
    fn bad_target_rate_is_rejected() {
        assert!(convert_frame(&[0xFF; 160], 11025).is_none());
        assert!(convert_frame(&[0xFF; 160], 4000).is_none());
    }

    #[test]
    fn duration_is_preserved() {
        // 160 μ-law samples = 20ms at 8kHz; at 16kHz that is 320 samples,
        // 640 bytes of i16 PCM.
        let frame = vec![0xFFu8; 160];
        let pcm = convert_frame(&frame, 16000).unwrap();
        assert_eq!(pcm.len(), 640);

        let same_rate = convert_frame(&frame, 8000).unwrap();
        assert_eq!(same_rate.len(), 320);
    }

    #[test]
    fn upsample_interpolates_between_samples() {
        let out = upsample(&[0, 100], 2);
        assert_eq!(out, vec![0, 50, 100, 100]);
    }
}
