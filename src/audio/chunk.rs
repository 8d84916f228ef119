//! Fixed-duration framing for outbound playback
//!
//! Synthesized announcement audio comes back as one μ-law buffer; the
//! telephony stream expects it in real-time-sized media frames. Frames are
//! sized to a wall-clock duration so the sender can pace transmission by
//! sleeping one frame duration per send.

use std::time::Duration;

use super::convert::TELEPHONY_SAMPLE_RATE;

/// Default outbound frame duration (approximates the vendor's media cadence).
pub const DEFAULT_FRAME_MS: u64 = 40;

/// Split μ-law audio into frames of `frame_ms` each. μ-law is one byte per
/// sample, so at 8 kHz a 40 ms frame is 320 bytes. The final frame may be
/// shorter; no audio is discarded.
pub fn frames(audio: &[u8], frame_ms: u64) -> impl Iterator<Item = &[u8]> {
    let frame_bytes = ((TELEPHONY_SAMPLE_RATE as u64 * frame_ms) / 1000).max(1) as usize;
    audio.chunks(frame_bytes)
}

/// Playback duration of a μ-law frame, used as the inter-send pacing sleep.
pub fn frame_duration(frame_len: usize) -> Duration {
    Duration::from_micros(frame_len as u64 * 1_000_000 / TELEPHONY_SAMPLE_RATE as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cover_all_bytes() {
        let audio = vec![0u8; 1000];
        let parts: Vec<&[u8]> = frames(&audio, DEFAULT_FRAME_MS).collect();

        assert_eq!(parts.len(), 4); // 320 + 320 + 320 + 40
        assert_eq!(parts[0].len(), 320);
        assert_eq!(parts[3].len(), 40);
        assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), 1000);
    }

    #[test]
    fn frame_duration_matches_sample_rate() {
        assert_eq!(frame_duration(320), Duration::from_millis(40));
        assert_eq!(frame_duration(8000), Duration::from_secs(1));
    }
}
