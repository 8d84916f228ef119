// Audio conversion properties: codec round-trip accuracy, frame-local
// conversion behavior, and outbound frame pacing math.

use dialbridge::audio::{convert_frame, frame_duration, frames, mulaw, DEFAULT_FRAME_MS};
use std::time::Duration;

#[test]
fn test_mulaw_roundtrip_error_bound() {
    // μ-law is lossy; the quantization step grows with magnitude. Sweep the
    // sample space and verify the decoded value stays within the segment's
    // expected error.
    let mut sample = i16::MIN as i32 + 1;
    while sample < i16::MAX as i32 {
        let original = sample as i16;
        let decoded = mulaw::decode(mulaw::encode(original));
        let error = (original as i32 - decoded as i32).abs();
        let bound = (original as i32).abs() / 8 + 16;
        assert!(
            error <= bound,
            "roundtrip error for {}: decoded {} (error {})",
            original,
            decoded,
            error
        );
        sample += 17; // odd stride to hit varied mantissas
    }
}

#[test]
fn test_mulaw_buffer_helpers() {
    let samples: Vec<i16> = vec![0, 1000, -1000, 30000, -30000];
    let encoded = mulaw::encode_buf(&samples);
    assert_eq!(encoded.len(), samples.len());

    let decoded = mulaw::decode_buf(&encoded);
    assert_eq!(decoded.len(), samples.len());
}

#[test]
fn test_convert_frame_rate_ratio() {
    // A 20ms telephony frame is 160 μ-law bytes. Converted to 16kHz PCM it
    // must stay 20ms: 320 samples, 640 bytes.
    let frame = vec![0x7Fu8; 160];
    let pcm = convert_frame(&frame, 16000).unwrap();
    assert_eq!(pcm.len(), 640);
}

#[test]
fn test_convert_frame_rejects_empty() {
    assert!(convert_frame(&[], 16000).is_none());
}

#[test]
fn test_convert_frame_rejects_fractional_ratio() {
    let frame = vec![0x7Fu8; 160];
    assert!(convert_frame(&frame, 22050).is_none());
    assert!(convert_frame(&frame, 0).is_none());
}

#[test]
fn test_convert_frame_is_frame_local() {
    // Converting the same bytes twice gives identical output: no carry
    // state between frames.
    let frame = vec![0x55u8; 160];
    let a = convert_frame(&frame, 16000).unwrap();
    let b = convert_frame(&frame, 16000).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_outbound_frames_cover_audio() {
    // 1 second of μ-law at 40ms frames: 25 full frames.
    let audio = vec![0u8; 8000];
    let parts: Vec<&[u8]> = frames(&audio, DEFAULT_FRAME_MS).collect();
    assert_eq!(parts.len(), 25);
    assert!(parts.iter().all(|p| p.len() == 320));
    assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), 8000);
}

#[test]
fn test_outbound_frame_pacing() {
    assert_eq!(frame_duration(320), Duration::from_millis(40));
    assert_eq!(frame_duration(160), Duration::from_millis(20));
}
