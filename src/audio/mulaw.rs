//! G.711 μ-law codec
//!
//! Telephony media streams carry companded 8-bit μ-law samples at 8 kHz.
//! Both directions are stateless per sample, so frames can be converted
//! independently with no cross-frame carry.

const BIAS: i16 = 0x84;
const CLIP: i16 = 32635;

/// Decode one μ-law byte to a linear 16-bit PCM sample.
pub fn decode(mulaw: u8) -> i16 {
    let mulaw = !mulaw;
    let sign = (mulaw & 0x80) != 0;
    let exponent = ((mulaw >> 4) & 0x07) as i16;
    let mantissa = (mulaw & 0x0F) as i16;

    let magnitude = (((mantissa << 3) + BIAS) << exponent) - BIAS;

    if sign {
        -magnitude
    } else {
        magnitude
    }
}

/// Encode one linear 16-bit PCM sample to a μ-law byte.
pub fn encode(linear: i16) -> u8 {
    let mut linear = linear;

    let sign: u8 = if linear < 0 {
        linear = linear.saturating_neg();
        0x80
    } else {
        0x00
    };

    if linear > CLIP {
        linear = CLIP;
    }
    linear += BIAS;

    // Segment lookup: smallest i with linear <= 0xFF << i
    let mut exponent: u8 = 7;
    for i in 0..8u8 {
        if linear <= (0xFF << i) {
            exponent = i;
            break;
        }
    }

    let mantissa = ((linear >> (exponent + 3)) & 0x0F) as u8;

    !(sign | (exponent << 4) | mantissa)
}

/// Decode a buffer of μ-law bytes to PCM samples.
pub fn decode_buf(data: &[u8]) -> Vec<i16> {
    data.iter().map(|&b| decode(b)).collect()
}

/// Encode a buffer of PCM samples to μ-law bytes.
pub fn encode_buf(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&s| encode(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_stays_within_codec_error() {
        // μ-law quantization error grows with magnitude; the bound below
        // covers the largest segment.
        for &original in &[0i16, 100, -100, 1000, -1000, 8000, -8000, 32000, -32000] {
            let decoded = decode(encode(original));
            let error = (original as i32 - decoded as i32).abs();
            let bound = (original as i32).abs() / 8 + 16;
            assert!(
                error <= bound,
                "roundtrip error too large: {} -> {} (error {})",
                original,
                decoded,
                error
            );
        }
    }

    #[test]
    fn silence_encodes_stably() {
        let byte = encode(0);
        let decoded = decode(byte);
        assert!(decoded.abs() <= 8, "near-zero expected, got {}", decoded);
    }
}
