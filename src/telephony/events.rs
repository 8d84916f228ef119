use base64::Engine;
use serde::{Deserialize, Serialize};

/// Inbound events on the telephony media-stream connection, tagged by the
/// vendor's `event` field. Unknown kinds deserialize to `Other` so the
/// dispatcher can log and keep going.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyEvent {
    /// Initial acknowledgment; consumed and discarded during handshake
    Connected,
    Start {
        start: StartPayload,
        #[serde(rename = "streamSid", default)]
        stream_sid: String,
    },
    Media {
        media: MediaPayload,
    },
    Dtmf {
        dtmf: DtmfPayload,
    },
    Mark,
    Stop,
    #[serde(other)]
    Other,
}

impl TelephonyEvent {
    /// Event kind for log context.
    pub fn kind(&self) -> &'static str {
        match self {
            TelephonyEvent::Connected => "connected",
            TelephonyEvent::Start { .. } => "start",
            TelephonyEvent::Media { .. } => "media",
            TelephonyEvent::Dtmf { .. } => "dtmf",
            TelephonyEvent::Mark => "mark",
            TelephonyEvent::Stop => "stop",
            TelephonyEvent::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartPayload {
    /// Vendor-assigned call identifier
    #[serde(rename = "callSid", default)]
    pub call_sid: String,
    /// Stream identifier, also echoed at the event's top level
    #[serde(rename = "streamSid", default)]
    pub stream_sid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    /// Base64 μ-law audio
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DtmfPayload {
    #[serde(default)]
    pub digit: String,
}

/// Messages sent back to the telephony connection, addressed by stream id.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum OutboundMessage {
    Media {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        media: OutboundMedia,
    },
    Mark {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        mark: OutboundMark,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundMedia {
    /// Base64 μ-law audio
    pub payload: String,
    /// Sample rate of the payload
    pub rate: u32,
    /// Which call leg the audio plays on
    pub track: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundMark {
    pub name: String,
}

impl OutboundMessage {
    /// Outbound media frame carrying μ-law audio for the caller.
    pub fn media(stream_sid: &str, mulaw: &[u8]) -> Self {
        OutboundMessage::Media {
            stream_sid: stream_sid.to_string(),
            media: OutboundMedia {
                payload: base64::engine::general_purpose::STANDARD.encode(mulaw),
                rate: crate::audio::TELEPHONY_SAMPLE_RATE,
                track: "outbound".to_string(),
            },
        }
    }

    /// Mark event used to learn when queued outbound audio finished playing.
    pub fn mark(stream_sid: &str, name: &str) -> Self {
        OutboundMessage::Mark {
            stream_sid: stream_sid.to_string(),
            mark: OutboundMark {
                name: name.to_string(),
            },
        }
    }
}
