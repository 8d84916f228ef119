//! Telephony media-stream protocol
//!
//! JSON events over a persistent WebSocket: `connected`, `start`, `media`,
//! `dtmf`, `mark`, `stop` inbound; `media`/`mark` outbound addressed by
//! stream id. Audio payloads are base64 μ-law at 8 kHz in both directions.

pub mod events;
pub mod stream;

pub use events::{DtmfPayload, MediaPayload, OutboundMedia, OutboundMessage, StartPayload, TelephonyEvent};
pub use stream::{TelephonyStream, WebSocketStream};
