use thiserror::Error;

/// Errors surfaced by the bridge.
///
/// Only `ProtocolViolation` during the telephony handshake is fatal to a
/// session; everything else is caught at its origin and degrades the
/// affected feature while the session keeps draining the stream.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The telephony connection sent something the handshake cannot accept.
    /// The connection has desynchronized and cannot be trusted.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Network failure on the telephony or transcription connection.
    #[error("transport error: {0}")]
    Transport(String),

    /// Speech synthesis unavailable or returned nothing usable.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// A required credential or setting is absent. The dependent feature
    /// becomes a no-op; the session itself never aborts on this.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl BridgeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::ProtocolViolation(_))
    }
}
