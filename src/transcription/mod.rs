//! Realtime transcription
//!
//! Wraps the vendor's speech-to-text WebSocket: converted PCM frames go in,
//! partial and committed transcript events come back. Committed segments are
//! appended to a per-call sink; partials are observed but never persisted.

pub mod scribe;
pub mod sink;

pub use scribe::{ScribeConnection, ScribeFactory, Transcriber, TranscriberFactory, TranscriptionConfig};
pub use sink::TranscriptSink;
