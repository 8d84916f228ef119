use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dispatcher state for one telephony connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingStart,
    Active,
    Stopped,
}

/// Final accounting for one session, returned when the dispatch loop exits.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub call_sid: String,
    pub stream_sid: String,
    pub started_at: DateTime<Utc>,
    pub state: SessionState,

    /// Media frames received from the telephony connection
    pub media_frames: usize,
    /// Frames converted and forwarded to transcription
    pub frames_forwarded: usize,
    /// Frames dropped (conversion failure or no transcription connection)
    pub frames_dropped: usize,
    /// DTMF digits observed, in order
    pub dtmf_digits: Vec<String>,
    /// Whether the timeout announcement played
    pub timeout_announced: bool,
}
