use std::path::PathBuf;
use std::time::Duration;

use crate::audio::DEFAULT_FRAME_MS;

/// Per-session settings, derived from the service config at accept time.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Elapsed call time before the announcement plays
    pub timeout: Duration,

    /// What the announcement says
    pub announcement: String,

    /// PCM rate the transcription connection expects
    pub scribe_sample_rate: u32,

    /// Outbound announcement frame size (wall-clock)
    pub announce_frame_ms: u64,

    /// Where per-call transcript files live
    pub transcription_dir: PathBuf,
}

impl SessionConfig {
    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self {
            timeout: Duration::from_secs(cfg.call_timeout_secs),
            announcement: cfg.timeout_announcement.clone(),
            scribe_sample_rate: cfg.scribe_sample_rate,
            announce_frame_ms: DEFAULT_FRAME_MS,
            transcription_dir: PathBuf::from(&cfg.transcription_dir),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            announcement: "Still waiting to be admitted to the meeting.".to_string(),
            scribe_sample_rate: 16000,
            announce_frame_ms: DEFAULT_FRAME_MS,
            transcription_dir: PathBuf::from("transcriptions"),
        }
    }
}
