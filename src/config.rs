use anyhow::Result;
use serde::Deserialize;

/// Service configuration, read from the environment.
///
/// Field names map 1:1 to environment variables (uppercased), e.g.
/// `transcription_dir` ← `TRANSCRIPTION_DIR`. Everything except the
/// vendor credentials has a usable default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP bind address
    pub http_bind: String,
    /// HTTP port
    pub http_port: u16,

    /// Directory for per-call transcript files
    pub transcription_dir: String,

    /// Vendor API key. Absent ⇒ transcription and synthesis degrade to no-ops.
    pub elevenlabs_api_key: Option<String>,
    /// Realtime transcription model
    pub elevenlabs_scribe_model_id: String,
    /// Transcription language
    pub elevenlabs_language_code: String,
    /// Synthesis voice
    pub elevenlabs_voice_id: String,
    /// Synthesis model
    pub elevenlabs_tts_model_id: String,

    /// Outbound agent-call credentials (optional feature)
    pub elevenlabs_agent_id: Option<String>,
    pub elevenlabs_phone_number_id: Option<String>,

    /// Seconds of call time before the timeout announcement plays
    pub call_timeout_secs: u64,
    /// What the announcement says
    pub timeout_announcement: String,

    /// Sample rate the transcription connection is opened with; inbound
    /// telephony audio is converted up from 8 kHz to this.
    pub scribe_sample_rate: u32,

    /// Voice-activity-detection tuning forwarded to the transcription service
    pub vad_threshold: f32,
    pub vad_silence_threshold: f32,
    pub min_speech_duration_ms: u64,
    pub min_silence_duration_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("http_bind", "0.0.0.0")?
            .set_default("http_port", 8000)?
            .set_default("transcription_dir", "transcriptions")?
            .set_default("elevenlabs_scribe_model_id", "scribe_v2_realtime")?
            .set_default("elevenlabs_language_code", "en")?
            .set_default("elevenlabs_voice_id", "21m00Tcm4TlvDq8ikWAM")?
            .set_default("elevenlabs_tts_model_id", "eleven_turbo_v2_5")?
            .set_default("call_timeout_secs", 5)?
            .set_default(
                "timeout_announcement",
                "Still waiting to be admitted to the meeting.",
            )?
            .set_default("scribe_sample_rate", 16000)?
            .set_default("vad_threshold", 0.5)?
            .set_default("vad_silence_threshold", 0.3)?
            .set_default("min_speech_duration_ms", 100)?
            .set_default("min_silence_duration_ms", 300)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
