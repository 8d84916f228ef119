//! Speech synthesis
//!
//! Announcement audio is requested directly in the telephony-native μ-law
//! 8 kHz encoding so it can be framed and sent outbound without a second
//! conversion step.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::BridgeError;

const TTS_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// Text in, μ-law 8 kHz bytes out.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BridgeError>;
}

/// Vendor text-to-speech client.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: Option<String>,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.elevenlabs_api_key.clone(),
            voice_id: config.elevenlabs_voice_id.clone(),
            model_id: config.elevenlabs_tts_model_id.clone(),
        }
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BridgeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BridgeError::MissingConfig("ELEVENLABS_API_KEY"))?;

        let url = format!("{}/{}?output_format=ulaw_8000", TTS_ENDPOINT, self.voice_id);

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&json!({
                "text": text,
                "model_id": self.model_id,
            }))
            .send()
            .await
            .map_err(|e| BridgeError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BridgeError::Synthesis(format!(
                "tts returned {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Synthesis(e.to_string()))?
            .to_vec();

        debug!("synthesized {} bytes of ulaw audio", audio.len());
        Ok(audio)
    }
}
