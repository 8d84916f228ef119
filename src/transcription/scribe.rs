use async_trait::async_trait;
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::sink::TranscriptSink;
use crate::error::BridgeError;

type WsSink = futures::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    tungstenite::Message,
>;

const SCRIBE_ENDPOINT: &str = "wss://api.elevenlabs.io/v1/speech-to-text/realtime";
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Settings for the realtime transcription connection.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub model_id: String,
    pub language_code: String,
    /// Rate the connection is opened with; every forwarded frame must
    /// already be PCM at this rate.
    pub sample_rate: u32,
    pub vad_threshold: f32,
    pub vad_silence_threshold: f32,
    pub min_speech_duration_ms: u64,
    pub min_silence_duration_ms: u64,
}

impl TranscriptionConfig {
    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self {
            api_key: cfg.elevenlabs_api_key.clone(),
            model_id: cfg.elevenlabs_scribe_model_id.clone(),
            language_code: cfg.elevenlabs_language_code.clone(),
            sample_rate: cfg.scribe_sample_rate,
            vad_threshold: cfg.vad_threshold,
            vad_silence_threshold: cfg.vad_silence_threshold,
            min_speech_duration_ms: cfg.min_speech_duration_ms,
            min_silence_duration_ms: cfg.min_silence_duration_ms,
        }
    }
}

/// Events the transcription service pushes over its connection.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScribeEvent {
    PartialTranscript {
        #[serde(default)]
        text: String,
    },
    CommittedTranscript {
        #[serde(default)]
        text: String,
    },
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

/// One forwarded-audio target, as the session sees it. Production is the
/// vendor connection below; tests substitute a recording mock.
#[async_trait]
pub trait Transcriber: Send {
    /// Forward one converted PCM frame.
    async fn send(&mut self, pcm: &[u8]) -> Result<(), BridgeError>;

    /// Ask the service to flush buffered audio as a final segment.
    async fn commit(&mut self) -> Result<(), BridgeError>;

    /// Release the connection.
    async fn close(&mut self) -> Result<(), BridgeError>;
}

/// Establishes transcription connections for new sessions.
///
/// Returning `None` is the degraded mode: the session keeps draining
/// telephony audio but drops every frame.
#[async_trait]
pub trait TranscriberFactory: Send + Sync {
    async fn connect(&self, call_sid: &str, sink: TranscriptSink) -> Option<Box<dyn Transcriber>>;
}

/// Realtime transcription connection to the vendor WebSocket.
pub struct ScribeConnection {
    call_sid: String,
    sample_rate: u32,
    ws_tx: WsSink,
    reader: Option<JoinHandle<()>>,
}

impl ScribeConnection {
    /// Open the connection and spawn the reader task that owns the sink.
    pub async fn connect(
        call_sid: &str,
        config: &TranscriptionConfig,
        mut sink: TranscriptSink,
    ) -> Result<Self, BridgeError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(BridgeError::MissingConfig("ELEVENLABS_API_KEY"))?;

        let url = format!(
            "{}?model_id={}&language_code={}&audio_format=pcm_{}&vad_threshold={}&vad_silence_threshold={}&min_speech_duration_ms={}&min_silence_duration_ms={}",
            SCRIBE_ENDPOINT,
            config.model_id,
            config.language_code,
            config.sample_rate,
            config.vad_threshold,
            config.vad_silence_threshold,
            config.min_speech_duration_ms,
            config.min_silence_duration_ms,
        );

        let request = tungstenite::http::Request::builder()
            .uri(&url)
            .header("Host", "api.elevenlabs.io")
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .header("Sec-WebSocket-Version", "13")
            .header(
                "Sec-WebSocket-Key",
                tungstenite::handshake::client::generate_key(),
            )
            .header("xi-api-key", api_key)
            .body(())
            .map_err(|e| BridgeError::Transport(format!("bad scribe request: {}", e)))?;

        let (ws, _) = connect_async(request)
            .await
            .map_err(|e| BridgeError::Transport(format!("scribe connect failed: {}", e)))?;

        let (ws_tx, mut ws_rx) = ws.split();

        // Reader task: dispatch service events in delivery order. Committed
        // text goes to the sink; everything else is observability only.
        let reader_call_sid = call_sid.to_string();
        let reader = tokio::spawn(async move {
            while let Some(msg) = ws_rx.next().await {
                let text = match msg {
                    Ok(tungstenite::Message::Text(t)) => t,
                    Ok(tungstenite::Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        error!(call_sid = %reader_call_sid, "scribe connection error: {}", e);
                        break;
                    }
                };

                match serde_json::from_str::<ScribeEvent>(&text) {
                    Ok(ScribeEvent::PartialTranscript { text }) => {
                        if !text.is_empty() {
                            debug!(call_sid = %reader_call_sid, "partial transcript: {}", text);
                        }
                    }
                    Ok(ScribeEvent::CommittedTranscript { text }) => {
                        if text.is_empty() {
                            continue;
                        }
                        info!(call_sid = %reader_call_sid, "committed transcript: {}", text);
                        if let Err(e) = sink.append(&text) {
                            error!(call_sid = %reader_call_sid, "{:#}", e);
                        }
                    }
                    Ok(ScribeEvent::Error { message }) => {
                        error!(call_sid = %reader_call_sid, "scribe reported error: {}", message);
                    }
                    Ok(ScribeEvent::Other) => {
                        debug!(call_sid = %reader_call_sid, "unhandled scribe event");
                    }
                    Err(e) => {
                        warn!(call_sid = %reader_call_sid, "unparseable scribe event: {}", e);
                    }
                }
            }
            info!(call_sid = %reader_call_sid, "scribe connection closed");
        });

        Ok(Self {
            call_sid: call_sid.to_string(),
            sample_rate: config.sample_rate,
            ws_tx,
            reader: Some(reader),
        })
    }
}

#[async_trait]
impl Transcriber for ScribeConnection {
    async fn send(&mut self, pcm: &[u8]) -> Result<(), BridgeError> {
        let msg = serde_json::json!({
            "audio_base_64": base64::engine::general_purpose::STANDARD.encode(pcm),
            "sample_rate": self.sample_rate,
        });
        self.ws_tx
            .send(tungstenite::Message::Text(msg.to_string()))
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))
    }

    async fn commit(&mut self) -> Result<(), BridgeError> {
        let msg = serde_json::json!({ "type": "commit" });
        self.ws_tx
            .send(tungstenite::Message::Text(msg.to_string()))
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BridgeError> {
        let result = self
            .ws_tx
            .send(tungstenite::Message::Close(None))
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()));

        // Give the reader a bounded window to drain final segments.
        if let Some(mut reader) = self.reader.take() {
            if tokio::time::timeout(CLOSE_GRACE, &mut reader).await.is_err() {
                warn!(call_sid = %self.call_sid, "scribe reader did not finish in time");
                reader.abort();
            }
        }

        result
    }
}

/// Production factory: missing credentials or a failed connect both yield
/// `None`, logged as a degraded-mode condition rather than a session error.
pub struct ScribeFactory {
    config: TranscriptionConfig,
}

impl ScribeFactory {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscriberFactory for ScribeFactory {
    async fn connect(&self, call_sid: &str, sink: TranscriptSink) -> Option<Box<dyn Transcriber>> {
        if self.config.api_key.is_none() {
            error!(call_sid, "ELEVENLABS_API_KEY not set; skipping transcription");
            return None;
        }

        match ScribeConnection::connect(call_sid, &self.config, sink).await {
            Ok(conn) => Some(Box::new(conn)),
            Err(e) => {
                error!(call_sid, "failed to connect transcription: {}", e);
                None
            }
        }
    }
}
