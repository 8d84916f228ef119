use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::synthesis::{ElevenLabsSynthesizer, Synthesizer};
use crate::transcription::{ScribeFactory, TranscriberFactory, TranscriptionConfig};

/// Registry entry for one live session.
#[derive(Debug, Clone, Serialize)]
pub struct CallInfo {
    pub call_sid: String,
    pub stream_sid: String,
    pub started_at: DateTime<Utc>,
}

/// Shared application state for HTTP handlers.
///
/// The call registry has a defined lifecycle: sessions register after a
/// successful handshake and unregister during teardown. Handlers receive it
/// through axum state, never as ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Active bridge sessions (call_sid → info)
    pub calls: Arc<RwLock<HashMap<String, CallInfo>>>,

    pub transcriber_factory: Arc<dyn TranscriberFactory>,
    pub synthesizer: Arc<dyn Synthesizer>,

    /// Shared client for the outbound-call REST endpoint
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let transcriber_factory = Arc::new(ScribeFactory::new(TranscriptionConfig::from_config(
            &config,
        )));
        let synthesizer = Arc::new(ElevenLabsSynthesizer::new(&config));

        Self {
            config: Arc::new(config),
            calls: Arc::new(RwLock::new(HashMap::new())),
            transcriber_factory,
            synthesizer,
            http_client: reqwest::Client::new(),
        }
    }
}
