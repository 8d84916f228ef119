pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod outbound;
pub mod session;
pub mod synthesis;
pub mod telephony;
pub mod transcription;

pub use config::Config;
pub use error::BridgeError;
pub use http::{create_router, AppState};
pub use session::{CallSession, SessionConfig, SessionState, SessionStats};
pub use telephony::{OutboundMessage, TelephonyEvent, TelephonyStream};
pub use transcription::{Transcriber, TranscriberFactory, TranscriptSink, TranscriptionConfig};
