//! HTTP API server
//!
//! This module exposes the service surface:
//! - GET /stream - telephony media-stream WebSocket (bridge sessions)
//! - POST /voice - TwiML pointing the vendor at /stream
//! - GET /calls - active sessions
//! - GET /calls/:call_sid/transcript - accumulated transcript
//! - POST /calls/place - outbound agent-call placement
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, CallInfo};
