//! Bridge session management
//!
//! One session per inbound telephony connection:
//! - handshake validation (`connected` then `start`)
//! - per-event dispatch (media → convert → forward, dtmf/mark observed)
//! - timeout announcement, at most once
//! - teardown on every exit path, exactly once

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::CallSession;
pub use stats::{SessionState, SessionStats};
