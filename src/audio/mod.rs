pub mod chunk;
pub mod convert;
pub mod mulaw;

pub use chunk::{frame_duration, frames, DEFAULT_FRAME_MS};
pub use convert::{convert_frame, TELEPHONY_SAMPLE_RATE};
