use base64::Engine;
use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::stats::{SessionState, SessionStats};
use crate::audio;
use crate::error::BridgeError;
use crate::synthesis::Synthesizer;
use crate::telephony::{OutboundMessage, TelephonyEvent, TelephonyStream};
use crate::transcription::{Transcriber, TranscriberFactory, TranscriptSink};

/// One call's bridge session.
///
/// Owns the handshake, the event dispatch loop, the timeout announcement,
/// and teardown. The transcription connection (when one could be opened) is
/// exclusively owned here for the session's lifetime and closed on every
/// exit path exactly once.
pub struct CallSession {
    config: SessionConfig,
    call_sid: String,
    stream_sid: String,
    started: Instant,
    started_at: chrono::DateTime<Utc>,
    state: SessionState,
    timeout_announced: bool,

    media_frames: usize,
    frames_forwarded: usize,
    frames_dropped: usize,
    dtmf_digits: Vec<String>,
}

impl CallSession {
    /// A session starts with no identity; it stays in `AwaitingStart` until
    /// the vendor handshake supplies the call and stream ids.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            call_sid: String::new(),
            stream_sid: String::new(),
            started: Instant::now(),
            started_at: Utc::now(),
            state: SessionState::AwaitingStart,
            timeout_announced: false,
            media_frames: 0,
            frames_forwarded: 0,
            frames_dropped: 0,
            dtmf_digits: Vec::new(),
        }
    }

    /// Consume the vendor handshake: a `connected` acknowledgment (discarded)
    /// followed by a `start` event with non-empty call and stream ids, then
    /// transition to `Active`.
    ///
    /// A peer that hangs up mid-handshake is a transport condition; an event
    /// out of sequence means the connection has desynchronized and cannot be
    /// trusted. Only this phase of a session is allowed to fail.
    pub async fn handshake(&mut self, stream: &mut dyn TelephonyStream) -> Result<(), BridgeError> {
        let first = stream
            .recv()
            .await?
            .ok_or_else(|| BridgeError::Transport("disconnected before handshake".into()))?;

        if !matches!(first, TelephonyEvent::Connected) {
            return Err(BridgeError::ProtocolViolation(format!(
                "expected connected event, got {}",
                first.kind()
            )));
        }

        let second = stream
            .recv()
            .await?
            .ok_or_else(|| BridgeError::Transport("disconnected before start".into()))?;

        let (start, top_stream_sid) = match second {
            TelephonyEvent::Start { start, stream_sid } => (start, stream_sid),
            other => {
                return Err(BridgeError::ProtocolViolation(format!(
                    "expected start event, got {}",
                    other.kind()
                )))
            }
        };

        let call_sid = start.call_sid;
        let stream_sid = if start.stream_sid.is_empty() {
            top_stream_sid
        } else {
            start.stream_sid
        };

        if call_sid.is_empty() || stream_sid.is_empty() {
            return Err(BridgeError::ProtocolViolation(
                "start event missing call or stream id".into(),
            ));
        }

        info!(call_sid, stream_sid, "telephony stream started");

        self.call_sid = call_sid;
        self.stream_sid = stream_sid;
        // The timeout clock starts when the call does, not at construction.
        self.started = Instant::now();
        self.started_at = Utc::now();
        self.state = SessionState::Active;
        Ok(())
    }

    pub fn call_sid(&self) -> &str {
        &self.call_sid
    }

    pub fn stream_sid(&self) -> &str {
        &self.stream_sid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session to completion and tear everything down.
    ///
    /// Nothing past the handshake is fatal: transcription failures degrade,
    /// bad frames drop, synthesis failures skip the announcement. The loop
    /// keeps draining the telephony stream until `stop`, disconnect, or a
    /// transport error.
    pub async fn run(
        mut self,
        stream: &mut dyn TelephonyStream,
        factory: &dyn TranscriberFactory,
        synthesizer: &dyn Synthesizer,
    ) -> SessionStats {
        let mut transcriber = self.establish_transcription(factory).await;

        loop {
            // Elapsed-time check happens before each event so the
            // announcement never blocks or skips normal dispatch. No
            // separate timer: a silent stream never triggers it.
            if !self.timeout_announced && self.started.elapsed() >= self.config.timeout {
                self.timeout_announced = true;
                self.play_announcement(stream, synthesizer).await;
            }

            let event = match stream.recv().await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    info!(call_sid = %self.call_sid, "telephony stream disconnected");
                    break;
                }
                Err(e) => {
                    error!(call_sid = %self.call_sid, "telephony transport error: {}", e);
                    break;
                }
            };

            match event {
                TelephonyEvent::Stop => {
                    debug!(call_sid = %self.call_sid, stream_sid = %self.stream_sid, "call ended by vendor");
                    break;
                }
                TelephonyEvent::Media { media } => {
                    self.handle_media(&media.payload, &mut transcriber).await;
                }
                TelephonyEvent::Dtmf { dtmf } => {
                    info!(call_sid = %self.call_sid, "DTMF: {}", dtmf.digit);
                    self.dtmf_digits.push(dtmf.digit);
                }
                TelephonyEvent::Mark => {
                    debug!(call_sid = %self.call_sid, "mark event received");
                }
                TelephonyEvent::Connected | TelephonyEvent::Start { .. } => {
                    warn!(
                        call_sid = %self.call_sid,
                        "unexpected initialization event ({}) while active",
                        event.kind()
                    );
                }
                TelephonyEvent::Other => {
                    warn!(call_sid = %self.call_sid, "unknown telephony event, ignoring");
                }
            }
        }

        self.state = SessionState::Stopped;
        self.teardown(stream, transcriber).await;
        self.into_stats()
    }

    /// Open the transcript sink and the transcription connection. Either
    /// failing leaves the session in degraded mode: audio keeps being
    /// consumed (the vendor stream must not stall) but frames are dropped.
    async fn establish_transcription(
        &self,
        factory: &dyn TranscriberFactory,
    ) -> Option<Box<dyn Transcriber>> {
        let sink = match TranscriptSink::create(&self.config.transcription_dir, &self.call_sid) {
            Ok(sink) => sink,
            Err(e) => {
                error!(call_sid = %self.call_sid, "transcript sink unavailable, degrading: {:#}", e);
                return None;
            }
        };

        factory.connect(&self.call_sid, sink).await
    }

    /// Decode, convert, and forward one media frame. Every failure here
    /// drops the frame and nothing else.
    async fn handle_media(&mut self, payload: &str, transcriber: &mut Option<Box<dyn Transcriber>>) {
        self.media_frames += 1;

        let mulaw = match base64::engine::general_purpose::STANDARD.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(call_sid = %self.call_sid, "undecodable media payload, dropping frame: {}", e);
                self.frames_dropped += 1;
                return;
            }
        };

        let pcm = match audio::convert_frame(&mulaw, self.config.scribe_sample_rate) {
            Some(pcm) => pcm,
            None => {
                warn!(call_sid = %self.call_sid, "unconvertible media frame, dropping");
                self.frames_dropped += 1;
                return;
            }
        };

        match transcriber {
            Some(conn) => {
                if let Err(e) = conn.send(&pcm).await {
                    warn!(call_sid = %self.call_sid, "failed to forward audio frame: {}", e);
                    self.frames_dropped += 1;
                } else {
                    self.frames_forwarded += 1;
                }
            }
            None => {
                debug!(call_sid = %self.call_sid, "transcription unavailable; dropping media frame");
                self.frames_dropped += 1;
            }
        }
    }

    /// Synthesize the announcement and stream it to the caller in real-time
    /// frames. Fires at most once per session; failures skip, never retry.
    async fn play_announcement(
        &mut self,
        stream: &mut dyn TelephonyStream,
        synthesizer: &dyn Synthesizer,
    ) {
        info!(call_sid = %self.call_sid, "call timeout reached, playing announcement");

        let audio_bytes = match synthesizer.synthesize(&self.config.announcement).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(call_sid = %self.call_sid, "announcement synthesis failed, skipping: {}", e);
                return;
            }
        };

        if audio_bytes.is_empty() {
            warn!(call_sid = %self.call_sid, "announcement synthesis returned no audio, skipping");
            return;
        }

        // Pace transmission to real time so the vendor stream is not
        // flooded faster than it can play. Total sleep is bounded by the
        // announcement length.
        for frame in audio::frames(&audio_bytes, self.config.announce_frame_ms) {
            let msg = OutboundMessage::media(&self.stream_sid, frame);
            if let Err(e) = stream.send(&msg).await {
                warn!(call_sid = %self.call_sid, "failed to send announcement frame: {}", e);
                return;
            }
            tokio::time::sleep(audio::frame_duration(frame.len())).await;
        }

        let mark = OutboundMessage::mark(&self.stream_sid, "timeout-announcement");
        if let Err(e) = stream.send(&mark).await {
            warn!(call_sid = %self.call_sid, "failed to send announcement mark: {}", e);
        }
    }

    /// Release everything, in order: commit outstanding transcript audio,
    /// close the transcription connection, close the telephony connection.
    /// Close errors are logged and swallowed so a failing transcription
    /// close can never prevent the telephony close.
    async fn teardown(
        &mut self,
        stream: &mut dyn TelephonyStream,
        transcriber: Option<Box<dyn Transcriber>>,
    ) {
        if let Some(mut conn) = transcriber {
            if let Err(e) = conn.commit().await {
                warn!(call_sid = %self.call_sid, "error committing transcription: {}", e);
            }
            if let Err(e) = conn.close().await {
                warn!(call_sid = %self.call_sid, "error closing transcription: {}", e);
            }
        }

        if let Err(e) = stream.close().await {
            warn!(call_sid = %self.call_sid, "error closing telephony stream: {}", e);
        }

        info!(call_sid = %self.call_sid, "session torn down");
    }

    fn into_stats(self) -> SessionStats {
        SessionStats {
            call_sid: self.call_sid,
            stream_sid: self.stream_sid,
            started_at: self.started_at,
            state: self.state,
            media_frames: self.media_frames,
            frames_forwarded: self.frames_forwarded,
            frames_dropped: self.frames_dropped,
            dtmf_digits: self.dtmf_digits,
            timeout_announced: self.timeout_announced,
        }
    }
}
