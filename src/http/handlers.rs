use axum::{
    extract::{ws::WebSocketUpgrade, Host, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use super::state::{AppState, CallInfo};
use crate::error::BridgeError;
use crate::outbound::{self, PlaceCallRequest};
use crate::session::{CallSession, SessionConfig};
use crate::telephony::{TelephonyStream, WebSocketStream};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /stream
/// The telephony vendor dials in here with the call's media stream.
pub async fn stream_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(state, WebSocketStream::new(socket)))
}

async fn handle_stream(state: AppState, mut stream: WebSocketStream) {
    let config = SessionConfig::from_config(&state.config);

    let mut session = CallSession::new(config);
    if let Err(e) = session.handshake(&mut stream).await {
        // Handshake failure drops the connection with no audio sent.
        if e.is_fatal() {
            error!("telephony handshake failed: {}", e);
        } else {
            warn!("telephony stream ended during handshake: {}", e);
        }
        if let Err(close_err) = stream.close().await {
            warn!("error closing rejected stream: {}", close_err);
        }
        return;
    }

    let call_sid = session.call_sid().to_string();
    {
        let mut calls = state.calls.write().await;
        calls.insert(
            call_sid.clone(),
            CallInfo {
                call_sid: call_sid.clone(),
                stream_sid: session.stream_sid().to_string(),
                started_at: Utc::now(),
            },
        );
    }

    let stats = session
        .run(
            &mut stream,
            state.transcriber_factory.as_ref(),
            state.synthesizer.as_ref(),
        )
        .await;

    {
        let mut calls = state.calls.write().await;
        calls.remove(&call_sid);
    }

    info!(
        call_sid,
        media_frames = stats.media_frames,
        frames_forwarded = stats.frames_forwarded,
        frames_dropped = stats.frames_dropped,
        timeout_announced = stats.timeout_announced,
        "session finished"
    );
}

/// POST /voice
/// TwiML telling the telephony vendor to connect this call's media stream
/// to our /stream endpoint.
pub async fn voice_twiml(Host(host): Host) -> Response {
    let twiml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <Connect>
    <Stream url="wss://{}/stream" />
  </Connect>
</Response>
"#,
        host
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        twiml,
    )
        .into_response()
}

/// GET /calls
/// Active bridge sessions.
pub async fn list_calls(State(state): State<AppState>) -> impl IntoResponse {
    let calls = state.calls.read().await;
    let infos: Vec<CallInfo> = calls.values().cloned().collect();
    Json(infos)
}

/// GET /calls/:call_sid/transcript
/// Transcript accumulated so far (or final, once the call ended).
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(call_sid): Path<String>,
) -> Response {
    // Call sids are vendor-assigned opaque tokens; refuse anything that
    // could escape the transcription directory.
    if call_sid.contains('/') || call_sid.contains("..") {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid call id".to_string(),
            }),
        )
            .into_response();
    }

    let path = std::path::Path::new(&state.config.transcription_dir)
        .join(format!("{}.txt", call_sid));

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no transcript for call {}", call_sid),
            }),
        )
            .into_response(),
    }
}

/// POST /calls/place
/// Place an outbound agent call that will dial into a meeting.
pub async fn place_call(
    State(state): State<AppState>,
    Json(req): Json<PlaceCallRequest>,
) -> Response {
    match outbound::place_call(&state.http_client, &state.config, &req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e @ BridgeError::MissingConfig(_)) => {
            warn!("outbound call unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("outbound call failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
