//! Outbound agent-call placement
//!
//! Thin client for the vendor's conversational-agent outbound-call endpoint.
//! The agent dials the meeting's phone number and keys in the credentials
//! with its DTMF tool; once connected, the vendor opens a media stream back
//! into `/stream` and the bridge session takes over.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::Config;
use crate::error::BridgeError;

const OUTBOUND_CALL_ENDPOINT: &str = "https://api.elevenlabs.io/v1/convai/twilio/outbound-call";

const MEETING_JOIN_PROMPT: &str = "You are joining a meeting. You are speaking with the \
meeting provider's phone robot until you have joined the meeting. Use your keypad touch tool \
to join the call. Keep entering the code until you are let into the meeting. First enter the \
meeting ID as instructed (if present), then when prompted enter the passcode. Each keypad tool \
call should carry exactly one character; use many tool calls to input.";

#[derive(Debug, Deserialize)]
pub struct PlaceCallRequest {
    /// International format, e.g. +442039563891
    pub phone_number: String,
    /// Meeting ID / passcode blurb appended to the agent prompt
    pub meeting_details: Option<String>,
    /// Caller-supplied correlation id
    pub call_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceCallResponse {
    pub success: bool,
    pub phone_number: String,
    pub call_id: Option<String>,
    pub conversation_id: Option<String>,
    pub status: String,
    pub timestamp: String,
}

/// Ask the vendor to place the call. Missing credentials surface as
/// `MissingConfig`; vendor rejections as `Transport` with the status text.
pub async fn place_call(
    client: &reqwest::Client,
    config: &Config,
    req: &PlaceCallRequest,
) -> Result<PlaceCallResponse, BridgeError> {
    let api_key = config
        .elevenlabs_api_key
        .as_deref()
        .ok_or(BridgeError::MissingConfig("ELEVENLABS_API_KEY"))?;
    let agent_id = config
        .elevenlabs_agent_id
        .as_deref()
        .ok_or(BridgeError::MissingConfig("ELEVENLABS_AGENT_ID"))?;
    let phone_number_id = config
        .elevenlabs_phone_number_id
        .as_deref()
        .ok_or(BridgeError::MissingConfig("ELEVENLABS_PHONE_NUMBER_ID"))?;

    let call_id = req
        .call_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let mut prompt = MEETING_JOIN_PROMPT.to_string();
    if let Some(details) = &req.meeting_details {
        prompt.push('\n');
        prompt.push_str(details);
    }
    prompt.push_str("\n\nCALL ID: ");
    prompt.push_str(&call_id);

    let payload = json!({
        "agent_id": agent_id,
        "agent_phone_number_id": phone_number_id,
        "to_number": req.phone_number,
        "conversation_initiation_client_data": {
            "conversation_config_override": {
                "agent": {
                    "prompt": { "prompt": prompt }
                },
                "dynamic_variables": {
                    "call_id": call_id
                }
            }
        }
    });

    info!(phone_number = %req.phone_number, "placing outbound call");

    let response = client
        .post(OUTBOUND_CALL_ENDPOINT)
        .header("xi-api-key", api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| BridgeError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::Transport(format!(
            "outbound call rejected: {} {}",
            status, body
        )));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| BridgeError::Transport(e.to_string()))?;

    Ok(PlaceCallResponse {
        success: true,
        phone_number: req.phone_number.clone(),
        call_id: body
            .get("call_id")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        conversation_id: body
            .get("conversation_id")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        status: body
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("initiated")
            .to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
