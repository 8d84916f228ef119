use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, warn};

use super::events::{OutboundMessage, TelephonyEvent};
use crate::error::BridgeError;

/// One telephony media-stream connection, as the session sees it.
///
/// The production implementation wraps the WebSocket the vendor dials into;
/// tests drive the session with a scripted implementation instead.
#[async_trait]
pub trait TelephonyStream: Send {
    /// Next event in arrival order. `Ok(None)` means the peer disconnected.
    async fn recv(&mut self) -> Result<Option<TelephonyEvent>, BridgeError>;

    /// Send one outbound message (media frame or mark).
    async fn send(&mut self, msg: &OutboundMessage) -> Result<(), BridgeError>;

    /// Close the connection. Best-effort; errors are for logging only.
    async fn close(&mut self) -> Result<(), BridgeError>;
}

/// `TelephonyStream` over an accepted axum WebSocket.
pub struct WebSocketStream {
    socket: WebSocket,
}

impl WebSocketStream {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl TelephonyStream for WebSocketStream {
    async fn recv(&mut self) -> Result<Option<TelephonyEvent>, BridgeError> {
        loop {
            let msg = match self.socket.recv().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => return Err(BridgeError::Transport(e.to_string())),
                None => return Ok(None),
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<TelephonyEvent>(&text) {
                    Ok(event) => return Ok(Some(event)),
                    Err(e) => {
                        // Vendors occasionally ship events we don't model;
                        // skip rather than kill the stream.
                        warn!("unparseable telephony event: {}", e);
                    }
                },
                Message::Close(_) => return Ok(None),
                Message::Binary(_) => {
                    warn!("unexpected binary frame on telephony stream, skipping");
                }
                Message::Ping(_) | Message::Pong(_) => {
                    debug!("websocket keepalive");
                }
            }
        }
    }

    async fn send(&mut self, msg: &OutboundMessage) -> Result<(), BridgeError> {
        let text =
            serde_json::to_string(msg).map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BridgeError> {
        self.socket
            .send(Message::Close(None))
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))
    }
}
