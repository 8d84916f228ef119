use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Telephony media stream entry point
        .route("/stream", get(handlers::stream_ws))
        .route("/voice", post(handlers::voice_twiml))
        // Call queries and control
        .route("/calls", get(handlers::list_calls))
        .route("/calls/place", post(handlers::place_call))
        .route(
            "/calls/:call_sid/transcript",
            get(handlers::get_transcript),
        )
        // Request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
