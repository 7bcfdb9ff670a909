use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{conversations, health, messages};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/conversations/resolve", post(conversations::resolve_conversation))
        .route("/messages", post(messages::send_message).get(messages::list_messages))
        .route("/messages/stream", get(messages::stream_messages));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
        // CORS
        .layer(CorsLayer::permissive().max_age(Duration::from_secs(600)))
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
