// ============================================================================
// Chat API - Message Handlers
// File: crates/chat-api/src/handlers/messages.rs
// ============================================================================
//! Send, list and stream private messages

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use tracing::{error, info};
use validator::Validate;

use chat_core::domain::Message;
use chat_shared::constants::DEFAULT_FETCH_LIMIT;

use crate::dto::{ConversationQuery, MessageDto, SendMessageRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Send handler - POST /api/v1/messages
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageDto>>), ApiError> {
    payload.validate()?;

    let message = state
        .chat
        .send_message(&payload.sender_id, &payload.recipient_id, &payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(MessageDto::from(&message)))))
}

/// List handler - GET /api/v1/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>, ApiError> {
    query.validate()?;

    let messages = state
        .chat
        .fetch_recent_messages_with_limit(
            &query.participant_a,
            &query.participant_b,
            query.limit.unwrap_or(DEFAULT_FETCH_LIMIT),
        )
        .await?;

    Ok(Json(ApiResponse::success(
        messages.iter().map(MessageDto::from).collect(),
    )))
}

/// Stream handler - GET /api/v1/messages/stream (Server-Sent Events)
pub async fn stream_messages(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    query.validate()?;

    let stream = state
        .chat
        .message_stream(&query.participant_a, &query.participant_b)
        .await?;
    info!(
        "Streaming messages between {} and {}",
        query.participant_a, query.participant_b
    );

    let events = stream.map(|message| Ok(message_event(&message)));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn message_event(message: &Message) -> Event {
    match Event::default()
        .event("message")
        .id(message.id.to_string())
        .json_data(MessageDto::from(message))
    {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to encode message {}: {}", message.id, e);
            Event::default().event("error").data("encoding failed")
        }
    }
}
