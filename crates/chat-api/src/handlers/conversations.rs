//! Conversation handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{ConversationDto, ResolveConversationRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Resolve handler - POST /api/v1/conversations/resolve
pub async fn resolve_conversation(
    State(state): State<AppState>,
    Json(payload): Json<ResolveConversationRequest>,
) -> Result<Json<ApiResponse<ConversationDto>>, ApiError> {
    payload.validate()?;

    let conversation = state
        .chat
        .resolve_conversation(&payload.participant_a, &payload.participant_b)
        .await?;

    Ok(Json(ApiResponse::success(ConversationDto::from(&conversation))))
}
