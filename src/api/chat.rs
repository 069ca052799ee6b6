//! Chat API endpoints.
//!
//! Every turn persists two records: the user message and the assistant
//! reply. Generator failure falls back to canned replies and never fails
//! the request; only storage failures surface as errors.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::ApiResult;
use crate::contract;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, ChatRole, InsertChatMessage};
use crate::AppState;

/// POST /api/chat - Send a chat message and get the assistant reply.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ChatResponse>> {
    let request: ChatRequest = contract::parse_input(body)?;
    contract::validate_chat(&request)?;

    state
        .repo
        .create_chat_message(&InsertChatMessage {
            user_id: request.user_id,
            role: ChatRole::User,
            content: request.message.clone(),
        })
        .await?;

    // Prior context for the generator; empty for guests
    let history = state.repo.get_chat_history(request.user_id).await?;
    let reply = state.responder.respond(&history, &request.message).await;

    state
        .repo
        .create_chat_message(&InsertChatMessage {
            user_id: request.user_id,
            role: ChatRole::Assistant,
            content: reply.clone(),
        })
        .await?;

    Ok(Json(ChatResponse { response: reply }))
}

/// Query parameters for chat history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryQuery {
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// GET /api/chat/history - Fetch a user's chat history, oldest first.
///
/// Guests get an empty list; guest history is not persisted per user.
pub async fn chat_history(
    State(state): State<AppState>,
    Query(query): Query<ChatHistoryQuery>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let messages = state.repo.get_chat_history(query.user_id).await?;
    Ok(Json(messages))
}
