use crate::models::chat::*;
use crate::services::conversation::{Turn, DEFAULT_USER_ID};
use crate::services::PromptAssembler;
use crate::state::AppState;
use crate::utils::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;
use tracing::{debug, info};

/// `user_id` from the request, or the shared default conversation
fn resolve_user_id(user_id: Option<&str>) -> String {
    non_blank(user_id).unwrap_or(DEFAULT_USER_ID).to_string()
}

/// Run one turn of a user's conversation.
///
/// History is copied out and the window lock released before the LLM call.
/// The window is created and the exchange recorded only once the call has
/// succeeded, so a failed first request leaves no trace in the registry.
async fn converse(
    state: &AppState,
    user_id: &str,
    system_instruction: &str,
    message: &str,
) -> Result<String, ApiError> {
    let history = state
        .memory
        .get(user_id)
        .map(|window| window.history())
        .unwrap_or_default();
    debug!("User {} has {} turns of history", user_id, history.len());

    let messages = PromptAssembler::assemble(system_instruction, &history, message);
    let reply = state
        .llm
        .generate(&messages)
        .await
        .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;

    state
        .memory
        .get_or_create(user_id)
        .append_exchange(Turn::user(message), Turn::assistant(reply.clone()));
    Ok(reply)
}

pub async fn get_response_handler(
    State(state): State<AppState>,
    payload: Result<Json<GetResponseRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let start_time = Instant::now();
    let Json(request) = payload?;

    let message = non_blank(request.message.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;
    let user_id = resolve_user_id(request.user_id.as_deref());

    info!("Chat request: user={}, message_len={}", user_id, message.len());

    let system_instruction = &state.settings.prompts.chat_system_prompt;
    let response = converse(&state, &user_id, system_instruction, message).await?;

    info!(
        "Chat response for user {} in {}ms",
        user_id,
        start_time.elapsed().as_millis()
    );
    Ok(Json(ChatReply { response }))
}

pub async fn get_ai_response_handler(
    State(state): State<AppState>,
    payload: Result<Json<AiResponseRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let start_time = Instant::now();
    let Json(request) = payload?;

    let query = non_blank(request.query.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Query is required".to_string()))?;
    let user_id = resolve_user_id(request.user_id.as_deref());

    info!("Assistant request: user={}, query_len={}", user_id, query.len());

    let bundle = state
        .context
        .fetch(query, &user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{:#}", e)))?;

    let system_instruction = PromptAssembler::system_with_context(
        &state.settings.prompts.assistant_system_prompt,
        &bundle,
    )
    .map_err(|e| ApiError::InternalError(e.to_string()))?;

    let response = converse(&state, &user_id, &system_instruction, query).await?;

    info!(
        "Assistant response for user {} in {}ms (context: {})",
        user_id,
        start_time.elapsed().as_millis(),
        if bundle.is_empty() { "none" } else { "attached" }
    );
    Ok(Json(ChatReply { response }))
}
