use crate::models::chat::{MessageResponse, ResetRequest};
use crate::services::MemoryRegistry;
use crate::utils::error::ApiError;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

/// Clear one user's conversation, or all of them when no `user_id` is given.
/// An empty body or `null` counts as "no user_id".
pub async fn reset_conversations_handler(
    State(memory): State<Arc<MemoryRegistry>>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = parse_reset_request(&body)?;

    let (status, message) = match request.user_id {
        None => {
            let removed = memory.reset_all();
            info!("Reset all conversations ({} users)", removed);
            (StatusCode::OK, "All conversations have been reset.".to_string())
        }
        Some(user_id) if memory.reset(&user_id) => {
            info!("Reset conversation for user {}", user_id);
            (StatusCode::OK, format!("Conversation for user {} has been reset.", user_id))
        }
        Some(user_id) => (
            StatusCode::NOT_FOUND,
            format!("No conversation found for user {}.", user_id),
        ),
    };

    Ok((status, Json(MessageResponse { message })))
}

fn parse_reset_request(body: &[u8]) -> Result<ResetRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResetRequest::default());
    }

    serde_json::from_slice::<Option<ResetRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}
