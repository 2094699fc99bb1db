//! One-shot helpers for the teacher dashboard. They do not use conversation memory.

use crate::models::chat::*;
use crate::services::prompt::non_empty_lines;
use crate::services::{LlmProvider, PromptAssembler};
use crate::utils::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const MAX_INSIGHTS: usize = 5;
const MAX_SUGGESTIONS: usize = 3;

pub async fn generate_content_handler(
    State(llm): State<Arc<dyn LlmProvider>>,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<GeneratedContent>, ApiError> {
    let Json(request) = payload?;

    let prompt = non_blank(request.prompt.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Prompt is required".to_string()))?;
    let content_type = non_blank(request.content_type.as_deref()).unwrap_or("task");
    let subject = non_blank(request.subject.as_deref()).unwrap_or("general");

    info!("Generate content request: type={}, subject={}", content_type, subject);

    let messages =
        PromptAssembler::content_generation(prompt, content_type, subject, &request.context);
    let content = llm
        .generate(&messages)
        .await
        .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;

    Ok(Json(GeneratedContent {
        message: "Content generated successfully".to_string(),
        content,
    }))
}

pub async fn analyze_performance_handler(
    State(llm): State<Arc<dyn LlmProvider>>,
    payload: Result<Json<AnalyzePerformanceRequest>, JsonRejection>,
) -> Result<Json<PerformanceInsights>, ApiError> {
    let Json(request) = payload?;

    let student_data = request
        .student_data
        .filter(|data| !is_blank(data))
        .ok_or_else(|| ApiError::BadRequest("Student data is required".to_string()))?;

    info!("Performance analysis request");

    let messages = PromptAssembler::performance_analysis(&student_data.to_string());
    let analysis = llm
        .generate(&messages)
        .await
        .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;

    Ok(Json(PerformanceInsights {
        message: "Analysis completed successfully".to_string(),
        insights: non_empty_lines(&analysis, MAX_INSIGHTS),
    }))
}

pub async fn suggest_replies_handler(
    State(llm): State<Arc<dyn LlmProvider>>,
    payload: Result<Json<SuggestRepliesRequest>, JsonRejection>,
) -> Result<Json<ReplySuggestions>, ApiError> {
    let Json(request) = payload?;

    let conversation = non_blank(request.conversation.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Conversation context is required".to_string()))?;

    info!("Reply suggestion request: conversation_len={}", conversation.len());

    let messages = PromptAssembler::reply_suggestions(conversation);
    let replies = llm
        .generate(&messages)
        .await
        .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;

    Ok(Json(ReplySuggestions {
        message: "Replies generated successfully".to_string(),
        suggestions: non_empty_lines(&replies, MAX_SUGGESTIONS),
    }))
}

/// Null, empty containers, empty strings, `false` and zero carry no data
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
