use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== LLM WIRE MESSAGE =====

/// Chat-completions message (`role` is system / user / assistant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// ===== REQUEST MODELS =====

#[derive(Debug, Default, Deserialize)]
pub struct GetResponseRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiResponseRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub context: ContentContext,
}

/// Task metadata the teacher supplies with a content request
#[derive(Debug, Default, Deserialize)]
pub struct ContentContext {
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default, rename = "dueDate")]
    pub due_date: Option<String>,
    /// Accepts `10` as well as `"10"`
    #[serde(default)]
    pub points: Option<Value>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzePerformanceRequest {
    #[serde(default, rename = "studentData")]
    pub student_data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestRepliesRequest {
    #[serde(default)]
    pub conversation: Option<String>,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub message: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PerformanceInsights {
    pub message: String,
    pub insights: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplySuggestions {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Trimmed, non-empty value of an optional text field
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
