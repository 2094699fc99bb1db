use anyhow::Result;
use crate::models::chat::{ChatMessage, ContentContext};
use crate::services::context_service::ContextBundle;
use crate::services::conversation::Turn;

/// Builds chat-completions message lists from instructions, history and the
/// new user turn.
pub struct PromptAssembler;

impl PromptAssembler {
    /// `[system, ...history (oldest first), user]`
    pub fn assemble(
        system_instruction: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_instruction));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(user_text));
        messages
    }

    /// Base instruction followed by the context bundle as JSON.
    /// An empty bundle leaves the instruction unchanged.
    pub fn system_with_context(base_instruction: &str, bundle: &ContextBundle) -> Result<String> {
        if bundle.is_empty() {
            return Ok(base_instruction.to_string());
        }

        let data = serde_json::to_string_pretty(bundle)?;
        Ok(format!(
            "{}\n\nContext data (most recent records, JSON):\n{}",
            base_instruction, data
        ))
    }

    /// One-shot task description writer
    pub fn content_generation(
        prompt: &str,
        content_type: &str,
        subject: &str,
        context: &ContentContext,
    ) -> Vec<ChatMessage> {
        let audience = context.audience.as_deref().unwrap_or("students");
        let due_date = context.due_date.as_deref().unwrap_or("upcoming");
        let points = match &context.points {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "10".to_string(),
            Some(other) => other.to_string(),
        };
        let priority = context.priority.as_deref().unwrap_or("normal");

        let instruction = format!(
            "You are an educational assistant helping teachers write a clear \
             {content_type} description.\n\
             Write a concise, engaging {subject} {content_type} description that:\n\
             1. Speaks directly to students in a clear, genuine voice\n\
             2. Avoids filler phrases\n\
             3. Explains exactly what students need to do\n\
             4. Sets clear expectations and deliverables\n\
             5. Sounds natural and motivating\n\n\
             Context:\n\
             - Subject: {subject}\n\
             - Audience: {audience}\n\
             - Due date: {due_date}\n\
             - Points: {points}\n\
             - Priority: {priority}\n\n\
             Reply ONLY with the improved description text."
        );

        vec![ChatMessage::system(instruction), ChatMessage::user(prompt)]
    }

    pub fn performance_analysis(student_data: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are an educational data analyst. Analyze the provided student data \
                 and provide meaningful insights.",
            ),
            ChatMessage::user(format!(
                "Analyze this student data and provide 3-5 key insights: {}",
                student_data
            )),
        ]
    }

    pub fn reply_suggestions(conversation: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "Generate 3 short, professional replies for an educational platform \
                 conversation. Each reply should be no more than 10 words.",
            ),
            ChatMessage::user(format!(
                "Conversation: {}\n\nGenerate 3 short reply suggestions.",
                conversation
            )),
        ]
    }
}

/// Trimmed non-empty lines of a model reply, at most `max`
pub fn non_empty_lines(text: &str, max: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}
