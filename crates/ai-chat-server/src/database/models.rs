use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AnnouncementRecord {
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub author: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub points: String,
    pub created_at: DateTime<Utc>,
}

/// Student profile fields exposed to the model (never the password hash)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProfileRecord {
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub year: String,
    pub division: String,
}
