use super::{AnnouncementRecord, DbPool, ProfileRecord, TaskRecord};
use anyhow::Result;
use tracing::debug;

/// Read-only lookups backing the context bundle
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContextStore: Send + Sync {
    async fn recent_announcements(&self, limit: i64) -> Result<Vec<AnnouncementRecord>>;
    async fn recent_tasks(&self, limit: i64) -> Result<Vec<TaskRecord>>;
    async fn find_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>>;
}

pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContextStore for Repository {
    /// Newest announcements first
    async fn recent_announcements(&self, limit: i64) -> Result<Vec<AnnouncementRecord>> {
        let rows = sqlx::query_as::<_, AnnouncementRecord>(
            r#"SELECT
                title,
                content,
                category,
                priority,
                author,
                date,
                created_at
               FROM announcements
               ORDER BY created_at DESC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Fetched {} announcements", rows.len());
        Ok(rows)
    }

    /// Newest tasks first
    async fn recent_tasks(&self, limit: i64) -> Result<Vec<TaskRecord>> {
        let rows = sqlx::query_as::<_, TaskRecord>(
            r#"SELECT
                title,
                description,
                subject,
                priority,
                due_date,
                points,
                created_at
               FROM tasks
               ORDER BY created_at DESC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Fetched {} tasks", rows.len());
        Ok(rows)
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        let profile = sqlx::query_as::<_, ProfileRecord>(
            r#"SELECT
                name,
                student_id,
                email,
                year,
                division
               FROM students
               WHERE student_id = $1
               LIMIT 1"#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.get_pool())
        .await?;

        debug!("Profile lookup for {}: found={}", user_id, profile.is_some());
        Ok(profile)
    }
}
