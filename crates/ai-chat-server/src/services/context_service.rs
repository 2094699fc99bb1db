/// Context Fetcher
/// Picks record categories from keywords in the user's query and loads the
/// newest few records of each picked category.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::database::repository::ContextStore;
use crate::database::{AnnouncementRecord, ProfileRecord, TaskRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextCategory {
    Announcements,
    Tasks,
    Profile,
}

impl ContextCategory {
    pub const ALL: [ContextCategory; 3] = [Self::Announcements, Self::Tasks, Self::Profile];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Announcements => &[
                "announcement",
                "announcements",
                "news",
                "notice",
                "update",
                "updates",
                "event",
                "events",
            ],
            Self::Tasks => &[
                "task",
                "tasks",
                "assignment",
                "assignments",
                "homework",
                "deadline",
                "due",
                "project",
            ],
            Self::Profile => &[
                "my profile",
                "profile",
                "my details",
                "about me",
                "my name",
                "my email",
                "my year",
                "my division",
                "who am i",
            ],
        }
    }

    /// Every category the query mentions, matched case-insensitively; each is
    /// checked on its own
    pub fn detect(query: &str) -> Vec<ContextCategory> {
        let query_lower = query.to_lowercase();
        let detected: Vec<_> = Self::ALL
            .into_iter()
            .filter(|c| c.keywords().iter().any(|k| query_lower.contains(k)))
            .collect();

        debug!("Detected context categories {:?}", detected);
        detected
    }
}

/// Records injected into the assistant prompt. Categories the query did not
/// mention are left out of the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContextBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcements: Option<Vec<AnnouncementRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,
}

impl ContextBundle {
    pub fn is_empty(&self) -> bool {
        self.announcements.is_none() && self.tasks.is_none() && self.profile.is_none()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContextProvider: Send + Sync {
    async fn fetch(&self, query: &str, user_id: &str) -> Result<ContextBundle>;
}

pub struct ContextService {
    store: Arc<dyn ContextStore>,
    max_records: i64,
}

impl ContextService {
    pub fn new(store: Arc<dyn ContextStore>, max_records: i64) -> Self {
        Self {
            store,
            max_records: max_records.max(1),
        }
    }
}

#[async_trait::async_trait]
impl ContextProvider for ContextService {
    async fn fetch(&self, query: &str, user_id: &str) -> Result<ContextBundle> {
        let categories = ContextCategory::detect(query);
        let wants = |c: ContextCategory| categories.contains(&c);
        let limit = self.max_records;

        // Lookups are independent, run them together
        let announcements = async {
            if wants(ContextCategory::Announcements) {
                self.store.recent_announcements(limit).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let tasks = async {
            if wants(ContextCategory::Tasks) {
                self.store.recent_tasks(limit).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let profile = async {
            if wants(ContextCategory::Profile) {
                self.store.find_profile(user_id).await
            } else {
                Ok(None)
            }
        };

        let (mut announcements, mut tasks, profile) =
            tokio::try_join!(announcements, tasks, profile)?;

        // The store is asked for `limit` rows, enforce it regardless
        let cap = limit as usize;
        if let Some(rows) = announcements.as_mut() {
            rows.truncate(cap);
        }
        if let Some(rows) = tasks.as_mut() {
            rows.truncate(cap);
        }

        Ok(ContextBundle {
            announcements,
            tasks,
            profile,
        })
    }
}
