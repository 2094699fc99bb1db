use std::sync::Arc;
use axum::extract::FromRef;

use crate::config::Settings;
use crate::services::{ContextProvider, LlmProvider, MemoryRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub memory: Arc<MemoryRegistry>,
    pub llm: Arc<dyn LlmProvider>,
    pub context: Arc<dyn ContextProvider>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        memory: Arc<MemoryRegistry>,
        llm: Arc<dyn LlmProvider>,
        context: Arc<dyn ContextProvider>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            memory,
            llm,
            context,
        }
    }
}

impl FromRef<AppState> for Arc<MemoryRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.memory.clone()
    }
}

impl FromRef<AppState> for Arc<dyn LlmProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.llm.clone()
    }
}
