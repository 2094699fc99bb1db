use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::types::{RegistryStats, Turn};
use super::window::ConversationWindow;

/// Shared handle to one user's window.
///
/// Cloning is cheap and every clone points at the same window. All mutation
/// goes through the window's bounded `append`, under the handle's mutex.
#[derive(Clone, Debug)]
pub struct WindowHandle {
    inner: Arc<Mutex<ConversationWindow>>,
}

impl WindowHandle {
    fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConversationWindow::new(capacity))),
        }
    }

    pub fn append(&self, turn: Turn) {
        self.inner.lock().append(turn);
    }

    /// Record a user turn and the reply to it back to back
    pub fn append_exchange(&self, user: Turn, assistant: Turn) {
        let mut window = self.inner.lock();
        window.append(user);
        window.append(assistant);
    }

    pub fn history(&self) -> Vec<Turn> {
        self.inner.lock().history()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// True when both handles refer to the same window
    pub fn same_window(&self, other: &WindowHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn touch(&self) {
        self.inner.lock().touch();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        self.inner.lock().idle_for(now)
    }
}

/// Process-wide map from user id to that user's conversation window.
///
/// Built once in `main` and handed to the router through `AppState`.
/// DashMap shards the map, and its entry API serializes creation per key so
/// concurrent first requests for one user share a single window.
pub struct MemoryRegistry {
    windows: DashMap<String, WindowHandle>,
    window_size: usize,
}

impl MemoryRegistry {
    pub fn new(window_size: usize) -> Self {
        info!("Initializing memory registry (window_size={})", window_size);
        Self {
            windows: DashMap::new(),
            window_size,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Existing window for `user_id`; never creates one
    pub fn get(&self, user_id: &str) -> Option<WindowHandle> {
        self.windows.get(user_id).map(|existing| {
            existing.touch();
            existing.value().clone()
        })
    }

    /// Window for `user_id`, created empty on first reference
    pub fn get_or_create(&self, user_id: &str) -> WindowHandle {
        if let Some(existing) = self.windows.get(user_id) {
            existing.touch();
            return existing.value().clone();
        }

        let handle = self
            .windows
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!("Creating conversation window for user {}", user_id);
                WindowHandle::new(self.window_size)
            });
        handle.touch();
        handle.value().clone()
    }

    /// Drop the window for `user_id`. Returns false when there was none.
    pub fn reset(&self, user_id: &str) -> bool {
        let removed = self.windows.remove(user_id).is_some();
        if removed {
            debug!("Reset conversation for user {}", user_id);
        }
        removed
    }

    /// Drop every window, returning how many were held
    pub fn reset_all(&self) -> usize {
        let count = self.windows.len();
        self.windows.clear();
        info!("Reset all conversations ({} removed)", count);
        count
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.windows.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Remove windows untouched for longer than `ttl`
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        self.evict_idle_at(Instant::now(), ttl)
    }

    pub fn evict_idle_at(&self, now: Instant, ttl: Duration) -> usize {
        let start_len = self.windows.len();
        self.windows.retain(|_, handle| handle.idle_for(now) <= ttl);
        let count = start_len.saturating_sub(self.windows.len());

        if count > 0 {
            info!("Evicted {} idle conversations", count);
        }

        count
    }

    pub fn stats(&self) -> RegistryStats {
        let buffered_turns = self.windows.iter().map(|entry| entry.value().len()).sum();
        RegistryStats {
            active_conversations: self.windows.len(),
            buffered_turns,
        }
    }
}
