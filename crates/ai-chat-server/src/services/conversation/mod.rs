//! Conversation memory
//!
//! - `ConversationWindow`: bounded FIFO of the latest turns of one user
//! - `MemoryRegistry`: thread-safe map of user id to window (DashMap)
//! - optional idle sweeper for registries that should not grow forever

mod registry;
mod sweeper;
pub mod types;
mod window;

pub use registry::{MemoryRegistry, WindowHandle};
pub use sweeper::spawn_idle_sweeper;
pub use types::{RegistryStats, Role, Turn};
pub use window::ConversationWindow;

/// User id applied when a request does not name one
pub const DEFAULT_USER_ID: &str = "default_user";
