pub mod context_service;
pub mod conversation;
pub mod keep_alive;
pub mod llm_service;
pub mod prompt;

pub use context_service::{ContextBundle, ContextProvider, ContextService};
pub use conversation::MemoryRegistry;
pub use llm_service::{LlmProvider, LlmService};
pub use prompt::PromptAssembler;
