use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub context: ContextConfig,
    pub keep_alive: KeepAliveConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6001,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/classroom".to_string(),
            pool_max_size: 5,
            pool_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root, `/chat/completions` is appended
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama3-8b-8192".to_string(),
            timeout_seconds: 30,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    /// Max turns kept per user
    pub window_size: usize,
    /// 0 disables idle eviction
    pub idle_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            idle_ttl_seconds: 0,
            sweep_interval_seconds: 300,
        }
    }
}

impl MemoryConfig {
    pub fn idle_ttl(&self) -> Option<Duration> {
        (self.idle_ttl_seconds > 0).then(|| Duration::from_secs(self.idle_ttl_seconds))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ContextConfig {
    pub max_records_per_category: i64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_records_per_category: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct KeepAliveConfig {
    /// Externally reachable URL of this service; the task is off when unset
    pub public_base_url: Option<String>,
    pub min_interval_seconds: u64,
    pub max_interval_seconds: u64,
    pub retry_backoff_seconds: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            public_base_url: None,
            min_interval_seconds: 7 * 60,
            max_interval_seconds: 13 * 60,
            retry_backoff_seconds: 5 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PromptsConfig {
    /// Instruction for `/get-response`
    pub chat_system_prompt: String,
    /// Instruction for `/get-ai-response`, the context bundle is appended to it
    pub assistant_system_prompt: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            chat_system_prompt: "You are a helpful educational assistant for the ConnectX \
                platform. Provide concise, informative responses to help teachers and students. \
                Be friendly but professional."
                .to_string(),
            assistant_system_prompt: "You are the ConnectX classroom assistant. Answer questions \
                about announcements, tasks and the student's own profile using the context data \
                when it is provided. If the context does not contain the answer, say so briefly."
                .to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain variables used by hosting dashboards
            .set_override_option("llm.api_key", std::env::var("GROQ_API_KEY").ok())?
            .set_override_option("llm.model", std::env::var("LLM_MODEL").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option(
                "keep_alive.public_base_url",
                std::env::var("PUBLIC_BASE_URL").ok(),
            )?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
