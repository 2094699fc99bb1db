use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use ai_chat_server::config::Settings;
use ai_chat_server::database::{DbPool, Repository};
use ai_chat_server::services::conversation::spawn_idle_sweeper;
use ai_chat_server::services::{keep_alive, ContextService, LlmService, MemoryRegistry};
use ai_chat_server::{build_router, logging, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logger()?;

    info!("🚀 Starting AI chat server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");
    if settings.llm.api_key.is_empty() {
        warn!("No LLM API key configured, generation requests will fail");
    }

    // Document store for context lookups
    let db_pool = DbPool::new(&settings.database)?;
    let repository = Arc::new(Repository::new(db_pool.clone()));

    // Initialize services
    let memory = Arc::new(MemoryRegistry::new(settings.memory.window_size));
    let llm_service = Arc::new(LlmService::new(settings.llm.clone())?);
    let context_service = Arc::new(ContextService::new(
        repository,
        settings.context.max_records_per_category,
    ));

    // Background tasks
    let keep_alive = keep_alive::spawn_from_config(&settings.keep_alive)?;
    let sweeper = settings
        .memory
        .idle_ttl()
        .map(|ttl| spawn_idle_sweeper(memory.clone(), ttl, settings.memory.sweep_interval()));

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    let state = AppState::new(settings, memory, llm_service, context_service);
    let app = build_router(state);

    info!("🎯 Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down background tasks");
    if let Some(handle) = keep_alive {
        handle.shutdown().await;
    }
    if let Some(handle) = sweeper {
        handle.shutdown().await;
    }
    db_pool.close().await;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
