use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;
use crate::utils::error::panic_response;

pub fn build_router(state: AppState) -> Router {
    // Health probes
    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    // Conversational routes (share the memory registry)
    let chat_routes = Router::new()
        .route("/get-response", post(handlers::chat::get_response_handler))
        .route("/get-ai-response", post(handlers::chat::get_ai_response_handler))
        .route(
            "/reset-conversations",
            post(handlers::reset::reset_conversations_handler),
        );

    // Stateless one-shot helpers
    let assist_routes = Router::new()
        .route(
            "/pyapi/generate-content",
            post(handlers::assist::generate_content_handler),
        )
        .route(
            "/analyze-performance",
            post(handlers::assist::analyze_performance_handler),
        )
        .route(
            "/suggest-replies",
            post(handlers::assist::suggest_replies_handler),
        );

    Router::new()
        .merge(health_routes)
        .merge(chat_routes)
        .merge(assist_routes)
        .with_state(state)
        // Panics become 500s instead of dropped connections
        .layer(CatchPanicLayer::custom(panic_response))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
