pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API — the only inbound surface over the orchestration core
        .route(
            "/api/v1/interview/health",
            get(handlers::handle_provider_health),
        )
        .route(
            "/api/v1/interview/analyze-jd",
            post(handlers::handle_analyze_jd),
        )
        .route(
            "/api/v1/interview/questions",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/v1/interview/question/next",
            post(handlers::handle_next_question),
        )
        .route("/api/v1/interview/evaluate", post(handlers::handle_evaluate))
        .route("/api/v1/interview/report", post(handlers::handle_report))
        .with_state(state)
}
