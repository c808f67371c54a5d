use std::sync::Arc;

use crate::interview::InterviewService;
use crate::providers::factory::ProviderFactory;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub interview: InterviewService,
    /// Also held by `interview`; exposed here for handlers that report on
    /// provider configuration (e.g. the health endpoint).
    pub factory: Arc<ProviderFactory>,
}
