use std::sync::Arc;

use sqlx::PgPool;

use crate::recommendation::pipeline::RecommendationEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Recommendation pipeline with its model adapter chosen at startup.
    pub recommender: Arc<RecommendationEngine>,
}
