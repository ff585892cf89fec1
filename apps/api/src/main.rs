mod applications;
mod config;
mod dashboard;
mod db;
mod errors;
mod llm_client;
mod models;
mod postings;
mod profile;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::build_generator;
use crate::recommendation::pipeline::RecommendationEngine;
use crate::recommendation::store::PgRecommendationStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Internship API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize recommendation pipeline
    let generator = build_generator(&config);
    let recommender = RecommendationEngine::new(
        Arc::new(PgRecommendationStore::new(db.clone())),
        generator.clone(),
        config.recommendation_config(),
    );
    info!(
        "Recommendation pipeline initialized (provider: {}, model: {}, max postings: {})",
        generator.provider(),
        recommender.config().generation.model,
        recommender.config().max_postings
    );

    // Build app state
    let state = AppState {
        db,
        recommender: Arc::new(recommender),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins to the SPA host once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
