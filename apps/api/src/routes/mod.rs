pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::dashboard::handlers as dashboard;
use crate::postings::handlers as postings;
use crate::profile::handlers as profile;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Postings
        .route("/api/v1/postings", get(postings::handle_list_postings))
        .route("/api/v1/postings/:id/apply", post(applications::handle_apply))
        .route(
            "/api/v1/postings/:id/application-status",
            get(applications::handle_application_status),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        // Recommendations
        .route(
            "/api/v1/ai/recommendations",
            post(recommendation::handle_recommendations),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            delete(applications::handle_withdraw_application),
        )
        // Dashboard
        .route(
            "/api/v1/dashboard/stats",
            get(dashboard::handle_dashboard_stats),
        )
        .route(
            "/api/v1/dashboard/recent-applications",
            get(dashboard::handle_recent_applications),
        )
        .route(
            "/api/v1/dashboard/top-matches",
            get(dashboard::handle_top_matches),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::{Config, LlmProvider};
    use crate::llm_client::OpenAiClient;
    use crate::recommendation::pipeline::RecommendationEngine;
    use crate::recommendation::store::PgRecommendationStore;

    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/internships_test".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            llm_provider: LlmProvider::OpenAi,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            max_postings: 20,
            temperature: 0.25,
            max_output_tokens: 900,
        };
        // Lazy pool: never connects unless a handler touches the database.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let recommender = Arc::new(RecommendationEngine::new(
            Arc::new(PgRecommendationStore::new(db.clone())),
            Arc::new(OpenAiClient::new(None)),
            config.recommendation_config(),
        ));
        AppState { db, recommender }
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = build_router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = build_router(test_state())
            .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recent_applications_route_requires_user_id() {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard/recent-applications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // Routed to the handler; the query extractor rejects the missing user_id.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_reject_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/ai/recommendations")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"user_id": "not-a-uuid"}"#))
            .unwrap();
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
