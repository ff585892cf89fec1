//! Axum route handlers for the Recommendations API.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::posting::Posting;
use crate::postings::queries::get_postings_by_ids;
use crate::recommendation::{Recommendation, ScorerBackend};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: Uuid,
}

/// A recommendation with the full posting attached for display.
#[derive(Debug, Serialize)]
pub struct EnrichedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub internship: Option<Posting>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<EnrichedRecommendation>,
    pub scorer_backend: ScorerBackend,
}

/// POST /api/v1/ai/recommendations
///
/// Ranks recent postings for the user. Model failures degrade to local scoring;
/// only a missing or skill-less profile is an error.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let report = state
        .recommender
        .generate_recommendations(request.user_id)
        .await?;

    let ids: Vec<Uuid> = report
        .recommendations
        .iter()
        .map(|r| r.internship_id)
        .collect();
    let postings = get_postings_by_ids(&state.db, &ids).await?;

    Ok(Json(RecommendationResponse {
        recommendations: enrich(report.recommendations, postings),
        scorer_backend: report.scorer_backend,
    }))
}

/// Attaches each recommendation's posting, keeping the ranked order.
/// A posting deleted since ranking comes back as `None`.
pub(crate) fn enrich(
    recommendations: Vec<Recommendation>,
    postings: Vec<Posting>,
) -> Vec<EnrichedRecommendation> {
    let by_id: HashMap<Uuid, Posting> = postings.into_iter().map(|p| (p.id, p)).collect();
    recommendations
        .into_iter()
        .map(|recommendation| EnrichedRecommendation {
            internship: by_id.get(&recommendation.internship_id).cloned(),
            recommendation,
        })
        .collect()
}
