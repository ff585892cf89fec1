//! Recommendation engine — orchestrates one ranking run.
//!
//! Flow: load profile → precondition check → load batch → build prompt → model call →
//!       recover → normalize. Any model-call or recovery failure switches to the
//!       local fallback scorer; only precondition and store errors reach the caller.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::prompts::JSON_ARRAY_ONLY_SYSTEM;
use crate::llm_client::{GenerationConfig, LlmError, TextGenerator};
use crate::recommendation::fallback::score_locally;
use crate::recommendation::normalizer::normalize;
use crate::recommendation::prompts::{build_ranking_prompt, RankingPrompt};
use crate::recommendation::recovery::{recover_array, RecoveryError};
use crate::recommendation::store::RecommendationStore;
use crate::recommendation::{
    Recommendation, RecommendationError, RecommendationReport, ScorerBackend,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// `MAX_POSTINGS`: how many recent postings one run considers.
    pub max_postings: usize,
    pub generation: GenerationConfig,
}

/// Why the model path was abandoned for this run.
#[derive(Debug, Error)]
enum ModelStageError {
    #[error("model call failed: {0}")]
    ModelCallFailed(#[from] LlmError),

    #[error("recovery parse failed: {0}")]
    RecoveryParseFailed(#[from] RecoveryError),
}

/// Stateless between calls; safe to share behind an `Arc` across requests.
pub struct RecommendationEngine {
    store: Arc<dyn RecommendationStore>,
    generator: Arc<dyn TextGenerator>,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn RecommendationStore>,
        generator: Arc<dyn TextGenerator>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Ranks recent postings for a user.
    ///
    /// Fails only with `ProfileNotFound`, `ProfileIncomplete`, or a store error;
    /// model trouble degrades to fallback scoring.
    pub async fn generate_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<RecommendationReport, RecommendationError> {
        let profile = self
            .store
            .get_profile_for_user(user_id)
            .await?
            .ok_or(RecommendationError::ProfileNotFound(user_id))?;

        if profile.skills.iter().all(|s| s.trim().is_empty()) {
            return Err(RecommendationError::ProfileIncomplete);
        }

        let mut postings = self.store.list_postings(self.config.max_postings).await?;
        postings.truncate(self.config.max_postings);
        info!(
            "Generating recommendations for user {user_id} over {} postings",
            postings.len()
        );

        if postings.is_empty() {
            return Ok(RecommendationReport {
                recommendations: vec![],
                scorer_backend: ScorerBackend::Fallback,
            });
        }

        let ranking = build_ranking_prompt(&profile, &postings);

        let report = match self.rank_with_model(&ranking).await {
            Ok(recommendations) => RecommendationReport {
                recommendations,
                scorer_backend: ScorerBackend::Model,
            },
            Err(e) => {
                warn!(
                    "Falling back to local scoring for user {user_id} ({}): {e}",
                    self.generator.provider()
                );
                RecommendationReport {
                    recommendations: score_locally(&ranking.profile.skills, &ranking.postings),
                    scorer_backend: ScorerBackend::Fallback,
                }
            }
        };

        info!(
            "Recommendations ready for user {user_id}: backend={:?}, count={}",
            report.scorer_backend,
            report.recommendations.len()
        );
        Ok(report)
    }

    async fn rank_with_model(
        &self,
        ranking: &RankingPrompt,
    ) -> Result<Vec<Recommendation>, ModelStageError> {
        let raw = self
            .generator
            .generate(
                &ranking.prompt,
                JSON_ARRAY_ONLY_SYSTEM,
                &self.config.generation,
            )
            .await?;

        if raw.trim().is_empty() {
            return Err(LlmError::EmptyContent.into());
        }

        let entries = recover_array(&raw)?;
        Ok(normalize(&entries, &ranking.postings))
    }
}
