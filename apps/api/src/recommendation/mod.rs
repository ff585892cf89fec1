// Recommendation pipeline: profile + posting batch → ranked, validated matches.
// Flow: store → prompts → llm_client → recovery → normalizer, with fallback on any
// model-call or parse failure. All LLM calls go through llm_client.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod fallback;
pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod recovery;
pub mod store;

/// Hard cap on returned recommendations.
pub const MAX_RESULTS: usize = 15;
pub const MAX_REASONS: usize = 5;
pub const MAX_SKILL_MATCHES: usize = 10;
pub const MAX_MISSING_SKILLS: usize = 10;

/// Failures that cross the pipeline boundary. Model and parse failures never do.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Profile for user {0} not found")]
    ProfileNotFound(Uuid),

    #[error("Profile incomplete: add at least one skill")]
    ProfileIncomplete,

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// One validated match between the user and a posting from the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub internship_id: Uuid,
    pub match_percentage: u8,
    pub reasons: Vec<String>,
    pub skill_matches: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Which scorer produced a report. Surfaced to clients as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerBackend {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub scorer_backend: ScorerBackend,
}

/// Dedups by posting (first occurrence wins), sorts by score descending, caps at
/// `MAX_RESULTS`. The sort is stable so equal scores keep their input order.
pub fn finalize(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<Recommendation> = recommendations
        .into_iter()
        .filter(|r| seen.insert(r.internship_id))
        .collect();
    unique.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    unique.truncate(MAX_RESULTS);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: Uuid, score: u8) -> Recommendation {
        Recommendation {
            internship_id: id,
            match_percentage: score,
            reasons: vec![],
            skill_matches: vec![],
            missing_skills: vec![],
        }
    }

    #[test]
    fn test_finalize_keeps_first_duplicate() {
        let id = Uuid::new_v4();
        let out = finalize(vec![rec(id, 40), rec(id, 90)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].match_percentage, 40);
    }

    #[test]
    fn test_finalize_sorts_descending_and_caps() {
        let input: Vec<_> = (0..20).map(|i| rec(Uuid::new_v4(), i * 5)).collect();
        let out = finalize(input);
        assert_eq!(out.len(), MAX_RESULTS);
        assert_eq!(out[0].match_percentage, 95);
        assert!(out
            .windows(2)
            .all(|w| w[0].match_percentage >= w[1].match_percentage));
    }

    #[test]
    fn test_scorer_backend_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ScorerBackend::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
