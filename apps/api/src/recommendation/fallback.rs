//! Local fallback scorer — deterministic skill-overlap ranking used when the model
//! call or response recovery fails.
//!
//! Skills compare after `trim` + lowercase only. Punctuation is significant, so
//! "node.js" and "nodejs" are different skills.

use std::collections::HashSet;

use crate::recommendation::prompts::SlimPosting;
use crate::recommendation::{finalize, Recommendation, MAX_MISSING_SKILLS, MAX_SKILL_MATCHES};

/// Score given to postings that list no required skills.
pub const NEUTRAL_MATCH_PERCENTAGE: u8 = 30;
pub const FALLBACK_REASON: &str = "Fallback local scoring";

/// Overlap between a user's skills and one posting's requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    pub matches: Vec<String>,
    pub missing: Vec<String>,
    /// `None` when the posting requires nothing.
    pub percentage: Option<u8>,
}

pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Computes matches and gaps in the posting's order, using normalized skill names.
pub fn skill_overlap(user_skills: &[String], required: &[String]) -> SkillOverlap {
    let have: HashSet<String> = user_skills.iter().map(|s| normalize_skill(s)).collect();

    let (matches, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .partition(|s| have.contains(s));

    let total = matches.len() + missing.len();
    let percentage = (total > 0)
        .then(|| ((matches.len() as f64 / total as f64) * 100.0).round() as u8);

    SkillOverlap {
        matches,
        missing,
        percentage,
    }
}

/// Ranks the batch by skill overlap. Never fails; an empty batch gives an empty list.
pub fn score_locally(user_skills: &[String], batch: &[SlimPosting]) -> Vec<Recommendation> {
    let scored = batch
        .iter()
        .map(|posting| {
            let overlap = skill_overlap(user_skills, &posting.skills_required);
            Recommendation {
                internship_id: posting.posting_id,
                match_percentage: overlap.percentage.unwrap_or(NEUTRAL_MATCH_PERCENTAGE),
                reasons: vec![FALLBACK_REASON.to_string()],
                skill_matches: overlap.matches.into_iter().take(MAX_SKILL_MATCHES).collect(),
                missing_skills: overlap.missing.into_iter().take(MAX_MISSING_SKILLS).collect(),
            }
        })
        .collect();

    finalize(scored)
}
