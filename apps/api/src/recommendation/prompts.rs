//! Prompt builder — slims the profile and posting batch and renders the ranking prompt.
//!
//! Postings are cited by batch-local `index`, never by database id, so the normalizer
//! can validate references with a range check.

use serde::Serialize;
use uuid::Uuid;

use crate::models::posting::Posting;
use crate::models::profile::{truncate_chars, Profile, BIO_MAX_CHARS};
use crate::recommendation::MAX_RESULTS;

const PROFILE_MAX_SKILLS: usize = 40;
const PROFILE_MAX_LOCATIONS: usize = 10;
const PROFILE_MAX_INTERESTS: usize = 20;
const POSTING_DESCRIPTION_MAX_CHARS: usize = 200;
const POSTING_MAX_SKILLS: usize = 10;
const REASON_MAX_WORDS: usize = 12;

pub const RANKING_PROMPT_TEMPLATE: &str = r#"You are ranking internships for a user.

RULES:
- Use ONLY the provided "index" field to reference internships.
- NEVER fabricate, truncate, or create IDs.
- Output ONLY pure JSON (array), no code fences, no extra text.
- Max {max_results} items, sorted by matchPercentage desc.
- Be concise in reasons (<= {reason_words} words each).

User Profile: {profile_json}

Internships (array of objects with index):
{postings_json}

Return JSON array like:
[
  {
    "index": 0,
    "matchPercentage": 78,
    "reasons": ["matches React", "location aligns"],
    "skillMatches": ["react","node"],
    "missingSkills": ["docker"]
  }
]"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlimProfile {
    pub skills: Vec<String>,
    pub location: Vec<String>,
    pub interests: Vec<String>,
    pub bio: String,
}

/// Prompt-sized view of a posting, addressed by its position in the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlimPosting {
    pub index: usize,
    #[serde(rename = "internshipId")]
    pub posting_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub skills_required: Vec<String>,
    pub location: Vec<String>,
}

/// Everything one pipeline run needs after prompt construction.
#[derive(Debug, Clone)]
pub struct RankingPrompt {
    pub profile: SlimProfile,
    pub postings: Vec<SlimPosting>,
    pub prompt: String,
}

pub fn slim_profile(profile: &Profile) -> SlimProfile {
    SlimProfile {
        skills: profile.skills.iter().take(PROFILE_MAX_SKILLS).cloned().collect(),
        location: profile
            .location
            .iter()
            .take(PROFILE_MAX_LOCATIONS)
            .cloned()
            .collect(),
        interests: profile
            .interests
            .iter()
            .take(PROFILE_MAX_INTERESTS)
            .cloned()
            .collect(),
        bio: truncate_chars(&profile.bio, BIO_MAX_CHARS),
    }
}

pub fn slim_postings(postings: &[Posting]) -> Vec<SlimPosting> {
    postings
        .iter()
        .enumerate()
        .map(|(index, p)| SlimPosting {
            index,
            posting_id: p.id,
            title: p.title.clone(),
            company: p.company.clone(),
            description: truncate_chars(
                p.description.as_deref().unwrap_or_default(),
                POSTING_DESCRIPTION_MAX_CHARS,
            ),
            skills_required: p
                .skills_required
                .iter()
                .take(POSTING_MAX_SKILLS)
                .cloned()
                .collect(),
            location: p.location.clone(),
        })
        .collect()
}

/// Builds the ranking prompt. Oversized fields are truncated, never rejected.
pub fn build_ranking_prompt(profile: &Profile, postings: &[Posting]) -> RankingPrompt {
    let profile = slim_profile(profile);
    let postings = slim_postings(postings);

    // Serializing plain strings and vectors cannot fail.
    let profile_json = serde_json::to_string(&profile).unwrap_or_default();
    let postings_json = serde_json::to_string(&postings).unwrap_or_default();

    let prompt = RANKING_PROMPT_TEMPLATE
        .replace("{max_results}", &MAX_RESULTS.to_string())
        .replace("{reason_words}", &REASON_MAX_WORDS.to_string())
        .replace("{profile_json}", &profile_json)
        .replace("{postings_json}", &postings_json);

    RankingPrompt {
        profile,
        postings,
        prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn posting(title: &str, skills: Vec<&str>, description: &str) -> Posting {
        Posting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "TechNova Labs".to_string(),
            description: Some(description.to_string()),
            skills_required: skills.into_iter().map(String::from).collect(),
            stipend: None,
            location: vec!["Remote".to_string()],
            duration: Some("3 months".to_string()),
            deadline: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_slim_postings_are_indexed_by_position() {
        let postings = vec![posting("A", vec![], ""), posting("B", vec![], "")];
        let slim = slim_postings(&postings);
        assert_eq!(slim[0].index, 0);
        assert_eq!(slim[1].index, 1);
        assert_eq!(slim[1].posting_id, postings[1].id);
    }

    #[test]
    fn test_oversized_fields_are_truncated() {
        let skills: Vec<&str> = vec!["s"; 25];
        let long_description = "x".repeat(1000);
        let slim = slim_postings(&[posting("A", skills, &long_description)]);
        assert_eq!(slim[0].skills_required.len(), POSTING_MAX_SKILLS);
        assert_eq!(slim[0].description.chars().count(), POSTING_DESCRIPTION_MAX_CHARS);

        let profile = Profile {
            skills: (0..60).map(|i| format!("skill{i}")).collect(),
            location: vec!["Pune".to_string(); 15],
            interests: vec!["ml".to_string(); 30],
            bio: "b".repeat(900),
        };
        let slim = slim_profile(&profile);
        assert_eq!(slim.skills.len(), PROFILE_MAX_SKILLS);
        assert_eq!(slim.location.len(), PROFILE_MAX_LOCATIONS);
        assert_eq!(slim.interests.len(), PROFILE_MAX_INTERESTS);
        assert_eq!(slim.bio.len(), BIO_MAX_CHARS);
    }

    #[test]
    fn test_prompt_carries_output_contract_and_batch() {
        let profile = Profile {
            skills: vec!["react".to_string()],
            ..Profile::default()
        };
        let built = build_ranking_prompt(&profile, &[posting("Frontend Intern", vec!["React"], "UI")]);

        assert!(built.prompt.contains("Use ONLY the provided \"index\" field"));
        assert!(built.prompt.contains("Max 15 items"));
        assert!(built.prompt.contains("<= 12 words"));
        assert!(built.prompt.contains("\"index\":0"));
        assert!(built.prompt.contains("\"skillsRequired\":[\"React\"]"));
        assert!(built.prompt.contains("Frontend Intern"));
        assert!(!built.prompt.contains("{profile_json}"));
    }

    #[test]
    fn test_missing_description_becomes_empty() {
        let mut p = posting("A", vec![], "");
        p.description = None;
        assert_eq!(slim_postings(&[p])[0].description, "");
    }
}
