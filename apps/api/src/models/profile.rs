use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const BIO_MAX_CHARS: usize = 500;

/// Stored profile row. One per user, upserted by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Vec<String>,
    pub location: Vec<String>,
    pub interests: Vec<String>,
    pub expected_stipend: Option<String>,
    pub available_duration: Option<String>,
    pub education_degree: Option<String>,
    pub graduation_year: Option<i32>,
    pub experience: Option<String>,
    pub resume: Option<String>,
    pub bio: Option<String>,
    pub preferred_company_types: Vec<String>,
    pub availability: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a profile the recommendation pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub skills: Vec<String>,
    pub location: Vec<String>,
    pub interests: Vec<String>,
    pub bio: String,
}

impl From<UserProfileRow> for Profile {
    fn from(row: UserProfileRow) -> Self {
        Profile {
            skills: row.skills,
            location: row.location,
            interests: row.interests,
            bio: row.bio.unwrap_or_default(),
        }
    }
}

impl UserProfileRow {
    /// Share of the six dashboard factors that are filled in, as a rounded percentage.
    pub fn completeness_percent(&self) -> u32 {
        let factors = [
            !self.skills.is_empty(),
            !self.location.is_empty(),
            !self.interests.is_empty(),
            has_text(&self.education_degree),
            has_text(&self.resume),
            has_text(&self.bio),
        ];
        let present = factors.iter().filter(|f| **f).count();
        ((present as f64 / factors.len() as f64) * 100.0).round() as u32
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Trims each entry and drops blanks.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Truncates to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
