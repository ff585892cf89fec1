use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An internship posting. Read-only from the recommendation pipeline's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Posting {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub skills_required: Vec<String>,
    pub stipend: Option<String>,
    pub location: Vec<String>,
    pub duration: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
