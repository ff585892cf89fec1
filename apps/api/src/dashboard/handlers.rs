use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::applications::handlers::{with_postings, ApplicationWithPosting};
use crate::applications::queries::{count_applications, list_applications};
use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::models::posting::Posting;
use crate::postings::queries::list_recent_postings;
use crate::profile::handlers::UserIdQuery;
use crate::profile::queries::get_profile_row;
use crate::recommendation::fallback::skill_overlap;
use crate::state::AppState;

const TOP_MATCH_CANDIDATES: usize = 20;
const TOP_MATCH_COUNT: usize = 4;
const RECENT_APPLICATION_COUNT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub match_strength: u32,
    pub total_applications: i64,
    pub accepted_applications: i64,
    pub profile_completeness: u32,
}

#[derive(Debug, Serialize)]
pub struct TopMatch {
    #[serde(flatten)]
    pub posting: Posting,
    pub match_percentage: u8,
}

#[derive(Debug, Serialize)]
pub struct TopMatchesResponse {
    pub matches: Vec<TopMatch>,
}

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let completeness = get_profile_row(&state.db, params.user_id)
        .await?
        .map(|p| p.completeness_percent())
        .unwrap_or(0);

    let total_applications = count_applications(&state.db, params.user_id, None).await?;
    let accepted_applications =
        count_applications(&state.db, params.user_id, Some(ApplicationStatus::Accepted)).await?;

    Ok(Json(DashboardStats {
        match_strength: completeness,
        total_applications,
        accepted_applications,
        profile_completeness: completeness,
    }))
}

#[derive(Serialize)]
pub struct RecentApplicationsResponse {
    pub applications: Vec<ApplicationWithPosting>,
}

/// GET /api/v1/dashboard/recent-applications
///
/// The user's newest applications with their postings attached.
pub async fn handle_recent_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RecentApplicationsResponse>, AppError> {
    let applications =
        list_applications(&state.db, params.user_id, Some(RECENT_APPLICATION_COUNT)).await?;
    Ok(Json(RecentApplicationsResponse {
        applications: with_postings(&state, applications).await?,
    }))
}

/// GET /api/v1/dashboard/top-matches
///
/// Cheap skill-overlap ranking; no model call.
pub async fn handle_top_matches(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<TopMatchesResponse>, AppError> {
    let skills = get_profile_row(&state.db, params.user_id)
        .await?
        .map(|p| p.skills)
        .unwrap_or_default();

    if skills.is_empty() {
        return Ok(Json(TopMatchesResponse { matches: vec![] }));
    }

    let postings = list_recent_postings(&state.db, TOP_MATCH_CANDIDATES).await?;
    Ok(Json(TopMatchesResponse {
        matches: rank_top_matches(&skills, postings),
    }))
}

/// Postings with no required skills score 0 here.
fn rank_top_matches(skills: &[String], postings: Vec<Posting>) -> Vec<TopMatch> {
    let mut matches: Vec<TopMatch> = postings
        .into_iter()
        .map(|posting| {
            let match_percentage = skill_overlap(skills, &posting.skills_required)
                .percentage
                .unwrap_or(0);
            TopMatch {
                posting,
                match_percentage,
            }
        })
        .collect();
    matches.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    matches.truncate(TOP_MATCH_COUNT);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn posting(skills: &[&str]) -> Posting {
        Posting {
            id: Uuid::new_v4(),
            title: "Intern".to_string(),
            company: "TechNova Labs".to_string(),
            description: None,
            skills_required: skills.iter().map(|s| s.to_string()).collect(),
            stipend: None,
            location: vec![],
            duration: None,
            deadline: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_top_matches_sorted_and_limited_to_four() {
        let postings = vec![
            posting(&["Go"]),
            posting(&["React", "Git"]),
            posting(&[]),
            posting(&["React"]),
            posting(&["Git", "SQL", "Docker"]),
            posting(&["Java"]),
        ];
        let skills = vec!["react".to_string(), "git".to_string()];
        let matches = rank_top_matches(&skills, postings);

        let scores: Vec<u8> = matches.iter().map(|m| m.match_percentage).collect();
        assert_eq!(scores, vec![100, 100, 33, 0]);
    }

    #[test]
    fn test_posting_without_requirements_scores_zero() {
        let matches = rank_top_matches(&["rust".to_string()], vec![posting(&[])]);
        assert_eq!(matches[0].match_percentage, 0);
    }
}
