use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{clean_list, truncate_chars, UserProfileRow, BIO_MAX_CHARS};
use crate::profile::queries::{get_profile_row, upsert_profile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Whitelisted profile fields. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub expected_stipend: Option<String>,
    pub available_duration: Option<String>,
    pub education_degree: Option<String>,
    pub graduation_year: Option<i32>,
    pub experience: Option<String>,
    pub resume: Option<String>,
    pub bio: Option<String>,
    pub preferred_company_types: Option<Vec<String>>,
    pub availability: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileUpdateResponse {
    pub ok: bool,
    pub profile: UserProfileRow,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UserProfileRow>, AppError> {
    let profile = get_profile_row(&state.db, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", params.user_id)))?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let mut profile = get_profile_row(&state.db, update.user_id)
        .await?
        .unwrap_or_else(|| empty_profile(update.user_id));

    apply_update(&mut profile, update);
    let profile = upsert_profile(&state.db, &profile).await?;

    Ok(Json(ProfileUpdateResponse { ok: true, profile }))
}

fn empty_profile(user_id: Uuid) -> UserProfileRow {
    UserProfileRow {
        user_id,
        name: None,
        email: None,
        skills: vec![],
        location: vec![],
        interests: vec![],
        expected_stipend: None,
        available_duration: None,
        education_degree: None,
        graduation_year: None,
        experience: None,
        resume: None,
        bio: None,
        preferred_company_types: vec![],
        availability: None,
        updated_at: Utc::now(),
    }
}

/// Applies present fields, then re-cleans list fields and the bio.
fn apply_update(profile: &mut UserProfileRow, update: ProfileUpdateRequest) {
    macro_rules! assign {
        ($($field:ident),*) => {
            $(if let Some(value) = update.$field {
                profile.$field = value;
            })*
        };
    }
    macro_rules! assign_opt {
        ($($field:ident),*) => {
            $(if update.$field.is_some() {
                profile.$field = update.$field;
            })*
        };
    }

    assign!(skills, location, interests, preferred_company_types);
    assign_opt!(
        name,
        email,
        expected_stipend,
        available_duration,
        education_degree,
        graduation_year,
        experience,
        resume,
        bio,
        availability
    );

    profile.skills = clean_list(std::mem::take(&mut profile.skills));
    profile.location = clean_list(std::mem::take(&mut profile.location));
    profile.interests = clean_list(std::mem::take(&mut profile.interests));
    profile.preferred_company_types = clean_list(std::mem::take(&mut profile.preferred_company_types));
    profile.bio = profile.bio.as_deref().map(|b| truncate_chars(b, BIO_MAX_CHARS));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_untouched() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        profile.name = Some("Anjali Rao".to_string());
        profile.skills = vec!["react".to_string()];

        apply_update(
            &mut profile,
            ProfileUpdateRequest {
                user_id,
                interests: Some(vec!["web".to_string()]),
                ..Default::default()
            },
        );

        assert_eq!(profile.name.as_deref(), Some("Anjali Rao"));
        assert_eq!(profile.skills, vec!["react"]);
        assert_eq!(profile.interests, vec!["web"]);
    }

    #[test]
    fn test_lists_are_trimmed_and_bio_truncated() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);

        apply_update(
            &mut profile,
            ProfileUpdateRequest {
                user_id,
                skills: Some(vec![" React ".to_string(), "".to_string(), "Node.js".to_string()]),
                location: Some(vec!["  ".to_string()]),
                bio: Some("x".repeat(800)),
                ..Default::default()
            },
        );

        assert_eq!(profile.skills, vec!["React", "Node.js"]);
        assert!(profile.location.is_empty());
        assert_eq!(profile.bio.map(|b| b.len()), Some(BIO_MAX_CHARS));
    }
}
