use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::UserProfileRow;

pub async fn get_profile_row(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, UserProfileRow>("SELECT * FROM user_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Inserts or replaces the profile row for `profile.user_id`.
pub async fn upsert_profile(
    pool: &PgPool,
    profile: &UserProfileRow,
) -> Result<UserProfileRow, sqlx::Error> {
    let saved = sqlx::query_as::<_, UserProfileRow>(
        r#"
        INSERT INTO user_profiles
            (user_id, name, email, skills, location, interests, expected_stipend,
             available_duration, education_degree, graduation_year, experience, resume,
             bio, preferred_company_types, availability, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            name = EXCLUDED.name,
            email = EXCLUDED.email,
            skills = EXCLUDED.skills,
            location = EXCLUDED.location,
            interests = EXCLUDED.interests,
            expected_stipend = EXCLUDED.expected_stipend,
            available_duration = EXCLUDED.available_duration,
            education_degree = EXCLUDED.education_degree,
            graduation_year = EXCLUDED.graduation_year,
            experience = EXCLUDED.experience,
            resume = EXCLUDED.resume,
            bio = EXCLUDED.bio,
            preferred_company_types = EXCLUDED.preferred_company_types,
            availability = EXCLUDED.availability,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.skills)
    .bind(&profile.location)
    .bind(&profile.interests)
    .bind(&profile.expected_stipend)
    .bind(&profile.available_duration)
    .bind(&profile.education_degree)
    .bind(profile.graduation_year)
    .bind(&profile.experience)
    .bind(&profile.resume)
    .bind(&profile.bio)
    .bind(&profile.preferred_company_types)
    .bind(&profile.availability)
    .fetch_one(pool)
    .await?;

    info!("Saved profile for user {}", profile.user_id);
    Ok(saved)
}
