use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{ApplicationRow, ApplicationStatus};

pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub internship_id: Uuid,
    pub cover_letter: &'a str,
    pub notes: &'a str,
}

pub async fn find_application(
    pool: &PgPool,
    user_id: Uuid,
    internship_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 AND internship_id = $2",
    )
    .bind(user_id)
    .bind(internship_id)
    .fetch_optional(pool)
    .await
}

/// Inserts a new application. Returns `None` if the user already applied.
pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    let inserted = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, user_id, internship_id, status, cover_letter, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, internship_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.internship_id)
    .bind(ApplicationStatus::Applied.as_str())
    .bind(new.cover_letter)
    .bind(new.notes)
    .fetch_optional(pool)
    .await?;

    if let Some(application) = &inserted {
        info!(
            "User {} applied to internship {} (application {})",
            new.user_id, new.internship_id, application.id
        );
    }
    Ok(inserted)
}

pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY applied_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Marks an application withdrawn. Rows are never deleted.
pub async fn withdraw_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET status = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING *
        "#,
    )
    .bind(ApplicationStatus::Withdrawn.as_str())
    .bind(application_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn count_applications(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM applications WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_one(pool)
    .await
}
