use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::posting::Posting;

/// Returns up to `limit` postings, newest first.
pub async fn list_recent_postings(pool: &PgPool, limit: usize) -> Result<Vec<Posting>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let postings = sqlx::query_as::<_, Posting>(
        "SELECT * FROM internship_postings ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(postings)
}

pub async fn list_all_postings(pool: &PgPool) -> Result<Vec<Posting>, sqlx::Error> {
    sqlx::query_as::<_, Posting>("SELECT * FROM internship_postings ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_posting(pool: &PgPool, id: Uuid) -> Result<Option<Posting>, sqlx::Error> {
    sqlx::query_as::<_, Posting>("SELECT * FROM internship_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_postings_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Posting>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    sqlx::query_as::<_, Posting>("SELECT * FROM internship_postings WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}
