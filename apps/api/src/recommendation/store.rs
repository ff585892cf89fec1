//! Read interface the pipeline needs from the profile/posting store.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::posting::Posting;
use crate::models::profile::Profile;
use crate::postings::queries::list_recent_postings;
use crate::profile::queries::get_profile_row;

/// Carried by the engine as `Arc<dyn RecommendationStore>` so tests can substitute it.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn get_profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Most recent postings first, at most `limit`.
    async fn list_postings(&self, limit: usize) -> Result<Vec<Posting>>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn get_profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = get_profile_row(&self.pool, user_id).await?;
        Ok(row.map(Profile::from))
    }

    async fn list_postings(&self, limit: usize) -> Result<Vec<Posting>> {
        Ok(list_recent_postings(&self.pool, limit).await?)
    }
}
