use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::posting::Posting;
use crate::postings::queries::list_all_postings;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PostingListResponse {
    pub count: usize,
    pub data: Vec<Posting>,
}

/// GET /api/v1/postings
pub async fn handle_list_postings(
    State(state): State<AppState>,
) -> Result<Json<PostingListResponse>, AppError> {
    let data = list_all_postings(&state.db).await?;
    Ok(Json(PostingListResponse {
        count: data.len(),
        data,
    }))
}
