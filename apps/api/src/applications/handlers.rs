use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::applications::queries::{
    find_application, insert_application, list_applications, withdraw_application,
    NewApplication,
};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::posting::Posting;
use crate::postings::queries::{get_posting, get_postings_by_ids};
use crate::profile::handlers::UserIdQuery;
use crate::state::AppState;

const DUPLICATE_APPLICATION_MESSAGE: &str = "Already applied to this internship";

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub message: String,
    pub application: ApplicationRow,
}

/// An application with its posting attached for display.
#[derive(Debug, Serialize)]
pub struct ApplicationWithPosting {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub internship: Option<Posting>,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationWithPosting>,
}

#[derive(Serialize)]
pub struct ApplicationStatusResponse {
    pub has_applied: bool,
    pub application: Option<ApplicationWithPosting>,
}

/// POST /api/v1/postings/:id/apply
///
/// 404 if the posting is gone, 409 with the existing application on a repeat apply.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> Result<Response, AppError> {
    require_posting(get_posting(&state.db, internship_id).await?, internship_id)?;

    let inserted = insert_application(
        &state.db,
        NewApplication {
            user_id: request.user_id,
            internship_id,
            cover_letter: &request.cover_letter,
            notes: &request.notes,
        },
    )
    .await?;

    match inserted {
        Some(application) => Ok(Json(ApplyResponse {
            success: true,
            message: "Application submitted successfully".to_string(),
            application,
        })
        .into_response()),
        None => {
            let existing = find_application(&state.db, request.user_id, internship_id).await?;
            Ok(duplicate_application_response(existing))
        }
    }
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = list_applications(&state.db, params.user_id, None).await?;
    Ok(Json(ApplicationListResponse {
        applications: with_postings(&state, applications).await?,
    }))
}

/// GET /api/v1/postings/:id/application-status
pub async fn handle_application_status(
    State(state): State<AppState>,
    Path(internship_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationStatusResponse>, AppError> {
    let application = find_application(&state.db, params.user_id, internship_id).await?;
    let application = with_postings(&state, application.into_iter().collect())
        .await?
        .pop();
    Ok(Json(ApplicationStatusResponse {
        has_applied: application.is_some(),
        application,
    }))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_withdraw_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplyResponse>, AppError> {
    let application = withdraw_application(&state.db, params.user_id, application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    Ok(Json(ApplyResponse {
        success: true,
        message: "Application withdrawn successfully".to_string(),
        application,
    }))
}

/// Loads the postings behind `applications` and attaches them.
pub(crate) async fn with_postings(
    state: &AppState,
    applications: Vec<ApplicationRow>,
) -> Result<Vec<ApplicationWithPosting>, AppError> {
    let ids: Vec<Uuid> = applications.iter().map(|a| a.internship_id).collect();
    let postings = get_postings_by_ids(&state.db, &ids).await?;
    Ok(attach_postings(applications, postings))
}

/// Pairs each application with its posting, keeping the application order.
/// A posting deleted after the user applied comes back as `None`.
pub(crate) fn attach_postings(
    applications: Vec<ApplicationRow>,
    postings: Vec<Posting>,
) -> Vec<ApplicationWithPosting> {
    let by_id: HashMap<Uuid, Posting> = postings.into_iter().map(|p| (p.id, p)).collect();
    applications
        .into_iter()
        .map(|application| ApplicationWithPosting {
            internship: by_id.get(&application.internship_id).cloned(),
            application,
        })
        .collect()
}

fn require_posting(posting: Option<Posting>, internship_id: Uuid) -> Result<Posting, AppError> {
    posting.ok_or_else(|| AppError::NotFound(format!("Internship {internship_id} not found")))
}

/// 409 body in the shared error envelope, plus the application already on file.
fn duplicate_application_response(existing: Option<ApplicationRow>) -> Response {
    let body = Json(json!({
        "error": {
            "code": "CONFLICT",
            "message": DUPLICATE_APPLICATION_MESSAGE
        },
        "application": existing
    }));
    (StatusCode::CONFLICT, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::application::ApplicationStatus;

    fn posting(id: Uuid, title: &str) -> Posting {
        Posting {
            id,
            title: title.to_string(),
            company: "TechNova Labs".to_string(),
            description: None,
            skills_required: vec!["React".to_string(), "Git".to_string()],
            stipend: Some("10000".to_string()),
            location: vec!["Bengaluru".to_string()],
            duration: Some("3 months".to_string()),
            deadline: None,
            created_at: Utc::now(),
        }
    }

    fn application(internship_id: Uuid) -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            internship_id,
            status: ApplicationStatus::Applied.as_str().to_string(),
            cover_letter: String::new(),
            notes: String::new(),
            applied_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_attach_postings_keeps_order_and_matches() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let applications = vec![application(b), application(a)];
        let postings = vec![posting(a, "Backend Intern"), posting(b, "Frontend Intern")];

        let attached = attach_postings(applications, postings);

        assert_eq!(attached.len(), 2);
        assert_eq!(attached[0].application.internship_id, b);
        assert_eq!(attached[0].internship.as_ref().unwrap().title, "Frontend Intern");
        assert_eq!(attached[1].internship.as_ref().unwrap().id, a);
    }

    #[test]
    fn test_attach_postings_missing_posting_is_none() {
        let attached = attach_postings(vec![application(Uuid::new_v4())], vec![]);
        assert!(attached[0].internship.is_none());
    }

    #[test]
    fn test_application_json_carries_posting_fields() {
        let id = Uuid::new_v4();
        let attached = attach_postings(vec![application(id)], vec![posting(id, "Data Intern")]);
        let json = serde_json::to_value(&attached[0]).unwrap();

        assert_eq!(json["internship_id"], id.to_string());
        assert_eq!(json["status"], "applied");
        assert_eq!(json["internship"]["title"], "Data Intern");
        assert_eq!(json["internship"]["duration"], "3 months");
        assert_eq!(json["internship"]["skills_required"][0], "React");
    }

    #[test]
    fn test_apply_to_missing_posting_is_not_found() {
        let err = require_posting(None, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_apply_to_existing_posting_passes() {
        let id = Uuid::new_v4();
        let found = require_posting(Some(posting(id, "Backend Intern")), id).unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn test_duplicate_application_returns_existing_row() {
        let existing = application(Uuid::new_v4());
        let existing_id = existing.id;

        let response = duplicate_application_response(Some(existing));
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CONFLICT");
        assert_eq!(json["error"]["message"], DUPLICATE_APPLICATION_MESSAGE);
        assert_eq!(json["application"]["id"], existing_id.to_string());
    }
}
