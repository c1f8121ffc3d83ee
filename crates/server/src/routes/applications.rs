//! Admin JSON API for visa applications and contact messages.
//!
//! Every handler requires a logged-in admin; unauthenticated calls get 401.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use visa_desk_core::{ApplicationId, ApplicationStatus};

use crate::db::{ApplicationRepository, ContactRepository};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{ApplicationStats, ContactSubmission, VisaApplication};
use crate::state::AppState;

/// JSON body whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections use the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query parameters for listing applications.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Body of a status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// `{"success": true, "data": ...}` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    const fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Payload polled by the dashboard for live updates.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub applications: Vec<VisaApplication>,
    pub stats: ApplicationStats,
}

/// `{"success": true, "message": ...}` envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Parse a status filter, treating a blank value as "no filter".
fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: visa_desk_core::ParseStatusError| AppError::BadRequest(e.to_string())),
    }
}

fn not_found(id: ApplicationId) -> AppError {
    AppError::NotFound(format!("Application {id}"))
}

/// List applications, newest first.
///
/// GET /api/applications?status=
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataResponse<Vec<VisaApplication>>>, AppError> {
    let status = parse_status_filter(query.status.as_deref())?;
    let applications = ApplicationRepository::new(state.pool()).list(status).await?;
    Ok(DataResponse::ok(applications))
}

/// Full application list with per-status counts.
///
/// GET /api/applications/refresh
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<RefreshResponse>, AppError> {
    let applications = ApplicationRepository::new(state.pool()).list(None).await?;
    let stats = ApplicationStats::tally(&applications);

    Ok(Json(RefreshResponse {
        success: true,
        applications,
        stats,
    }))
}

/// Fetch one application.
///
/// GET /api/applications/{id}
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    ApiPath(id): ApiPath<ApplicationId>,
) -> Result<Json<DataResponse<VisaApplication>>, AppError> {
    let application = ApplicationRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(DataResponse::ok(application))
}

/// Change the status of one application.
///
/// PUT /api/applications/{id}/status
#[instrument(skip(state, admin, update))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiPath(id): ApiPath<ApplicationId>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<DataResponse<VisaApplication>>, AppError> {
    let status = parse_status_filter(update.status.as_deref())?
        .ok_or_else(|| AppError::BadRequest("Status is required".to_string()))?;

    let application = ApplicationRepository::new(state.pool())
        .update_status(id, status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        application_id = %id,
        admin_id = %admin.id,
        status = %status,
        "Application status updated"
    );

    Ok(DataResponse::ok(application))
}

/// Delete one application.
///
/// DELETE /api/applications/{id}
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiPath(id): ApiPath<ApplicationId>,
) -> Result<Json<MessageResponse>, AppError> {
    if !ApplicationRepository::new(state.pool()).delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(application_id = %id, admin_id = %admin.id, "Application deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Application deleted".to_string(),
    }))
}

/// List contact messages, newest first.
///
/// GET /api/contacts
#[instrument(skip_all)]
pub async fn contacts(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<DataResponse<Vec<ContactSubmission>>>, AppError> {
    let contacts = ContactRepository::new(state.pool()).list().await?;
    Ok(DataResponse::ok(contacts))
}
