use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::config::ModerationConfig;

use super::accounts::AccountService;
use super::auth::AuthGate;
use super::domain::{Capability, EmployerId, JobId, JobStatus, UserId};
use super::error::ModerationError;
use super::lifecycle::{JobLifecycleService, NewJob};
use super::notify::Notifier;
use super::reports::ReportService;
use super::store::{BoardStore, JobListFilter};
use super::verification::{VerificationService, VerificationUpdate};

/// Bundle of the moderation services sharing one store, used as router state.
pub struct ModerationHub<S, N> {
    pub auth: AuthGate<S>,
    pub reports: ReportService<S, N>,
    pub lifecycle: JobLifecycleService<S>,
    pub verification: VerificationService<S>,
    pub accounts: AccountService<S>,
}

impl<S, N> ModerationHub<S, N>
where
    S: BoardStore,
    N: Notifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: &ModerationConfig) -> Self {
        Self {
            auth: AuthGate::new(store.clone()),
            reports: ReportService::new(store.clone(), notifier, config.flag_threshold),
            lifecycle: JobLifecycleService::new(store.clone()),
            verification: VerificationService::new(store.clone()),
            accounts: AccountService::new(store),
        }
    }
}

/// Router builder exposing the moderation and lifecycle endpoints.
pub fn moderation_router<S, N>(hub: Arc<ModerationHub<S, N>>) -> Router
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/jobs/:job_id/report", post(report_job_handler::<S, N>))
        .route("/api/v1/employer/jobs", post(create_job_handler::<S, N>))
        .route("/api/v1/admin/jobs", get(list_jobs_handler::<S, N>))
        .route(
            "/api/v1/admin/jobs/:job_id/status",
            patch(set_job_status_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/flag",
            delete(clear_flag_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/employers/:employer_id/status",
            patch(set_employer_approval_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/employers/:employer_id/verification",
            patch(update_verification_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/employers/:employer_id",
            delete(delete_employer_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/users/:user_id/status",
            patch(set_user_status_handler::<S, N>),
        )
        .route(
            "/api/v1/admin/users/:user_id",
            delete(delete_user_handler::<S, N>),
        )
        .with_state(hub)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[derive(Debug, Deserialize)]
pub struct ReportBody {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

pub(crate) async fn report_job_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<ReportBody>>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let reporter = hub.auth.authenticate_user(bearer_token(&headers))?;
    let Json(body) = body.unwrap_or(Json(ReportBody {
        reason: None,
        details: None,
    }));

    let receipt = hub
        .reports
        .submit_report(&JobId(job_id), &reporter.id, body.reason, body.details)?;

    let payload = json!({
        "message": "Report submitted successfully",
        "reportCount": receipt.report_count,
        "isFlagged": receipt.is_flagged,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn create_job_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    headers: HeaderMap,
    Json(body): Json<NewJob>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let employer = hub.auth.authenticate_employer(bearer_token(&headers))?;
    let job = hub.lifecycle.create_job(&employer.id, body)?;

    let payload = json!({
        "message": "Job created",
        "job": {
            "id": job.id,
            "title": job.title,
            "status": job.status.label(),
        },
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub status: Option<String>,
}

pub(crate) async fn list_jobs_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    headers: HeaderMap,
    Query(query): Query<JobListQuery>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    hub.auth
        .authorize(bearer_token(&headers), Capability::JobManagement)?;

    let status = match query.status.as_deref() {
        Some(raw) => Some(JobStatus::parse(raw).ok_or_else(|| {
            ModerationError::InvalidArgument("invalid job status filter".to_string())
        })?),
        None => None,
    };

    let page = hub.lifecycle.list_jobs(&JobListFilter {
        status,
        search: query.search,
        page: query.page,
        limit: query.limit,
    })?;

    let jobs: Vec<_> = page
        .jobs
        .iter()
        .map(|job| {
            json!({
                "id": job.id,
                "title": job.title,
                "company": job.company,
                "status": job.status.label(),
                "reportCount": job.report_count,
                "isFlagged": job.is_flagged,
                "createdAt": job.created_at,
            })
        })
        .collect();

    let payload = json!({
        "jobs": jobs,
        "totalJobs": page.total_jobs,
        "totalPages": page.total_pages,
        "currentPage": page.current_page,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetJobStatusBody {
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

pub(crate) async fn set_job_status_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SetJobStatusBody>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::JobManagement)?;

    let status = JobStatus::parse(&body.status)
        .ok_or_else(|| ModerationError::InvalidArgument("invalid job status".to_string()))?;

    let view = hub
        .lifecycle
        .set_status(&JobId(job_id), status, &admin, body.admin_notes)?;

    let payload = json!({
        "message": format!("Job {} successfully", status.label()),
        "job": view,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn clear_flag_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::JobManagement)?;

    let view = hub.lifecycle.clear_flag(&JobId(job_id), &admin)?;

    let payload = json!({
        "message": "Job flag cleared",
        "job": view,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerApprovalBody {
    pub is_approved: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

pub(crate) async fn set_employer_approval_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(employer_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<EmployerApprovalBody>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::EmployerManagement)?;

    hub.accounts.set_employer_approval(
        &EmployerId(employer_id),
        body.is_approved,
        body.reason,
        &admin,
    )?;

    let verb = if body.is_approved { "approved" } else { "rejected" };
    let payload = json!({ "message": format!("Employer {verb} successfully") });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn update_verification_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(employer_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<VerificationUpdate>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    hub.auth
        .authorize(bearer_token(&headers), Capability::EmployerManagement)?;

    let view = hub
        .verification
        .update_verification(&EmployerId(employer_id), body)?;

    let payload = json!({
        "message": "Employer verification updated",
        "employer": view,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn delete_employer_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(employer_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::EmployerManagement)?;

    hub.accounts
        .soft_delete_employer(&EmployerId(employer_id), &admin)?;

    Ok((StatusCode::OK, Json(json!({ "message": "Employer deleted" }))).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusBody {
    pub is_active: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

pub(crate) async fn set_user_status_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UserStatusBody>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::UserManagement)?;

    hub.accounts
        .set_user_active(&UserId(user_id), body.is_active, body.reason, &admin)?;

    let verb = if body.is_active { "activated" } else { "suspended" };
    let payload = json!({ "message": format!("User {verb} successfully") });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserQuery {
    #[serde(default)]
    pub hard: Option<bool>,
}

pub(crate) async fn delete_user_handler<S, N>(
    State(hub): State<Arc<ModerationHub<S, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<DeleteUserQuery>,
) -> Result<Response, ModerationError>
where
    S: BoardStore + 'static,
    N: Notifier + 'static,
{
    let admin = hub
        .auth
        .authorize(bearer_token(&headers), Capability::UserManagement)?;

    let user_id = UserId(user_id);
    // Hard removal is irreversible and requires the explicit opt-in flag;
    // soft deletion is the default path.
    let message = if query.hard.unwrap_or(false) {
        hub.accounts.hard_delete_user(&user_id, &admin)?;
        "User permanently deleted"
    } else {
        hub.accounts.soft_delete_user(&user_id, &admin)?;
        "User deleted"
    };

    Ok((StatusCode::OK, Json(json!({ "message": message }))).into_response())
}
