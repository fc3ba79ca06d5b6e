use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::quota::QuotaError;
use super::store::StoreError;

/// Typed failure surface shared by every moderation component. Each variant
/// maps to one HTTP status plus an `errorType` discriminator so clients can
/// distinguish, e.g., a permission failure from an exhausted posting quota
/// even though both answer 403.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you have already reported this job")]
    AlreadyReported,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("authentication required")]
    Unauthenticated,
    #[error("account is deactivated")]
    AccountDeactivated,
    #[error("missing required permission: {0}")]
    Forbidden(&'static str),
    #[error("employer verification required")]
    VerificationRequired,
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("store failure")]
    Store(#[source] StoreError),
}

impl ModerationError {
    /// Map a store failure, naming the entity a `NotFound` refers to.
    pub fn from_store(error: StoreError, entity: &'static str) -> Self {
        match error {
            StoreError::NotFound => ModerationError::NotFound(entity),
            other => ModerationError::Store(other),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
            ModerationError::AlreadyReported => StatusCode::CONFLICT,
            ModerationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ModerationError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ModerationError::AccountDeactivated
            | ModerationError::Forbidden(_)
            | ModerationError::VerificationRequired
            | ModerationError::Quota(_) => StatusCode::FORBIDDEN,
            ModerationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ModerationError::NotFound(_) => "not_found",
            ModerationError::AlreadyReported => "already_reported",
            ModerationError::InvalidArgument(_) => "invalid_argument",
            ModerationError::Unauthenticated => "unauthenticated",
            ModerationError::AccountDeactivated => "account_deactivated",
            ModerationError::Forbidden(_) => "permission_denied",
            ModerationError::VerificationRequired => "verification_required",
            ModerationError::Quota(error) => error.error_type(),
            ModerationError::Store(_) => "internal_error",
        }
    }
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Store failures answer with a generic message; internals stay in the
        // logs.
        let message = match &self {
            ModerationError::Store(source) => {
                tracing::error!(error = %source, "store failure while handling request");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "message": message,
            "errorType": self.error_type(),
        }));
        (status, body).into_response()
    }
}
