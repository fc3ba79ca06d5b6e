use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::domain::{normalized_field, EmployerId, EmployerVerificationView, VerificationStatus};
use super::error::ModerationError;
use super::store::BoardStore;

/// Partial update applied to an employer's verification fields. Absent fields
/// are left untouched; empty strings clear the free-text fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationUpdate {
    pub is_verified: Option<bool>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub document: Option<String>,
}

/// Tri-state identity/document verification of employers, independent from
/// account approval and suspension.
pub struct VerificationService<S> {
    store: Arc<S>,
}

impl<S> VerificationService<S>
where
    S: BoardStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Apply a verification update and return the verification-relevant
    /// projection of the employer, never the full record.
    ///
    /// When `is_verified` is given without an explicit status, the status is
    /// synchronized (`verified` / `pending`). An explicit status always wins,
    /// even when the resulting combination diverges from `is_verified`;
    /// callers own that consistency.
    pub fn update_verification(
        &self,
        employer_id: &EmployerId,
        update: VerificationUpdate,
    ) -> Result<EmployerVerificationView, ModerationError> {
        let explicit_status = match update.status.as_deref() {
            Some(raw) => Some(VerificationStatus::parse(raw).ok_or_else(|| {
                ModerationError::InvalidArgument("invalid verification status".to_string())
            })?),
            None => None,
        };

        let view = self
            .store
            .with_employer(employer_id, |employer| {
                if let Some(is_verified) = update.is_verified {
                    employer.is_verified = is_verified;
                    if explicit_status.is_none() {
                        employer.verification_status = if is_verified {
                            VerificationStatus::Verified
                        } else {
                            VerificationStatus::Pending
                        };
                    }
                }

                if let Some(status) = explicit_status {
                    employer.verification_status = status;
                }

                if let Some(notes) = update.notes.as_deref() {
                    employer.verification_notes = normalized_field(notes);
                }
                if let Some(document) = update.document.as_deref() {
                    employer.verification_document = normalized_field(document);
                }

                employer.verification_view()
            })
            .map_err(|error| ModerationError::from_store(error, "employer"))?;

        info!(
            employer = %employer_id.0,
            status = view.verification_status,
            "employer verification updated"
        );
        Ok(view)
    }
}
