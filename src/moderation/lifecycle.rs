use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{
    normalized_field, AdminAccount, EmployerId, JobId, JobModerationView, JobPosting, JobStatus,
};
use super::error::ModerationError;
use super::quota::QuotaEnforcer;
use super::store::{BoardStore, JobListFilter, JobListPage, StoreError};

/// Employer-supplied payload for a new posting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Owns the posting state machine. Consumes quota on creation, flags from the
/// report aggregator, and status decisions from administrators.
pub struct JobLifecycleService<S> {
    store: Arc<S>,
    quota: QuotaEnforcer,
}

impl<S> JobLifecycleService<S>
where
    S: BoardStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            quota: QuotaEnforcer,
        }
    }

    /// Create a posting on behalf of an employer, in the initial `Pending`
    /// state.
    ///
    /// The employer must be active and verified. The quota check and the
    /// usage increment happen inside the employer's critical section, so two
    /// concurrent requests at one remaining slot cannot both pass. The slot
    /// is handed back if the insert itself fails.
    pub fn create_job(
        &self,
        employer_id: &EmployerId,
        new_job: NewJob,
    ) -> Result<JobPosting, ModerationError> {
        let title = normalized_field(&new_job.title)
            .ok_or_else(|| ModerationError::InvalidArgument("job title is required".to_string()))?;

        let company = self
            .store
            .with_employer(employer_id, |employer| {
                if !employer.is_active {
                    return Err(ModerationError::AccountDeactivated);
                }
                if !employer.is_verified {
                    return Err(ModerationError::VerificationRequired);
                }
                self.quota.reserve_slot(employer)?;
                Ok(employer.company_name.clone())
            })
            .map_err(|error| ModerationError::from_store(error, "employer"))??;

        let company = new_job
            .company
            .as_deref()
            .and_then(normalized_field)
            .unwrap_or(company);

        let job = JobPosting::new(next_job_id(), employer_id.clone(), title, company);
        match self.store.insert_job(job) {
            Ok(stored) => {
                info!(job = %stored.id.0, employer = %employer_id.0, "job posting created");
                Ok(stored)
            }
            Err(error) => {
                // Creation did not go through; hand the reserved slot back.
                if let Err(rollback) = self
                    .store
                    .with_employer(employer_id, |employer| self.quota.release_slot(employer))
                {
                    warn!(
                        employer = %employer_id.0,
                        error = %rollback,
                        "failed to release reserved posting slot"
                    );
                }
                Err(ModerationError::Store(error))
            }
        }
    }

    /// Administrator decision: move a posting to any of the five states.
    ///
    /// The transition table is intentionally unrestricted; the acting
    /// administrator and decision time are stamped on every call regardless
    /// of the target state. A flag on the posting does not block any
    /// transition and is never cleared here.
    pub fn set_status(
        &self,
        job_id: &JobId,
        new_status: JobStatus,
        admin: &AdminAccount,
        notes: Option<String>,
    ) -> Result<JobModerationView, ModerationError> {
        let view = self
            .store
            .with_job(job_id, |job| {
                job.status = new_status;
                job.approved_by = Some(admin.id.clone());
                job.approved_at = Some(Utc::now());
                if let Some(notes) = notes.as_deref().and_then(normalized_field) {
                    job.admin_notes = Some(notes);
                }
                job.moderation_view()
            })
            .map_err(|error| ModerationError::from_store(error, "job"))?;

        info!(job = %job_id.0, status = new_status.label(), admin = %admin.id.0, "job status set");
        Ok(view)
    }

    /// Explicit administrator action that clears a report flag. Flags are
    /// never cleared by any other operation.
    pub fn clear_flag(
        &self,
        job_id: &JobId,
        admin: &AdminAccount,
    ) -> Result<JobModerationView, ModerationError> {
        let view = self
            .store
            .with_job(job_id, |job| {
                job.is_flagged = false;
                job.moderation_view()
            })
            .map_err(|error| ModerationError::from_store(error, "job"))?;

        info!(job = %job_id.0, admin = %admin.id.0, "job flag cleared");
        Ok(view)
    }

    /// Paginated administrator listing.
    pub fn list_jobs(&self, filter: &JobListFilter) -> Result<JobListPage, ModerationError> {
        self.store.list_jobs(filter).map_err(ModerationError::Store)
    }

    pub fn fetch_job(&self, job_id: &JobId) -> Result<JobPosting, ModerationError> {
        match self.store.fetch_job(job_id) {
            Ok(Some(job)) => Ok(job),
            Ok(None) | Err(StoreError::NotFound) => Err(ModerationError::NotFound("job")),
            Err(error) => Err(ModerationError::Store(error)),
        }
    }
}
