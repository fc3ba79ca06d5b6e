use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    normalized_field, AdminAccount, EmployerId, UserAccountStatus, UserId,
};
use super::error::ModerationError;
use super::store::BoardStore;

/// Suspend/activate and delete operations over job-seeker and employer
/// accounts. Soft and hard deletion are two distinct paths with different
/// irreversibility guarantees; hard deletion never happens by default.
pub struct AccountService<S> {
    store: Arc<S>,
}

impl<S> AccountService<S>
where
    S: BoardStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Suspend or reactivate a job seeker. Suspension metadata is stamped as
    /// a unit and cleared as a unit on reactivation; a missing reason still
    /// suspends, just with an empty audit trail.
    pub fn set_user_active(
        &self,
        user_id: &UserId,
        is_active: bool,
        reason: Option<String>,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        let reason = reason.as_deref().and_then(normalized_field);
        self.store
            .with_user(user_id, |user| {
                user.is_active = is_active;
                if is_active {
                    user.status = UserAccountStatus::Active;
                    user.suspension_reason = None;
                    user.suspended_at = None;
                    user.suspended_by = None;
                } else {
                    user.status = UserAccountStatus::Suspended;
                    user.suspension_reason = reason;
                    user.suspended_at = Some(Utc::now());
                    user.suspended_by = Some(admin.id.clone());
                }
            })
            .map_err(|error| ModerationError::from_store(error, "user"))?;

        info!(user = %user_id.0, active = is_active, admin = %admin.id.0, "user status set");
        Ok(())
    }

    /// Soft delete: the record is retained and the account marked deleted.
    /// Reversible only by direct administrator override.
    pub fn soft_delete_user(
        &self,
        user_id: &UserId,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        self.store
            .with_user(user_id, |user| {
                user.status = UserAccountStatus::Deleted;
                user.is_active = false;
                user.deleted_at = Some(Utc::now());
                user.deleted_by = Some(admin.id.clone());
            })
            .map_err(|error| ModerationError::from_store(error, "user"))?;

        info!(user = %user_id.0, admin = %admin.id.0, "user soft deleted");
        Ok(())
    }

    /// Hard delete: irreversible removal. Callers must opt in explicitly;
    /// the route never defaults to this path.
    pub fn hard_delete_user(
        &self,
        user_id: &UserId,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        self.store
            .remove_user(user_id)
            .map_err(|error| ModerationError::from_store(error, "user"))?;

        info!(user = %user_id.0, admin = %admin.id.0, "user permanently deleted");
        Ok(())
    }

    /// Suspend or reactivate an employer account. Orthogonal to approval and
    /// verification.
    pub fn set_employer_active(
        &self,
        employer_id: &EmployerId,
        is_active: bool,
        reason: Option<String>,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        let reason = reason.as_deref().and_then(normalized_field);
        self.store
            .with_employer(employer_id, |employer| {
                employer.is_active = is_active;
                employer.suspension_reason = if is_active { None } else { reason };
            })
            .map_err(|error| ModerationError::from_store(error, "employer"))?;

        info!(employer = %employer_id.0, active = is_active, admin = %admin.id.0, "employer status set");
        Ok(())
    }

    /// Soft delete an employer: deactivated with a deletion timestamp, record
    /// retained. This subsystem has no hard-removal path for employers.
    pub fn soft_delete_employer(
        &self,
        employer_id: &EmployerId,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        self.store
            .with_employer(employer_id, |employer| {
                employer.is_active = false;
                employer.deleted_at = Some(Utc::now());
            })
            .map_err(|error| ModerationError::from_store(error, "employer"))?;

        info!(employer = %employer_id.0, admin = %admin.id.0, "employer soft deleted");
        Ok(())
    }

    /// Administrator account-level approval or rejection of an employer.
    /// Stamps the acting administrator; a rejection may carry a reason.
    /// Never touches verification or suspension state.
    pub fn set_employer_approval(
        &self,
        employer_id: &EmployerId,
        is_approved: bool,
        reason: Option<String>,
        admin: &AdminAccount,
    ) -> Result<(), ModerationError> {
        let reason = reason.as_deref().and_then(normalized_field);
        self.store
            .with_employer(employer_id, |employer| {
                employer.is_approved = is_approved;
                employer.approved_by = Some(admin.id.clone());
                employer.approved_at = Some(Utc::now());
                if !is_approved {
                    if let Some(reason) = reason {
                        employer.rejection_reason = Some(reason);
                    }
                }
            })
            .map_err(|error| ModerationError::from_store(error, "employer"))?;

        info!(employer = %employer_id.0, approved = is_approved, admin = %admin.id.0, "employer approval set");
        Ok(())
    }
}
