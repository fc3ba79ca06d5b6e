use std::sync::Arc;

use super::domain::{AdminAccount, Capability, EmployerAccount, UserAccount};
use super::error::ModerationError;
use super::store::BoardStore;

/// Single authorization port composed in front of every mutating operation.
///
/// Resolves the acting principal from a bearer credential and, for
/// administrators, checks the capability tag the target operation requires.
/// Implemented once and reused by every route instead of per-route checks.
pub struct AuthGate<S> {
    store: Arc<S>,
}

impl<S> AuthGate<S>
where
    S: BoardStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve an administrator from a bearer credential.
    pub fn authenticate_admin(
        &self,
        bearer: Option<&str>,
    ) -> Result<AdminAccount, ModerationError> {
        let token = bearer.ok_or(ModerationError::Unauthenticated)?;
        let admin = self
            .store
            .admin_by_token(token)
            .map_err(ModerationError::Store)?
            .ok_or(ModerationError::Unauthenticated)?;
        if !admin.is_active {
            return Err(ModerationError::AccountDeactivated);
        }
        Ok(admin)
    }

    /// Authenticate an administrator and require a capability tag.
    pub fn authorize(
        &self,
        bearer: Option<&str>,
        capability: Capability,
    ) -> Result<AdminAccount, ModerationError> {
        let admin = self.authenticate_admin(bearer)?;
        if !admin.has_capability(capability) {
            return Err(ModerationError::Forbidden(capability.label()));
        }
        Ok(admin)
    }

    /// Resolve an end user. Any authenticated, non-suspended user may file
    /// reports; no capability check applies.
    pub fn authenticate_user(&self, bearer: Option<&str>) -> Result<UserAccount, ModerationError> {
        let token = bearer.ok_or(ModerationError::Unauthenticated)?;
        let user = self
            .store
            .user_by_token(token)
            .map_err(ModerationError::Store)?
            .ok_or(ModerationError::Unauthenticated)?;
        if !user.is_active {
            return Err(ModerationError::AccountDeactivated);
        }
        Ok(user)
    }

    /// Resolve an employer for the employer-facing routes.
    pub fn authenticate_employer(
        &self,
        bearer: Option<&str>,
    ) -> Result<EmployerAccount, ModerationError> {
        let token = bearer.ok_or(ModerationError::Unauthenticated)?;
        let employer = self
            .store
            .employer_by_token(token)
            .map_err(ModerationError::Store)?
            .ok_or(ModerationError::Unauthenticated)?;
        if !employer.is_active {
            return Err(ModerationError::AccountDeactivated);
        }
        Ok(employer)
    }
}
