use super::domain::{EmployerAccount, SubscriptionPlan};

/// Quota refusal, distinguishable from other 403s through its error type.
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("{} plan limit of {limit} job posting(s) reached", .plan.label())]
    LimitReached { plan: SubscriptionPlan, limit: u32 },
}

impl QuotaError {
    pub fn error_type(&self) -> &'static str {
        match self {
            QuotaError::LimitReached {
                plan: SubscriptionPlan::Free,
                ..
            } => "free_plan_limit_reached",
            QuotaError::LimitReached { .. } => "plan_limit_reached",
        }
    }
}

/// Gates job creation by the employer's plan-derived posting limit.
///
/// The check is pure; the lifecycle service runs it inside the employer's
/// store critical section so that check and usage increment are never
/// observably separable under concurrent creation requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuotaEnforcer;

impl QuotaEnforcer {
    pub fn check(&self, employer: &EmployerAccount) -> Result<(), QuotaError> {
        if employer.remaining_postings() == 0 {
            return Err(QuotaError::LimitReached {
                plan: employer.plan,
                limit: employer.job_posting_limit,
            });
        }
        Ok(())
    }

    /// Check the quota and, on success, consume one posting slot. Must be
    /// called with exclusive access to the employer record.
    pub fn reserve_slot(&self, employer: &mut EmployerAccount) -> Result<(), QuotaError> {
        self.check(employer)?;
        employer.job_postings_used += 1;
        Ok(())
    }

    /// Return a slot reserved by [`Self::reserve_slot`] when the creation it
    /// backed did not go through.
    pub fn release_slot(&self, employer: &mut EmployerAccount) {
        employer.job_postings_used = employer.job_postings_used.saturating_sub(1);
    }
}
