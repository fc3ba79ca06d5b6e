//! Moderation and lifecycle control for the job board.
//!
//! Everything that moves a posting or an account between states lives here:
//! report aggregation with threshold flagging, the posting status machine,
//! employer verification and approval, posting quotas, account suspension and
//! deletion, and the capability-gated authorization port in front of it all.

pub mod accounts;
pub mod auth;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod quota;
pub mod reports;
pub mod router;
pub mod store;
pub mod verification;

#[cfg(test)]
mod tests;

pub use accounts::AccountService;
pub use auth::AuthGate;
pub use domain::{
    AdminAccount, AdminId, Capability, EmployerAccount, EmployerId, EmployerVerificationView,
    JobId, JobModerationView, JobPosting, JobReport, JobStatus, ReportReceipt, SubscriptionPlan,
    UserAccount, UserAccountStatus, UserId, VerificationStatus,
};
pub use error::ModerationError;
pub use lifecycle::{JobLifecycleService, NewJob};
pub use notify::{Notification, Notifier, NotifyError, NullNotifier};
pub use quota::{QuotaEnforcer, QuotaError};
pub use reports::{ReportService, DEFAULT_FLAG_THRESHOLD};
pub use router::{moderation_router, ModerationHub};
pub use store::{BoardStore, JobListFilter, JobListPage, MemoryBoardStore, StoreError};
pub use verification::{VerificationService, VerificationUpdate};
