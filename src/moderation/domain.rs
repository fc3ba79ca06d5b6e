use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for job-seeker accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for employer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployerId(pub String);

/// Identifier wrapper for administrator accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub String);

/// Lifecycle states of a job posting. Postings start in `Pending` and are
/// moved between states by administrators; the only automatic transition is
/// the report-threshold demotion from `Active` back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Expired,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Active => "active",
            JobStatus::Rejected => "rejected",
            JobStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(JobStatus::Pending),
            "approved" => Some(JobStatus::Approved),
            "active" => Some(JobStatus::Active),
            "rejected" => Some(JobStatus::Rejected),
            "expired" => Some(JobStatus::Expired),
            _ => None,
        }
    }
}

/// Maximum stored length for free-text report details.
pub const REPORT_DETAILS_MAX_CHARS: usize = 1000;

/// A single user report filed against a job posting. Reporter ids are unique
/// within a posting's report sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub reporter: UserId,
    pub reason: String,
    pub details: String,
    pub reported_at: DateTime<Utc>,
}

/// A job posting together with its moderation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub employer: EmployerId,
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    pub report_count: u32,
    pub is_flagged: bool,
    pub reports: Vec<JobReport>,
    pub admin_notes: Option<String>,
    pub approved_by: Option<AdminId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn new(id: JobId, employer: EmployerId, title: String, company: String) -> Self {
        Self {
            id,
            employer,
            title,
            company,
            status: JobStatus::Pending,
            report_count: 0,
            is_flagged: false,
            reports: Vec::new(),
            admin_notes: None,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_report_from(&self, reporter: &UserId) -> bool {
        self.reports.iter().any(|report| &report.reporter == reporter)
    }

    /// Derived read model: a posting is publicly listable only while it is
    /// active and carries no moderation flag. Callers must not re-derive
    /// visibility from the raw fields.
    pub fn is_publicly_listable(&self) -> bool {
        self.status == JobStatus::Active && !self.is_flagged
    }

    pub fn moderation_view(&self) -> JobModerationView {
        JobModerationView {
            id: self.id.clone(),
            status: self.status.label(),
            report_count: self.report_count,
            is_flagged: self.is_flagged,
            admin_notes: self.admin_notes.clone(),
        }
    }
}

/// Sanitized moderation summary of a posting. Reporter identities never leave
/// the store through this view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobModerationView {
    pub id: JobId,
    pub status: &'static str,
    pub report_count: u32,
    pub is_flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

/// Tri-state identity/document verification of an employer, tracked
/// independently from account approval and suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

/// Subscription tier an employer is on. The tier determines how many
/// concurrently counted postings the employer may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Basic,
    Premium,
}

impl SubscriptionPlan {
    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Basic => "basic",
            SubscriptionPlan::Premium => "premium",
        }
    }

    pub const fn default_posting_limit(self) -> u32 {
        match self {
            SubscriptionPlan::Free => 1,
            SubscriptionPlan::Basic => 10,
            SubscriptionPlan::Premium => u32::MAX,
        }
    }
}

/// Employer account with the three orthogonal gates tracked by this core:
/// suspension (`is_active`), administrator approval (`is_approved`), and
/// document verification (`is_verified` + `verification_status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerAccount {
    pub id: EmployerId,
    pub company_name: String,
    pub is_active: bool,
    pub is_approved: bool,
    pub approved_by: Option<AdminId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub is_verified: bool,
    pub verification_status: VerificationStatus,
    pub verification_notes: Option<String>,
    pub verification_document: Option<String>,
    pub plan: SubscriptionPlan,
    pub job_posting_limit: u32,
    pub job_postings_used: u32,
    pub suspension_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl EmployerAccount {
    pub fn new(id: EmployerId, company_name: String, plan: SubscriptionPlan) -> Self {
        Self {
            id,
            company_name,
            is_active: true,
            is_approved: false,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            is_verified: false,
            verification_status: VerificationStatus::Pending,
            verification_notes: None,
            verification_document: None,
            plan,
            job_posting_limit: plan.default_posting_limit(),
            job_postings_used: 0,
            suspension_reason: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn remaining_postings(&self) -> u32 {
        self.job_posting_limit.saturating_sub(self.job_postings_used)
    }

    pub fn verification_view(&self) -> EmployerVerificationView {
        EmployerVerificationView {
            id: self.id.clone(),
            is_verified: self.is_verified,
            verification_status: self.verification_status.label(),
            verification_notes: self.verification_notes.clone(),
            verification_document: self.verification_document.clone(),
        }
    }
}

/// Verification-relevant projection of an employer. Verification endpoints
/// return this and never the full account record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerVerificationView {
    pub id: EmployerId,
    pub is_verified: bool,
    pub verification_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_document: Option<String>,
}

/// High level account state for job seekers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserAccountStatus {
    Active,
    Suspended,
    Deleted,
}

impl UserAccountStatus {
    pub const fn label(self) -> &'static str {
        match self {
            UserAccountStatus::Active => "active",
            UserAccountStatus::Suspended => "suspended",
            UserAccountStatus::Deleted => "deleted",
        }
    }
}

/// Job-seeker account. Suspension metadata is stamped and cleared as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub is_active: bool,
    pub status: UserAccountStatus,
    pub suspension_reason: Option<String>,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspended_by: Option<AdminId>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(id: UserId, name: String) -> Self {
        Self {
            id,
            name,
            is_active: true,
            status: UserAccountStatus::Active,
            suspension_reason: None,
            suspended_at: None,
            suspended_by: None,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
        }
    }
}

/// Capability tags granted to administrators. Ownership of a tag is the sole
/// authorization source for the corresponding admin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    UserManagement,
    EmployerManagement,
    JobManagement,
    Analytics,
}

impl Capability {
    pub const fn label(self) -> &'static str {
        match self {
            Capability::UserManagement => "userManagement",
            Capability::EmployerManagement => "employerManagement",
            Capability::JobManagement => "jobManagement",
            Capability::Analytics => "analytics",
        }
    }
}

/// Administrator account with its capability set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: AdminId,
    pub name: String,
    pub is_active: bool,
    pub permissions: Vec<Capability>,
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminAccount {
    pub fn new(id: AdminId, name: String, permissions: Vec<Capability>) -> Self {
        Self {
            id,
            name,
            is_active: true,
            permissions,
            last_login: None,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.permissions.contains(&capability)
    }
}

/// Outcome returned to the reporter after a successful report submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReceipt {
    pub report_count: u32,
    pub is_flagged: bool,
}

/// Normalize free text fields coming from request payloads: trim and treat
/// an empty result as a cleared field.
pub fn normalized_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim report details and cap them at the stored maximum.
pub fn clamp_details(details: &str) -> String {
    let trimmed = details.trim();
    trimmed.chars().take(REPORT_DETAILS_MAX_CHARS).collect()
}

/// Key/value payload attached to outbound notifications.
pub type NotificationDetails = BTreeMap<String, String>;
