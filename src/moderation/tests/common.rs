use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::ModerationConfig;
use crate::moderation::domain::{
    AdminAccount, AdminId, Capability, EmployerAccount, EmployerId, JobId, JobPosting, JobStatus,
    SubscriptionPlan, UserAccount, UserId,
};
use crate::moderation::notify::{Notification, Notifier, NotifyError};
use crate::moderation::router::ModerationHub;
use crate::moderation::store::{BoardStore, MemoryBoardStore};

pub(super) const ALL_CAPABILITIES: [Capability; 4] = [
    Capability::UserManagement,
    Capability::EmployerManagement,
    Capability::JobManagement,
    Capability::Analytics,
];

pub(super) fn store() -> Arc<MemoryBoardStore> {
    Arc::new(MemoryBoardStore::new())
}

pub(super) fn moderation_config() -> ModerationConfig {
    ModerationConfig::default()
}

/// Notifier capturing published payloads for assertions.
#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) fn seed_admin(
    store: &MemoryBoardStore,
    token: &str,
    permissions: &[Capability],
) -> AdminAccount {
    let admin = AdminAccount::new(
        AdminId(format!("admin-{token}")),
        "Test Admin".to_string(),
        permissions.to_vec(),
    );
    store.insert_admin(admin.clone()).expect("insert admin");
    store
        .register_admin_token(token, &admin.id)
        .expect("register admin token");
    admin
}

pub(super) fn seed_user(store: &MemoryBoardStore, id: &str, token: &str) -> UserAccount {
    let user = UserAccount::new(UserId(id.to_string()), format!("User {id}"));
    store.insert_user(user.clone()).expect("insert user");
    store
        .register_user_token(token, &user.id)
        .expect("register user token");
    user
}

pub(super) struct EmployerFixture {
    pub(super) plan: SubscriptionPlan,
    pub(super) limit: u32,
    pub(super) used: u32,
    pub(super) verified: bool,
    pub(super) active: bool,
}

impl Default for EmployerFixture {
    fn default() -> Self {
        Self {
            plan: SubscriptionPlan::Free,
            limit: 1,
            used: 0,
            verified: true,
            active: true,
        }
    }
}

pub(super) fn seed_employer(
    store: &MemoryBoardStore,
    id: &str,
    fixture: EmployerFixture,
) -> EmployerAccount {
    let mut employer = EmployerAccount::new(
        EmployerId(id.to_string()),
        format!("Company {id}"),
        fixture.plan,
    );
    employer.job_posting_limit = fixture.limit;
    employer.job_postings_used = fixture.used;
    employer.is_active = fixture.active;
    if fixture.verified {
        employer.is_verified = true;
        employer.verification_status = crate::moderation::domain::VerificationStatus::Verified;
    }
    store
        .insert_employer(employer.clone())
        .expect("insert employer");
    store
        .register_employer_token(&format!("token-{id}"), &employer.id)
        .expect("register employer token");
    employer
}

pub(super) fn seed_job(
    store: &MemoryBoardStore,
    id: &str,
    employer: &EmployerId,
    status: JobStatus,
) -> JobPosting {
    let mut job = JobPosting::new(
        JobId(id.to_string()),
        employer.clone(),
        format!("Posting {id}"),
        "Acme Staffing".to_string(),
    );
    job.status = status;
    store.insert_job(job.clone()).expect("insert job");
    job
}

pub(super) fn hub(
    store: Arc<MemoryBoardStore>,
) -> (
    Arc<ModerationHub<MemoryBoardStore, MemoryNotifier>>,
    MemoryNotifier,
) {
    let notifier = MemoryNotifier::default();
    let hub = Arc::new(ModerationHub::new(
        store,
        Arc::new(notifier.clone()),
        &moderation_config(),
    ));
    (hub, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
