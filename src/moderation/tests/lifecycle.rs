use std::sync::Arc;
use std::thread;

use super::common::*;
use crate::moderation::domain::{
    AdminAccount, AdminId, Capability, EmployerAccount, EmployerId, JobId, JobPosting, JobStatus,
    UserAccount, UserId,
};
use crate::moderation::error::ModerationError;
use crate::moderation::lifecycle::{JobLifecycleService, NewJob};
use crate::moderation::store::{BoardStore, JobListFilter, JobListPage, MemoryBoardStore, StoreError};

fn admin() -> AdminAccount {
    AdminAccount::new(
        AdminId("admin-1".to_string()),
        "Moderator".to_string(),
        vec![Capability::JobManagement],
    )
}

fn new_job(title: &str) -> NewJob {
    NewJob {
        title: title.to_string(),
        company: None,
    }
}

#[test]
fn create_job_starts_pending_and_consumes_a_slot() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    let service = JobLifecycleService::new(store.clone());

    let job = service
        .create_job(&employer.id, new_job("Forklift operator"))
        .expect("creation allowed");

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.company, employer.company_name);
    assert_eq!(job.report_count, 0);
    assert!(!job.is_flagged);

    let employer = store
        .fetch_employer(&employer.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(employer.job_postings_used, 1);
}

#[test]
fn create_job_requires_a_title() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    let service = JobLifecycleService::new(store.clone());

    match service.create_job(&employer.id, new_job("   ")) {
        Err(ModerationError::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument, got {other:?}"),
    }

    let employer = store
        .fetch_employer(&employer.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(employer.job_postings_used, 0, "no slot consumed");
}

#[test]
fn create_job_refused_at_quota_without_increment() {
    let store = store();
    let employer = seed_employer(
        &store,
        "emp-1",
        EmployerFixture {
            used: 1,
            ..EmployerFixture::default()
        },
    );
    let service = JobLifecycleService::new(store.clone());

    match service.create_job(&employer.id, new_job("Second posting")) {
        Err(ModerationError::Quota(error)) => {
            assert_eq!(error.error_type(), "free_plan_limit_reached");
        }
        other => panic!("expected quota refusal, got {other:?}"),
    }

    let employer = store
        .fetch_employer(&employer.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(employer.job_postings_used, 1);
}

#[test]
fn create_job_requires_verification_and_active_account() {
    let store = store();
    let unverified = seed_employer(
        &store,
        "emp-unverified",
        EmployerFixture {
            verified: false,
            ..EmployerFixture::default()
        },
    );
    let suspended = seed_employer(
        &store,
        "emp-suspended",
        EmployerFixture {
            active: false,
            ..EmployerFixture::default()
        },
    );
    let service = JobLifecycleService::new(store.clone());

    match service.create_job(&unverified.id, new_job("Posting")) {
        Err(ModerationError::VerificationRequired) => {}
        other => panic!("expected VerificationRequired, got {other:?}"),
    }
    match service.create_job(&suspended.id, new_job("Posting")) {
        Err(ModerationError::AccountDeactivated) => {}
        other => panic!("expected AccountDeactivated, got {other:?}"),
    }

    for id in [&unverified.id, &suspended.id] {
        let employer = store.fetch_employer(id).expect("fetch").expect("present");
        assert_eq!(employer.job_postings_used, 0);
    }
}

#[test]
fn create_job_unknown_employer_is_not_found() {
    let store = store();
    let service = JobLifecycleService::new(store);

    match service.create_job(&EmployerId("missing".to_string()), new_job("Posting")) {
        Err(ModerationError::NotFound("employer")) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn concurrent_creations_at_one_slot_admit_exactly_one() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    let service = Arc::new(JobLifecycleService::new(store.clone()));

    let handles: Vec<_> = (0..2)
        .map(|n| {
            let service = service.clone();
            let employer_id = employer.id.clone();
            thread::spawn(move || service.create_job(&employer_id, new_job(&format!("Posting {n}"))))
        })
        .collect();
    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread join"))
        .collect();

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1, "exactly one creation wins the last slot");
    assert!(outcomes
        .iter()
        .filter(|outcome| outcome.is_err())
        .all(|outcome| matches!(outcome, Err(ModerationError::Quota(_)))));

    let employer = store
        .fetch_employer(&employer.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(employer.job_postings_used, 1, "no double booking");
}

#[test]
fn set_status_stamps_decision_metadata_on_every_call() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    seed_job(&store, "job-1", &employer.id, JobStatus::Pending);
    let service = JobLifecycleService::new(store.clone());
    let admin = admin();

    let view = service
        .set_status(
            &JobId("job-1".to_string()),
            JobStatus::Rejected,
            &admin,
            Some("spam posting".to_string()),
        )
        .expect("status set");
    assert_eq!(view.status, "rejected");
    assert_eq!(view.admin_notes.as_deref(), Some("spam posting"));

    let job = store
        .fetch_job(&JobId("job-1".to_string()))
        .expect("fetch")
        .expect("present");
    assert_eq!(job.approved_by.as_ref(), Some(&admin.id));
    assert!(job.approved_at.is_some(), "stamped even for a rejection");
}

#[test]
fn transition_table_is_unrestricted() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    seed_job(&store, "job-1", &employer.id, JobStatus::Expired);
    let service = JobLifecycleService::new(store.clone());

    // The design deliberately lets an administrator move a posting from any
    // state to any state, terminal states included.
    for target in [
        JobStatus::Active,
        JobStatus::Rejected,
        JobStatus::Pending,
        JobStatus::Approved,
        JobStatus::Expired,
    ] {
        let view = service
            .set_status(&JobId("job-1".to_string()), target, &admin(), None)
            .expect("transition allowed");
        assert_eq!(view.status, target.label());
    }
}

#[test]
fn flagged_job_can_be_relisted_and_flag_persists() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    seed_job(&store, "job-1", &employer.id, JobStatus::Pending);
    store
        .with_job(&JobId("job-1".to_string()), |job| {
            job.is_flagged = true;
            job.report_count = 3;
        })
        .expect("flag job");
    let service = JobLifecycleService::new(store.clone());

    let view = service
        .set_status(&JobId("job-1".to_string()), JobStatus::Active, &admin(), None)
        .expect("relist allowed");
    assert_eq!(view.status, "active");
    assert!(view.is_flagged, "relisting does not clear the flag");
}

#[test]
fn clear_flag_touches_only_the_flag() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    seed_job(&store, "job-1", &employer.id, JobStatus::Pending);
    store
        .with_job(&JobId("job-1".to_string()), |job| {
            job.is_flagged = true;
            job.report_count = 5;
        })
        .expect("flag job");
    let service = JobLifecycleService::new(store.clone());

    let view = service
        .clear_flag(&JobId("job-1".to_string()), &admin())
        .expect("flag cleared");
    assert!(!view.is_flagged);
    assert_eq!(view.status, "pending", "status untouched");
    assert_eq!(view.report_count, 5, "report history untouched");
}

#[test]
fn clear_flag_unknown_job_is_not_found() {
    let store = store();
    let service = JobLifecycleService::new(store);

    match service.clear_flag(&JobId("missing".to_string()), &admin()) {
        Err(ModerationError::NotFound("job")) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn listing_filters_by_status_and_search() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    seed_job(&store, "job-1", &employer.id, JobStatus::Active);
    seed_job(&store, "job-2", &employer.id, JobStatus::Pending);
    store
        .with_job(&JobId("job-2".to_string()), |job| {
            job.title = "Night-shift welder".to_string();
        })
        .expect("retitle");
    let service = JobLifecycleService::new(store);

    let page = service
        .list_jobs(&JobListFilter {
            status: Some(JobStatus::Pending),
            ..JobListFilter::default()
        })
        .expect("list");
    assert_eq!(page.total_jobs, 1);
    assert_eq!(page.jobs[0].id.0, "job-2");

    let page = service
        .list_jobs(&JobListFilter {
            search: Some("WELDER".to_string()),
            ..JobListFilter::default()
        })
        .expect("list");
    assert_eq!(page.total_jobs, 1, "search is case-insensitive");

    let page = service
        .list_jobs(&JobListFilter {
            limit: Some(1),
            page: Some(2),
            ..JobListFilter::default()
        })
        .expect("list");
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.jobs.len(), 1);
}

/// Delegates to an in-memory store but refuses job insertion, to drive the
/// slot-rollback path in job creation.
struct InsertFailingStore {
    inner: MemoryBoardStore,
}

impl BoardStore for InsertFailingStore {
    fn insert_job(&self, _job: JobPosting) -> Result<JobPosting, StoreError> {
        Err(StoreError::Unavailable("job collection offline".to_string()))
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError> {
        self.inner.fetch_job(id)
    }

    fn with_job<T>(
        &self,
        id: &JobId,
        mutate: impl FnOnce(&mut JobPosting) -> T,
    ) -> Result<T, StoreError> {
        self.inner.with_job(id, mutate)
    }

    fn list_jobs(&self, filter: &JobListFilter) -> Result<JobListPage, StoreError> {
        self.inner.list_jobs(filter)
    }

    fn insert_employer(&self, employer: EmployerAccount) -> Result<EmployerAccount, StoreError> {
        self.inner.insert_employer(employer)
    }

    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerAccount>, StoreError> {
        self.inner.fetch_employer(id)
    }

    fn with_employer<T>(
        &self,
        id: &EmployerId,
        mutate: impl FnOnce(&mut EmployerAccount) -> T,
    ) -> Result<T, StoreError> {
        self.inner.with_employer(id, mutate)
    }

    fn insert_user(&self, user: UserAccount) -> Result<UserAccount, StoreError> {
        self.inner.insert_user(user)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        self.inner.fetch_user(id)
    }

    fn with_user<T>(
        &self,
        id: &UserId,
        mutate: impl FnOnce(&mut UserAccount) -> T,
    ) -> Result<T, StoreError> {
        self.inner.with_user(id, mutate)
    }

    fn remove_user(&self, id: &UserId) -> Result<(), StoreError> {
        self.inner.remove_user(id)
    }

    fn insert_admin(&self, admin: AdminAccount) -> Result<AdminAccount, StoreError> {
        self.inner.insert_admin(admin)
    }

    fn fetch_admin(&self, id: &AdminId) -> Result<Option<AdminAccount>, StoreError> {
        self.inner.fetch_admin(id)
    }

    fn admin_by_token(&self, token: &str) -> Result<Option<AdminAccount>, StoreError> {
        self.inner.admin_by_token(token)
    }

    fn user_by_token(&self, token: &str) -> Result<Option<UserAccount>, StoreError> {
        self.inner.user_by_token(token)
    }

    fn employer_by_token(&self, token: &str) -> Result<Option<EmployerAccount>, StoreError> {
        self.inner.employer_by_token(token)
    }
}

#[test]
fn failed_insert_hands_the_reserved_slot_back() {
    let store = Arc::new(InsertFailingStore {
        inner: MemoryBoardStore::new(),
    });
    let employer = seed_employer(&store.inner, "emp-1", EmployerFixture::default());
    let service = JobLifecycleService::new(store.clone());

    match service.create_job(&employer.id, new_job("Posting")) {
        Err(ModerationError::Store(_)) => {}
        other => panic!("expected Store error, got {other:?}"),
    }

    let employer = store
        .inner
        .fetch_employer(&employer.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(employer.job_postings_used, 0, "reserved slot released");
}

#[test]
fn publicly_listable_requires_active_and_unflagged() {
    let store = store();
    let employer = seed_employer(&store, "emp-1", EmployerFixture::default());
    let job = seed_job(&store, "job-1", &employer.id, JobStatus::Active);
    assert!(job.is_publicly_listable());

    store
        .with_job(&job.id, |job| job.is_flagged = true)
        .expect("flag");
    let job = store.fetch_job(&job.id).expect("fetch").expect("present");
    assert!(!job.is_publicly_listable());
}
