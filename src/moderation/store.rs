use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::domain::{
    AdminAccount, AdminId, EmployerAccount, EmployerId, JobId, JobPosting, JobStatus, UserAccount,
    UserId,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Filter and pagination options for the administrator job listing.
#[derive(Debug, Clone, Default)]
pub struct JobListFilter {
    pub status: Option<JobStatus>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// One page of the administrator job listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListPage {
    pub jobs: Vec<JobPosting>,
    pub total_jobs: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Storage abstraction over the four entity families mutated by this core.
///
/// `with_*` methods run the supplied closure inside a per-store critical
/// section, giving the increment-then-check operations (report threshold,
/// posting quota) the atomicity they require under concurrent callers.
pub trait BoardStore: Send + Sync {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, StoreError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError>;
    fn with_job<T>(
        &self,
        id: &JobId,
        mutate: impl FnOnce(&mut JobPosting) -> T,
    ) -> Result<T, StoreError>;
    fn list_jobs(&self, filter: &JobListFilter) -> Result<JobListPage, StoreError>;

    fn insert_employer(&self, employer: EmployerAccount) -> Result<EmployerAccount, StoreError>;
    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerAccount>, StoreError>;
    fn with_employer<T>(
        &self,
        id: &EmployerId,
        mutate: impl FnOnce(&mut EmployerAccount) -> T,
    ) -> Result<T, StoreError>;

    fn insert_user(&self, user: UserAccount) -> Result<UserAccount, StoreError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError>;
    fn with_user<T>(
        &self,
        id: &UserId,
        mutate: impl FnOnce(&mut UserAccount) -> T,
    ) -> Result<T, StoreError>;
    /// Irreversible removal backing the hard-delete path.
    fn remove_user(&self, id: &UserId) -> Result<(), StoreError>;

    fn insert_admin(&self, admin: AdminAccount) -> Result<AdminAccount, StoreError>;
    fn fetch_admin(&self, id: &AdminId) -> Result<Option<AdminAccount>, StoreError>;

    /// Resolve the principal behind a bearer credential, if any.
    fn admin_by_token(&self, token: &str) -> Result<Option<AdminAccount>, StoreError>;
    fn user_by_token(&self, token: &str) -> Result<Option<UserAccount>, StoreError>;
    fn employer_by_token(&self, token: &str) -> Result<Option<EmployerAccount>, StoreError>;
}

/// In-memory store used as the runtime default and by the test suites. Each
/// entity family sits behind its own mutex; `with_*` closures therefore run
/// serialized per family, which satisfies the per-document atomicity the
/// services rely on.
#[derive(Default)]
pub struct MemoryBoardStore {
    jobs: Mutex<HashMap<JobId, JobPosting>>,
    employers: Mutex<HashMap<EmployerId, EmployerAccount>>,
    users: Mutex<HashMap<UserId, UserAccount>>,
    admins: Mutex<HashMap<AdminId, AdminAccount>>,
    admin_tokens: Mutex<HashMap<String, AdminId>>,
    user_tokens: Mutex<HashMap<String, UserId>>,
    employer_tokens: Mutex<HashMap<String, EmployerId>>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_admin_token(&self, token: &str, admin: &AdminId) -> Result<(), StoreError> {
        lock(&self.admin_tokens)?.insert(token.to_string(), admin.clone());
        Ok(())
    }

    pub fn register_user_token(&self, token: &str, user: &UserId) -> Result<(), StoreError> {
        lock(&self.user_tokens)?.insert(token.to_string(), user.clone());
        Ok(())
    }

    pub fn register_employer_token(
        &self,
        token: &str,
        employer: &EmployerId,
    ) -> Result<(), StoreError> {
        lock(&self.employer_tokens)?.insert(token.to_string(), employer.clone());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
}

const DEFAULT_PAGE_LIMIT: usize = 10;

impl BoardStore for MemoryBoardStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, StoreError> {
        let mut jobs = lock(&self.jobs)?;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, StoreError> {
        Ok(lock(&self.jobs)?.get(id).cloned())
    }

    fn with_job<T>(
        &self,
        id: &JobId,
        mutate: impl FnOnce(&mut JobPosting) -> T,
    ) -> Result<T, StoreError> {
        let mut jobs = lock(&self.jobs)?;
        let job = jobs.get_mut(id).ok_or(StoreError::NotFound)?;
        Ok(mutate(job))
    }

    fn list_jobs(&self, filter: &JobListFilter) -> Result<JobListPage, StoreError> {
        let jobs = lock(&self.jobs)?;
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase);

        let mut matched: Vec<JobPosting> = jobs
            .values()
            .filter(|job| filter.status.map_or(true, |status| job.status == status))
            .filter(|job| {
                needle.as_deref().map_or(true, |needle| {
                    job.title.to_ascii_lowercase().contains(needle)
                        || job.company.to_ascii_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
        let page = filter.page.unwrap_or(1).max(1);
        let total_jobs = matched.len();
        let total_pages = total_jobs.div_ceil(limit);
        let jobs = matched
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(JobListPage {
            jobs,
            total_jobs,
            total_pages,
            current_page: page,
        })
    }

    fn insert_employer(&self, employer: EmployerAccount) -> Result<EmployerAccount, StoreError> {
        let mut employers = lock(&self.employers)?;
        if employers.contains_key(&employer.id) {
            return Err(StoreError::Conflict);
        }
        employers.insert(employer.id.clone(), employer.clone());
        Ok(employer)
    }

    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerAccount>, StoreError> {
        Ok(lock(&self.employers)?.get(id).cloned())
    }

    fn with_employer<T>(
        &self,
        id: &EmployerId,
        mutate: impl FnOnce(&mut EmployerAccount) -> T,
    ) -> Result<T, StoreError> {
        let mut employers = lock(&self.employers)?;
        let employer = employers.get_mut(id).ok_or(StoreError::NotFound)?;
        Ok(mutate(employer))
    }

    fn insert_user(&self, user: UserAccount) -> Result<UserAccount, StoreError> {
        let mut users = lock(&self.users)?;
        if users.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        Ok(lock(&self.users)?.get(id).cloned())
    }

    fn with_user<T>(
        &self,
        id: &UserId,
        mutate: impl FnOnce(&mut UserAccount) -> T,
    ) -> Result<T, StoreError> {
        let mut users = lock(&self.users)?;
        let user = users.get_mut(id).ok_or(StoreError::NotFound)?;
        Ok(mutate(user))
    }

    fn remove_user(&self, id: &UserId) -> Result<(), StoreError> {
        let mut users = lock(&self.users)?;
        users.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn insert_admin(&self, admin: AdminAccount) -> Result<AdminAccount, StoreError> {
        let mut admins = lock(&self.admins)?;
        if admins.contains_key(&admin.id) {
            return Err(StoreError::Conflict);
        }
        admins.insert(admin.id.clone(), admin.clone());
        Ok(admin)
    }

    fn fetch_admin(&self, id: &AdminId) -> Result<Option<AdminAccount>, StoreError> {
        Ok(lock(&self.admins)?.get(id).cloned())
    }

    fn admin_by_token(&self, token: &str) -> Result<Option<AdminAccount>, StoreError> {
        let id = match lock(&self.admin_tokens)?.get(token).cloned() {
            Some(id) => id,
            None => return Ok(None),
        };
        self.fetch_admin(&id)
    }

    fn user_by_token(&self, token: &str) -> Result<Option<UserAccount>, StoreError> {
        let id = match lock(&self.user_tokens)?.get(token).cloned() {
            Some(id) => id,
            None => return Ok(None),
        };
        self.fetch_user(&id)
    }

    fn employer_by_token(&self, token: &str) -> Result<Option<EmployerAccount>, StoreError> {
        let id = match lock(&self.employer_tokens)?.get(token).cloned() {
            Some(id) => id,
            None => return Ok(None),
        };
        self.fetch_employer(&id)
    }
}
