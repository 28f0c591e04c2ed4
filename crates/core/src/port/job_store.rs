// Job Store Port (Interface)

use crate::domain::{Job, JobStatus};
use crate::error::Result;
use crate::port::StatusUpdate;
use async_trait::async_trait;

/// Filter for job lookups and bulk updates (`None` matches everything)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub user_id: Option<String>,
    pub company_profile_id: Option<String>,
    pub statuses: Option<Vec<JobStatus>>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        self.user_id.as_ref().map_or(true, |u| &job.user_id == u)
            && self
                .company_profile_id
                .as_ref()
                .map_or(true, |c| &job.company_profile_id == c)
            && self
                .statuses
                .as_ref()
                .map_or(true, |s| s.contains(&job.status))
    }
}

/// Store interface for Job persistence
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Job>>;

    /// Find jobs matching the filter, oldest first
    async fn find_by_filter(&self, filter: &JobFilter) -> Result<Vec<Job>>;

    /// Write status, failed reason and `updated_at` only if the stored status is still `expected`
    ///
    /// Returns `false` when the record moved on (or vanished) since it was read. The editable
    /// details are left as stored.
    async fn update_status_if(&self, job: &Job, expected: JobStatus) -> Result<bool>;

    /// Write the editable details and `updated_at` only if the stored status is still `expected`
    async fn update_details_if(&self, job: &Job, expected: JobStatus) -> Result<bool>;

    /// Bulk conditional status write; returns the modified count
    async fn update_many(&self, filter: &JobFilter, update: &StatusUpdate<JobStatus>)
        -> Result<u64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory job store
    #[derive(Default)]
    pub struct InMemoryJobStore {
        jobs: Mutex<HashMap<String, Job>>,
        fail_writes: AtomicBool,
    }

    impl InMemoryJobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent write fail with a database error
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Overwrite a record unconditionally (test setup)
        pub fn put(&self, job: Job) {
            self.jobs.lock().unwrap().insert(job.id.clone(), job);
        }

        fn check_writable(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Database("job store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl JobStore for InMemoryJobStore {
        async fn insert(&self, job: &Job) -> Result<()> {
            self.check_writable()?;
            let mut jobs = self.jobs.lock().unwrap();
            if jobs.contains_key(&job.id) {
                return Err(AppError::DuplicateEntity(format!("job {}", job.id)));
            }
            jobs.insert(job.id.clone(), job.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
            Ok(self.jobs.lock().unwrap().get(id).cloned())
        }

        async fn find_by_filter(&self, filter: &JobFilter) -> Result<Vec<Job>> {
            let mut found: Vec<Job> = self
                .jobs
                .lock()
                .unwrap()
                .values()
                .filter(|j| filter.matches(j))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(found)
        }

        async fn update_status_if(&self, job: &Job, expected: JobStatus) -> Result<bool> {
            self.check_writable()?;
            let mut jobs = self.jobs.lock().unwrap();
            match jobs.get_mut(&job.id) {
                Some(stored) if stored.status == expected => {
                    stored.status = job.status;
                    stored.failed_reason = job.failed_reason.clone();
                    stored.updated_at = job.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_details_if(&self, job: &Job, expected: JobStatus) -> Result<bool> {
            self.check_writable()?;
            let mut jobs = self.jobs.lock().unwrap();
            match jobs.get_mut(&job.id) {
                Some(stored) if stored.status == expected => {
                    stored.details = job.details.clone();
                    stored.updated_at = job.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_many(
            &self,
            filter: &JobFilter,
            update: &StatusUpdate<JobStatus>,
        ) -> Result<u64> {
            self.check_writable()?;
            let mut jobs = self.jobs.lock().unwrap();
            let mut modified = 0;
            for job in jobs.values_mut().filter(|j| filter.matches(j)) {
                job.status = update.status;
                if update.status == JobStatus::Failed {
                    job.failed_reason = update.reason.clone();
                }
                job.updated_at = update.updated_at;
                modified += 1;
            }
            Ok(modified)
        }
    }
}
