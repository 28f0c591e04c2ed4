// JobApplication Store Port (Interface)

use crate::domain::{ApplicationStatus, JobApplication};
use crate::error::Result;
use crate::port::StatusUpdate;
use async_trait::async_trait;

/// Filter for application lookups and bulk updates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub user_id: Option<String>,
    pub job_id: Option<String>,
    pub company_profile_id: Option<String>,
    pub statuses: Option<Vec<ApplicationStatus>>,
}

impl ApplicationFilter {
    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ApplicationStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn matches(&self, app: &JobApplication) -> bool {
        self.user_id.as_ref().map_or(true, |u| &app.user_id == u)
            && self.job_id.as_ref().map_or(true, |j| &app.job_id == j)
            && self
                .company_profile_id
                .as_ref()
                .map_or(true, |c| &app.company_profile_id == c)
            && self
                .statuses
                .as_ref()
                .map_or(true, |s| s.contains(&app.status))
    }
}

/// Store interface for JobApplication persistence
///
/// `insert` enforces the one-live-application-per-(applicant, job) guard and fails with
/// `AppError::DuplicateEntity` when a non-withdrawn application already exists.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(&self, application: &JobApplication) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<JobApplication>>;

    async fn find_by_filter(&self, filter: &ApplicationFilter) -> Result<Vec<JobApplication>>;

    /// Write the status-owned columns (status, failed/declined reasons, offer letter,
    /// `updated_at`) only if the stored status is still `expected`
    ///
    /// Every other column keeps its stored value, so a stale snapshot cannot undo a comment
    /// committed after it was read.
    async fn update_status_if(
        &self,
        application: &JobApplication,
        expected: ApplicationStatus,
    ) -> Result<bool>;

    /// Write the reviewer comment and `updated_at` only if the stored status is still `expected`
    async fn update_comment_if(
        &self,
        application: &JobApplication,
        expected: ApplicationStatus,
    ) -> Result<bool>;

    async fn update_many(
        &self,
        filter: &ApplicationFilter,
        update: &StatusUpdate<ApplicationStatus>,
    ) -> Result<u64>;
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

    #[derive(Default)]
    pub struct InMemoryApplicationStore {
        applications: Mutex<HashMap<String, JobApplication>>,
        fail_bulk: AtomicBool,
    }

    impl InMemoryApplicationStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make `update_many` fail (cascade failure tests)
        pub fn set_fail_bulk(&self, fail: bool) {
            self.fail_bulk.store(fail, Ordering::SeqCst);
        }

        pub fn put(&self, application: JobApplication) {
            self.applications
                .lock()
                .unwrap()
                .insert(application.id.clone(), application);
        }
    }

    #[async_trait]
    impl ApplicationStore for InMemoryApplicationStore {
        async fn insert(&self, application: &JobApplication) -> Result<()> {
            let mut applications = self.applications.lock().unwrap();
            let duplicate = applications.values().any(|a| {
                a.id == application.id
                    || (a.user_id == application.user_id
                        && a.job_id == application.job_id
                        && a.status != ApplicationStatus::Withdrawn)
            });
            if duplicate {
                return Err(AppError::DuplicateEntity(format!(
                    "application of user {} for job {}",
                    application.user_id, application.job_id
                )));
            }
            applications.insert(application.id.clone(), application.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<JobApplication>> {
            Ok(self.applications.lock().unwrap().get(id).cloned())
        }

        async fn find_by_filter(&self, filter: &ApplicationFilter) -> Result<Vec<JobApplication>> {
            let mut found: Vec<JobApplication> = self
                .applications
                .lock()
                .unwrap()
                .values()
                .filter(|a| filter.matches(a))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(found)
        }

        async fn update_status_if(
            &self,
            application: &JobApplication,
            expected: ApplicationStatus,
        ) -> Result<bool> {
            let mut applications = self.applications.lock().unwrap();
            match applications.get_mut(&application.id) {
                Some(stored) if stored.status == expected => {
                    stored.status = application.status;
                    stored.failed_reason = application.failed_reason.clone();
                    stored.declined_reason = application.declined_reason.clone();
                    stored.offer_letter = application.offer_letter.clone();
                    stored.updated_at = application.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_comment_if(
            &self,
            application: &JobApplication,
            expected: ApplicationStatus,
        ) -> Result<bool> {
            let mut applications = self.applications.lock().unwrap();
            match applications.get_mut(&application.id) {
                Some(stored) if stored.status == expected => {
                    stored.comment = application.comment.clone();
                    stored.updated_at = application.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_many(
            &self,
            filter: &ApplicationFilter,
            update: &StatusUpdate<ApplicationStatus>,
        ) -> Result<u64> {
            if self.fail_bulk.load(Ordering::SeqCst) {
                return Err(AppError::Database(
                    "application store unavailable".to_string(),
                ));
            }
            let mut applications = self.applications.lock().unwrap();
            let mut modified = 0;
            for app in applications.values_mut().filter(|a| filter.matches(a)) {
                app.status = update.status;
                match update.status {
                    ApplicationStatus::Declined => app.declined_reason = update.reason.clone(),
                    ApplicationStatus::Failed => app.failed_reason = update.reason.clone(),
                    _ => {}
                }
                app.updated_at = update.updated_at;
                modified += 1;
            }
            Ok(modified)
        }
    }
}
