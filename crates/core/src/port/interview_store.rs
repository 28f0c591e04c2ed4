// Interview Store Port (Interface)

use crate::domain::{Interview, InterviewStatus};
use crate::error::Result;
use crate::port::StatusUpdate;
use async_trait::async_trait;

/// Filter for interview lookups and bulk updates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewFilter {
    pub job_id: Option<String>,
    pub application_id: Option<String>,
    pub applicant_id: Option<String>,
    pub interviewer_id: Option<String>,
    pub statuses: Option<Vec<InterviewStatus>>,
    /// `scheduled_time <= scheduled_before`
    pub scheduled_before: Option<i64>,
}

impl InterviewFilter {
    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = InterviewStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Every `scheduled` interview at or before `threshold`
    pub fn overdue(threshold: i64) -> Self {
        Self {
            statuses: Some(vec![InterviewStatus::Scheduled]),
            scheduled_before: Some(threshold),
            ..Default::default()
        }
    }

    pub fn matches(&self, interview: &Interview) -> bool {
        self.job_id.as_ref().map_or(true, |j| &interview.job_id == j)
            && self
                .application_id
                .as_ref()
                .map_or(true, |a| &interview.application_id == a)
            && self
                .applicant_id
                .as_ref()
                .map_or(true, |a| &interview.applicant_id == a)
            && self
                .interviewer_id
                .as_ref()
                .map_or(true, |i| &interview.interviewer_id == i)
            && self
                .statuses
                .as_ref()
                .map_or(true, |s| s.contains(&interview.status))
            && self
                .scheduled_before
                .map_or(true, |t| interview.scheduled_time <= t)
    }
}

/// Store interface for Interview persistence
///
/// `insert` rejects a second interview for the same (job, application, applicant, interviewer,
/// scheduled time) while the existing one is neither canceled nor rejected.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn insert(&self, interview: &Interview) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Interview>>;

    /// Matching interviews ordered by scheduled time
    async fn find_by_filter(&self, filter: &InterviewFilter) -> Result<Vec<Interview>>;

    /// Write status and `updated_at` only if the stored status is still `expected`
    async fn update_status_if(
        &self,
        interview: &Interview,
        expected: InterviewStatus,
    ) -> Result<bool>;

    async fn update_many(
        &self,
        filter: &InterviewFilter,
        update: &StatusUpdate<InterviewStatus>,
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
    pub struct InMemoryInterviewStore {
        interviews: Mutex<HashMap<String, Interview>>,
        fail_bulk: AtomicBool,
    }

    impl InMemoryInterviewStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail_bulk(&self, fail: bool) {
            self.fail_bulk.store(fail, Ordering::SeqCst);
        }

        pub fn put(&self, interview: Interview) {
            self.interviews
                .lock()
                .unwrap()
                .insert(interview.id.clone(), interview);
        }
    }

    fn same_slot(a: &Interview, b: &Interview) -> bool {
        a.job_id == b.job_id
            && a.application_id == b.application_id
            && a.applicant_id == b.applicant_id
            && a.interviewer_id == b.interviewer_id
            && a.scheduled_time == b.scheduled_time
    }

    #[async_trait]
    impl InterviewStore for InMemoryInterviewStore {
        async fn insert(&self, interview: &Interview) -> Result<()> {
            let mut interviews = self.interviews.lock().unwrap();
            let duplicate = interviews.values().any(|i| {
                i.id == interview.id
                    || (same_slot(i, interview) && !InterviewStatus::RELEASED.contains(&i.status))
            });
            if duplicate {
                return Err(AppError::DuplicateEntity(format!(
                    "interview for application {} at {}",
                    interview.application_id, interview.scheduled_time
                )));
            }
            interviews.insert(interview.id.clone(), interview.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Interview>> {
            Ok(self.interviews.lock().unwrap().get(id).cloned())
        }

        async fn find_by_filter(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
            let mut found: Vec<Interview> = self
                .interviews
                .lock()
                .unwrap()
                .values()
                .filter(|i| filter.matches(i))
                .cloned()
                .collect();
            found.sort_by(|a, b| {
                a.scheduled_time
                    .cmp(&b.scheduled_time)
                    .then(a.id.cmp(&b.id))
            });
            Ok(found)
        }

        async fn update_status_if(
            &self,
            interview: &Interview,
            expected: InterviewStatus,
        ) -> Result<bool> {
            let mut interviews = self.interviews.lock().unwrap();
            match interviews.get_mut(&interview.id) {
                Some(stored) if stored.status == expected => {
                    stored.status = interview.status;
                    stored.updated_at = interview.updated_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn update_many(
            &self,
            filter: &InterviewFilter,
            update: &StatusUpdate<InterviewStatus>,
        ) -> Result<u64> {
            if self.fail_bulk.load(Ordering::SeqCst) {
                return Err(AppError::Database(
                    "interview store unavailable".to_string(),
                ));
            }
            let mut interviews = self.interviews.lock().unwrap();
            let mut modified = 0;
            for interview in interviews.values_mut().filter(|i| filter.matches(i)) {
                interview.status = update.status;
                interview.updated_at = update.updated_at;
                modified += 1;
            }
            Ok(modified)
        }
    }
}
