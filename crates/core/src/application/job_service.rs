// Job lifecycle use cases

use crate::application::cascade::{CascadeCoordinator, CascadeResult};
use crate::application::catalog_service::CatalogService;
use crate::application::constants::CONDITIONAL_UPDATE_ATTEMPTS;
use crate::application::gateway::OutboundEvents;
use crate::domain::validation::validate_id;
use crate::domain::{
    DomainError, Job, JobDetails, JobStatus, OutboundEvent, Transition, ValidationOutcome,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, JobFilter, JobStore, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Column set a conditional job write owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobWrite {
    Status,
    Details,
}

/// Create-job request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: String,
    pub company_profile_id: String,
    #[serde(flatten)]
    pub details: JobDetails,
}

pub struct JobService {
    jobs: Arc<dyn JobStore>,
    catalog: Arc<CatalogService>,
    cascade: Arc<CascadeCoordinator>,
    events: Arc<OutboundEvents>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        catalog: Arc<CatalogService>,
        cascade: Arc<CascadeCoordinator>,
        events: Arc<OutboundEvents>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            jobs,
            catalog,
            cascade,
            events,
            id_provider,
            time_provider,
        }
    }

    /// Post a job (`pending`) and request validation
    pub async fn create_job(&self, req: CreateJobRequest) -> Result<Job> {
        validate_id("user", &req.user_id)?;
        validate_id("company profile", &req.company_profile_id)?;
        let details = req.details.normalized()?;
        self.catalog.ensure_job_references(&details, None).await?;

        let job = Job::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            req.user_id,
            req.company_profile_id,
            details,
        );
        self.jobs.insert(&job).await?;
        info!(job_id = %job.id, user_id = %job.user_id, "Job created");

        self.events
            .emit(OutboundEvent::validation_request(&job))
            .await;
        Ok(job)
    }

    /// Apply the moderation result (`pending -> live | failed`)
    pub async fn mark_validation_outcome(
        &self,
        job_id: &str,
        outcome: ValidationOutcome,
        reason: Option<String>,
    ) -> Result<Job> {
        let (target, reason) = match outcome {
            ValidationOutcome::Success => (JobStatus::Live, None),
            ValidationOutcome::Failed => (JobStatus::Failed, reason),
        };
        let (job, transition) = self
            .transition_with(job_id, JobWrite::Status, |job, now| {
                job.transition_to(target, reason.clone(), now)
            })
            .await?;
        if transition == Transition::Apply {
            info!(job_id = %job.id, status = %job.status, "Job validation outcome applied");
        }
        Ok(job)
    }

    /// `failed -> pending`, re-emitting the validation request
    pub async fn retry_job(&self, job_id: &str) -> Result<Job> {
        let (job, _) = self
            .transition_with(job_id, JobWrite::Status, |job, now| {
                job.retry(now).map(|_| Transition::Apply)
            })
            .await?;
        info!(job_id = %job.id, "Job resubmitted for validation");

        self.events
            .emit(OutboundEvent::validation_request(&job))
            .await;
        Ok(job)
    }

    /// `live -> closed`, then decline the job's applications and cancel its interviews
    pub async fn close_job(&self, job_id: &str) -> Result<CascadeResult<Job>> {
        let (job, _) = self
            .transition_with(job_id, JobWrite::Status, |job, now| {
                job.transition_to(JobStatus::Closed, None, now)
            })
            .await?;
        info!(job_id = %job.id, "Job closed");

        let cascade = self.cascade.on_job_closed(&job.id).await;
        Ok(CascadeResult {
            entity: job,
            cascade,
        })
    }

    /// Replace the editable details of a job that is not closed
    pub async fn update_job(&self, job_id: &str, details: JobDetails) -> Result<Job> {
        let current = self.get_job(job_id).await?;
        let details = details.normalized()?;
        self.catalog
            .ensure_job_references(&details, Some(&current.details))
            .await?;

        let (job, _) = self
            .transition_with(job_id, JobWrite::Details, |job, now| {
                job.update_details(details.clone(), now)
                    .map(|_| Transition::Apply)
            })
            .await?;
        info!(job_id = %job.id, "Job details updated");
        Ok(job)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        validate_id("job", job_id)?;
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::not_found("job", job_id))
    }

    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        self.jobs.find_by_filter(filter).await
    }

    /// Read, mutate, conditionally write (keyed by id and the status that was read)
    ///
    /// A lost race re-reads and re-evaluates so the caller gets the answer for the status that
    /// actually won, never an overwrite. Only the columns of `write` are stored.
    async fn transition_with<F>(
        &self,
        job_id: &str,
        write: JobWrite,
        mutate: F,
    ) -> Result<(Job, Transition)>
    where
        F: Fn(&mut Job, i64) -> std::result::Result<Transition, DomainError>,
    {
        for attempt in 1..=CONDITIONAL_UPDATE_ATTEMPTS {
            let mut job = self.get_job(job_id).await?;
            let expected = job.status;

            let transition = mutate(&mut job, self.time_provider.now_millis())?;
            if transition == Transition::NoOp {
                debug!(job_id = %job_id, status = %expected, "Job transition is a no-op");
                return Ok((job, transition));
            }
            let written = match write {
                JobWrite::Status => self.jobs.update_status_if(&job, expected).await?,
                JobWrite::Details => self.jobs.update_details_if(&job, expected).await?,
            };
            if written {
                return Ok((job, transition));
            }
            debug!(job_id = %job_id, attempt, "Job changed concurrently, re-reading");
        }
        Err(AppError::Conflict(format!("job {} kept changing", job_id)))
    }
}
