//! RPC Method Handlers
//!
//! Thin delegation to the orchestrator services; every error goes through `to_rpc_error`.

use crate::error::to_rpc_error;
use crate::types::{
    ApplicationIdParams, ApplicationOutcomeParams, ApplicationReasonParams, CatalogNameParams,
    ChangeStatusParams, CommentParams, InterviewIdParams, JobIdParams, ListApplicationsParams,
    ListCatalogParams, ListInterviewsParams, ListJobsParams, OfferParams, UpdateJobParams,
    ValidationOutcomeParams,
};
use hireflow_core::application::{
    ApplyRequest, CascadeResult, CatalogService, CreateCatalogEntryRequest, CreateJobRequest,
    InterviewService, JobApplicationService, JobService, Orchestrator, ScheduleInterviewRequest,
    UpdateCatalogEntryRequest,
};
use hireflow_core::domain::{CatalogEntry, CatalogKind, Interview, Job, JobApplication};
use hireflow_core::port::{ApplicationFilter, JobFilter};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected services
pub struct RpcHandler {
    jobs: Arc<JobService>,
    applications: Arc<JobApplicationService>,
    interviews: Arc<InterviewService>,
    catalog: Arc<CatalogService>,
}

impl RpcHandler {
    pub fn new(orchestrator: &Orchestrator) -> Self {
        Self {
            jobs: Arc::clone(&orchestrator.jobs),
            applications: Arc::clone(&orchestrator.applications),
            interviews: Arc::clone(&orchestrator.interviews),
            catalog: Arc::clone(&orchestrator.catalog),
        }
    }

    // ------------------------------------------------------------------
    // job.*
    // ------------------------------------------------------------------

    /// job.create.v1
    pub async fn create_job(&self, params: CreateJobRequest) -> RpcResult<Job> {
        self.jobs.create_job(params).await.map_err(to_rpc_error)
    }

    /// job.get.v1
    pub async fn get_job(&self, params: JobIdParams) -> RpcResult<Job> {
        self.jobs.get_job(&params.job_id).await.map_err(to_rpc_error)
    }

    /// job.list.v1
    pub async fn list_jobs(&self, params: ListJobsParams) -> RpcResult<Vec<Job>> {
        self.jobs
            .list_jobs(&JobFilter::from(params))
            .await
            .map_err(to_rpc_error)
    }

    /// job.update.v1
    pub async fn update_job(&self, params: UpdateJobParams) -> RpcResult<Job> {
        self.jobs
            .update_job(&params.job_id, params.details)
            .await
            .map_err(to_rpc_error)
    }

    /// job.mark_validation_outcome.v1
    pub async fn mark_validation_outcome(&self, params: ValidationOutcomeParams) -> RpcResult<Job> {
        self.jobs
            .mark_validation_outcome(&params.job_id, params.outcome, params.reason)
            .await
            .map_err(to_rpc_error)
    }

    /// job.retry.v1
    pub async fn retry_job(&self, params: JobIdParams) -> RpcResult<Job> {
        self.jobs.retry_job(&params.job_id).await.map_err(to_rpc_error)
    }

    /// job.close.v1
    pub async fn close_job(&self, params: JobIdParams) -> RpcResult<CascadeResult<Job>> {
        self.jobs.close_job(&params.job_id).await.map_err(to_rpc_error)
    }

    // ------------------------------------------------------------------
    // application.*
    // ------------------------------------------------------------------

    /// application.apply.v1
    pub async fn apply(&self, params: ApplyRequest) -> RpcResult<JobApplication> {
        self.applications.apply(params).await.map_err(to_rpc_error)
    }

    /// application.get.v1
    pub async fn get_application(&self, params: ApplicationIdParams) -> RpcResult<JobApplication> {
        self.applications
            .get_application(&params.application_id)
            .await
            .map_err(to_rpc_error)
    }

    /// application.list.v1
    pub async fn list_applications(
        &self,
        params: ListApplicationsParams,
    ) -> RpcResult<Vec<JobApplication>> {
        self.applications
            .list_applications(&ApplicationFilter::from(params))
            .await
            .map_err(to_rpc_error)
    }

    /// application.mark_outcome.v1
    pub async fn mark_application_outcome(
        &self,
        params: ApplicationOutcomeParams,
    ) -> RpcResult<JobApplication> {
        self.applications
            .mark_application_outcome(&params.application_id, params.outcome, params.reason)
            .await
            .map_err(to_rpc_error)
    }

    /// application.change_status.v1
    pub async fn change_status(&self, params: ChangeStatusParams) -> RpcResult<JobApplication> {
        self.applications
            .change_status(&params.application_id, params.status, params.reason)
            .await
            .map_err(to_rpc_error)
    }

    /// application.view.v1
    pub async fn view_application(&self, params: ApplicationIdParams) -> RpcResult<JobApplication> {
        self.applications
            .view_application(&params.application_id)
            .await
            .map_err(to_rpc_error)
    }

    /// application.comment.v1
    pub async fn add_comment(&self, params: CommentParams) -> RpcResult<JobApplication> {
        self.applications
            .add_comment(&params.application_id, &params.comment)
            .await
            .map_err(to_rpc_error)
    }

    /// application.retry.v1
    pub async fn retry_application(
        &self,
        params: ApplicationIdParams,
    ) -> RpcResult<JobApplication> {
        self.applications
            .retry_application(&params.application_id)
            .await
            .map_err(to_rpc_error)
    }

    /// application.withdraw.v1
    pub async fn withdraw_application(
        &self,
        params: ApplicationReasonParams,
    ) -> RpcResult<JobApplication> {
        self.applications
            .withdraw_application(&params.application_id, params.reason)
            .await
            .map_err(to_rpc_error)
    }

    /// application.offer.v1
    pub async fn offer_job(&self, params: OfferParams) -> RpcResult<CascadeResult<JobApplication>> {
        self.applications
            .offer_job(&params.application_id, &params.offer_letter)
            .await
            .map_err(to_rpc_error)
    }

    /// application.accept_offer.v1
    pub async fn accept_offer(&self, params: ApplicationIdParams) -> RpcResult<JobApplication> {
        self.applications
            .accept_offer(&params.application_id)
            .await
            .map_err(to_rpc_error)
    }

    /// application.decline_offer.v1
    pub async fn decline_offer(
        &self,
        params: ApplicationReasonParams,
    ) -> RpcResult<JobApplication> {
        self.applications
            .decline_offer(&params.application_id, params.reason)
            .await
            .map_err(to_rpc_error)
    }

    // ------------------------------------------------------------------
    // interview.*
    // ------------------------------------------------------------------

    /// interview.schedule.v1
    pub async fn schedule_interview(
        &self,
        params: ScheduleInterviewRequest,
    ) -> RpcResult<Interview> {
        self.interviews
            .schedule_interview(params)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.get.v1
    pub async fn get_interview(&self, params: InterviewIdParams) -> RpcResult<Interview> {
        self.interviews
            .get_interview(&params.interview_id)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.list.v1
    pub async fn list_interviews(&self, params: ListInterviewsParams) -> RpcResult<Vec<Interview>> {
        let (filter, include_canceled) = params.into_filter();
        self.interviews
            .list_interviews(&filter, include_canceled)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.accept.v1
    pub async fn accept_interview(&self, params: InterviewIdParams) -> RpcResult<Interview> {
        self.interviews
            .accept_interview(&params.interview_id)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.reject.v1
    pub async fn reject_interview(&self, params: InterviewIdParams) -> RpcResult<Interview> {
        self.interviews
            .reject_interview(&params.interview_id)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.cancel.v1
    pub async fn cancel_interview(&self, params: InterviewIdParams) -> RpcResult<Interview> {
        self.interviews
            .cancel_interview(&params.interview_id)
            .await
            .map_err(to_rpc_error)
    }

    /// interview.complete.v1
    pub async fn complete_interview(&self, params: InterviewIdParams) -> RpcResult<Interview> {
        self.interviews
            .complete_interview(&params.interview_id)
            .await
            .map_err(to_rpc_error)
    }

    // ------------------------------------------------------------------
    // category.* / skill.*
    // ------------------------------------------------------------------

    /// category.create.v1
    pub async fn create_category(
        &self,
        params: CreateCatalogEntryRequest,
    ) -> RpcResult<CatalogEntry> {
        self.create_entry(CatalogKind::Category, params).await
    }

    /// category.update.v1
    pub async fn update_category(
        &self,
        params: UpdateCatalogEntryRequest,
    ) -> RpcResult<CatalogEntry> {
        self.update_entry(CatalogKind::Category, params).await
    }

    /// category.list.v1
    pub async fn list_categories(&self, params: ListCatalogParams) -> RpcResult<Vec<CatalogEntry>> {
        self.list_entries(CatalogKind::Category, params).await
    }

    /// category.get_by_name.v1
    pub async fn get_category_by_name(
        &self,
        params: CatalogNameParams,
    ) -> RpcResult<Option<CatalogEntry>> {
        self.get_by_name(CatalogKind::Category, params).await
    }

    /// skill.create.v1
    pub async fn create_skill(&self, params: CreateCatalogEntryRequest) -> RpcResult<CatalogEntry> {
        self.create_entry(CatalogKind::Skill, params).await
    }

    /// skill.update.v1
    pub async fn update_skill(&self, params: UpdateCatalogEntryRequest) -> RpcResult<CatalogEntry> {
        self.update_entry(CatalogKind::Skill, params).await
    }

    /// skill.list.v1
    pub async fn list_skills(&self, params: ListCatalogParams) -> RpcResult<Vec<CatalogEntry>> {
        self.list_entries(CatalogKind::Skill, params).await
    }

    /// skill.get_by_name.v1
    pub async fn get_skill_by_name(
        &self,
        params: CatalogNameParams,
    ) -> RpcResult<Option<CatalogEntry>> {
        self.get_by_name(CatalogKind::Skill, params).await
    }

    async fn create_entry(
        &self,
        kind: CatalogKind,
        params: CreateCatalogEntryRequest,
    ) -> RpcResult<CatalogEntry> {
        self.catalog
            .create_entry(kind, params)
            .await
            .map_err(to_rpc_error)
    }

    async fn update_entry(
        &self,
        kind: CatalogKind,
        params: UpdateCatalogEntryRequest,
    ) -> RpcResult<CatalogEntry> {
        self.catalog
            .update_entry(kind, params)
            .await
            .map_err(to_rpc_error)
    }

    async fn list_entries(
        &self,
        kind: CatalogKind,
        params: ListCatalogParams,
    ) -> RpcResult<Vec<CatalogEntry>> {
        self.catalog
            .list_entries(&params.into_filter(kind))
            .await
            .map_err(to_rpc_error)
    }

    async fn get_by_name(
        &self,
        kind: CatalogKind,
        params: CatalogNameParams,
    ) -> RpcResult<Option<CatalogEntry>> {
        self.catalog
            .get_by_name(kind, &params.name)
            .await
            .map_err(to_rpc_error)
    }
}
