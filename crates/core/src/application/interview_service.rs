// Interview lifecycle use cases

use crate::application::constants::CONDITIONAL_UPDATE_ATTEMPTS;
use crate::application::gateway::OutboundEvents;
use crate::application::job_application_service::JobApplicationService;
use crate::domain::validation::validate_id;
use crate::domain::{
    ApplicationStatus, Interview, InterviewSlot, InterviewStatus, OutboundEvent,
    OutboundTopic, StatusMachine, Transition,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, InterviewFilter, InterviewStore, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Schedule-interview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInterviewRequest {
    pub application_id: String,
    #[serde(flatten)]
    pub slot: InterviewSlot,
}

pub struct InterviewService {
    interviews: Arc<dyn InterviewStore>,
    applications: Arc<JobApplicationService>,
    events: Arc<OutboundEvents>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl InterviewService {
    pub fn new(
        interviews: Arc<dyn InterviewStore>,
        applications: Arc<JobApplicationService>,
        events: Arc<OutboundEvents>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            interviews,
            applications,
            events,
            id_provider,
            time_provider,
        }
    }

    /// Book an interview for a shortlisted (or already interviewing) application
    ///
    /// The interview is inserted first so the slot guard runs before the application moves; if
    /// the application then refuses `interview`, the new interview is canceled again.
    pub async fn schedule_interview(&self, req: ScheduleInterviewRequest) -> Result<Interview> {
        validate_id("interviewer", &req.slot.interviewer_id)?;
        let now = self.time_provider.now_millis();
        if req.slot.scheduled_time <= now {
            return Err(AppError::Validation(
                "interview must be scheduled in the future".to_string(),
            ));
        }

        let application = self
            .applications
            .get_application(&req.application_id)
            .await?;
        application.status.evaluate(ApplicationStatus::Interview)?;

        let interview = Interview::new(
            self.id_provider.generate_id(),
            now,
            application.job_id.clone(),
            application.id.clone(),
            application.user_id.clone(),
            req.slot,
        );
        self.interviews.insert(&interview).await?;

        if let Err(e) = self.applications.move_to_interview(&application.id).await {
            warn!(
                interview_id = %interview.id,
                application_id = %application.id,
                error = %e,
                "Application refused interview stage, canceling new interview"
            );
            let mut canceled = interview.clone();
            canceled.status = InterviewStatus::Canceled;
            canceled.updated_at = self.time_provider.now_millis();
            if let Err(undo) = self
                .interviews
                .update_status_if(&canceled, InterviewStatus::Scheduled)
                .await
            {
                warn!(interview_id = %interview.id, error = %undo, "Failed to cancel orphaned interview");
            }
            return Err(e);
        }

        info!(
            interview_id = %interview.id,
            application_id = %interview.application_id,
            scheduled_time = interview.scheduled_time,
            "Interview scheduled"
        );
        self.events
            .emit(OutboundEvent::interview(
                OutboundTopic::InterviewScheduled,
                &interview,
                now,
            ))
            .await;
        Ok(interview)
    }

    /// Applicant accepts (`scheduled -> accepted`)
    pub async fn accept_interview(&self, interview_id: &str) -> Result<Interview> {
        self.respond(interview_id, InterviewStatus::Accepted, OutboundTopic::InterviewAccepted)
            .await
    }

    /// Applicant rejects (`scheduled -> rejected`)
    pub async fn reject_interview(&self, interview_id: &str) -> Result<Interview> {
        self.respond(interview_id, InterviewStatus::Rejected, OutboundTopic::InterviewRejected)
            .await
    }

    /// Company cancels (`scheduled | accepted -> canceled`)
    pub async fn cancel_interview(&self, interview_id: &str) -> Result<Interview> {
        let (interview, transition) = self
            .transition_with(interview_id, InterviewStatus::Canceled)
            .await?;
        if transition == Transition::Apply {
            info!(interview_id = %interview.id, "Interview canceled");
        }
        Ok(interview)
    }

    /// `accepted -> completed`
    pub async fn complete_interview(&self, interview_id: &str) -> Result<Interview> {
        let (interview, transition) = self
            .transition_with(interview_id, InterviewStatus::Completed)
            .await?;
        if transition == Transition::Apply {
            info!(interview_id = %interview.id, "Interview completed");
        }
        Ok(interview)
    }

    pub async fn get_interview(&self, interview_id: &str) -> Result<Interview> {
        validate_id("interview", interview_id)?;
        self.interviews
            .find_by_id(interview_id)
            .await?
            .ok_or_else(|| AppError::not_found("interview", interview_id))
    }

    /// Interviews matching `filter`; canceled ones are hidden unless asked for
    pub async fn list_interviews(
        &self,
        filter: &InterviewFilter,
        include_canceled: bool,
    ) -> Result<Vec<Interview>> {
        let mut filter = filter.clone();
        if filter.statuses.is_none() && !include_canceled {
            filter.statuses = Some(
                InterviewStatus::ALL
                    .into_iter()
                    .filter(|s| *s != InterviewStatus::Canceled)
                    .collect(),
            );
        }
        self.interviews.find_by_filter(&filter).await
    }

    async fn respond(
        &self,
        interview_id: &str,
        target: InterviewStatus,
        topic: OutboundTopic,
    ) -> Result<Interview> {
        let (interview, transition) = self.transition_with(interview_id, target).await?;
        if transition == Transition::Apply {
            info!(interview_id = %interview.id, status = %interview.status, "Interview answered");
            self.events
                .emit(OutboundEvent::interview(
                    topic,
                    &interview,
                    self.time_provider.now_millis(),
                ))
                .await;
        }
        Ok(interview)
    }

    async fn transition_with(
        &self,
        interview_id: &str,
        target: InterviewStatus,
    ) -> Result<(Interview, Transition)> {
        for attempt in 1..=CONDITIONAL_UPDATE_ATTEMPTS {
            let mut interview = self.get_interview(interview_id).await?;
            let expected = interview.status;

            let transition = interview.transition_to(target, self.time_provider.now_millis())?;
            if transition == Transition::NoOp {
                debug!(interview_id = %interview_id, status = %expected, "Interview transition is a no-op");
                return Ok((interview, transition));
            }
            if self.interviews.update_status_if(&interview, expected).await? {
                return Ok((interview, transition));
            }
            debug!(interview_id = %interview_id, attempt, "Interview changed concurrently, re-reading");
        }
        Err(AppError::Conflict(format!(
            "interview {} kept changing",
            interview_id
        )))
    }
}
