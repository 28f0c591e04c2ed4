//! End-to-end lifecycles driven through the bus and the services

#[macro_use]
mod common;

use common::{apply_request, interview_request, job_request, TestEnv, HOUR};
use hireflow_core::application::constants::JOB_CLOSED_REASON;
use hireflow_core::application::CreateCatalogEntryRequest;
use hireflow_core::domain::{
    ApplicationStatus, CatalogKind, InboundTopic, InterviewStatus, JobStatus, OutboundTopic,
};
use hireflow_core::AppError;
use serde_json::json;

#[tokio::test]
async fn test_job_posting_through_interview_and_closure() {
    let env = TestEnv::start().await;
    let o = &env.orchestrator;

    // Validation request goes out, acceptance comes back over the bus
    let job = o.jobs.create_job(job_request("owner-1")).await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    eventually!(
        "validation request",
        env.outbound.count(OutboundTopic::JobValidationRequest) == 1
    );
    let request = &env.outbound.on_topic(OutboundTopic::JobValidationRequest)[0];
    assert_eq!(request["job_id"], json!(job.id));
    assert_eq!(request["user_id"], json!("owner-1"));

    env.deliver(InboundTopic::JobPostAccepted, &job.id, json!({ "job_id": job.id }))
        .await;
    eventually!(
        "job live",
        o.jobs.get_job(&job.id).await.unwrap().status == JobStatus::Live
    );

    // U1 applies to J1
    let application = o
        .applications
        .apply(apply_request("user-1", &job.id))
        .await
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.job_role, job.details.title);

    env.deliver(
        InboundTopic::JobApplicationAccepted,
        &application.id,
        json!({ "job_application_id": application.id }),
    )
    .await;
    eventually!(
        "application applied",
        o.applications.get_application(&application.id).await.unwrap().status
            == ApplicationStatus::Applied
    );

    // Company pipeline up to a scheduled interview
    let viewed = o.applications.view_application(&application.id).await.unwrap();
    assert_eq!(viewed.status, ApplicationStatus::InReview);
    o.applications
        .change_status(&application.id, ApplicationStatus::Shortlisted, None)
        .await
        .unwrap();
    let interview = o
        .interviews
        .schedule_interview(interview_request(&application.id, "hr-1", env.now() + HOUR))
        .await
        .unwrap();
    assert_eq!(interview.status, InterviewStatus::Scheduled);
    assert_eq!(interview.job_id, job.id);
    assert_eq!(
        o.applications.get_application(&application.id).await.unwrap().status,
        ApplicationStatus::Interview
    );

    eventually!(
        "applicant notifications",
        env.outbound.count(OutboundTopic::JobApplied) == 1
            && env.outbound.count(OutboundTopic::JobApplicationViewed) == 1
            && env.outbound.count(OutboundTopic::InterviewScheduled) == 1
    );
    let scheduled = &env.outbound.on_topic(OutboundTopic::InterviewScheduled)[0];
    assert_eq!(scheduled["id"], json!(interview.id));
    assert_eq!(scheduled["applicantId"], json!("user-1"));

    // Closing J1 ends everything hanging off it
    let closed = o.jobs.close_job(&job.id).await.unwrap();
    assert_eq!(closed.entity.status, JobStatus::Closed);
    assert!(closed.cascade.is_complete());
    let report = closed.cascade.report();
    assert_eq!(report.applications_declined, 1);
    assert_eq!(report.interviews_canceled, 1);

    let application = o.applications.get_application(&application.id).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::Declined);
    assert_eq!(application.declined_reason.as_deref(), Some(JOB_CLOSED_REASON));
    assert_eq!(
        o.interviews.get_interview(&interview.id).await.unwrap().status,
        InterviewStatus::Canceled
    );

    // Closed jobs take no new applicants
    let err = o
        .applications
        .apply(apply_request("user-2", &job.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    env.shutdown().await;
}

#[tokio::test]
async fn test_rejected_job_is_fixed_and_resubmitted() {
    let env = TestEnv::start().await;
    let o = &env.orchestrator;

    // Rejected by the validator
    let job = o.jobs.create_job(job_request("owner-2")).await.unwrap();
    env.deliver(
        InboundTopic::JobPostRejected,
        &job.id,
        json!({ "job_id": job.id, "reason": "missing salary" }),
    )
    .await;
    eventually!(
        "job failed",
        o.jobs.get_job(&job.id).await.unwrap().status == JobStatus::Failed
    );
    let failed = o.jobs.get_job(&job.id).await.unwrap();
    assert_eq!(failed.failed_reason.as_deref(), Some("missing salary"));

    // Applicants cannot reach a failed job
    assert!(o
        .applications
        .apply(apply_request("user-1", &job.id))
        .await
        .is_err());

    let retried = o.jobs.retry_job(&job.id).await.unwrap();
    assert_eq!(retried.status, JobStatus::Pending);
    assert_eq!(retried.failed_reason, None);

    eventually!(
        "second validation request",
        env.outbound.count(OutboundTopic::JobValidationRequest) == 2
    );
    for request in env.outbound.on_topic(OutboundTopic::JobValidationRequest) {
        assert_eq!(request["job_id"], json!(job.id));
    }

    // Accepted this time, via the generic outcome topic
    env.deliver(
        InboundTopic::JobValidationOutcome,
        &job.id,
        json!({ "job_id": job.id, "outcome": "success" }),
    )
    .await;
    eventually!(
        "job live",
        o.jobs.get_job(&job.id).await.unwrap().status == JobStatus::Live
    );

    env.shutdown().await;
}

#[tokio::test]
async fn test_redelivered_outcomes_are_absorbed() {
    let env = TestEnv::start().await;
    let o = &env.orchestrator;

    let job = o.jobs.create_job(job_request("owner-1")).await.unwrap();
    for _ in 0..3 {
        env.deliver(InboundTopic::JobPostAccepted, &job.id, json!({ "job_id": job.id }))
            .await;
    }
    // A rejection that arrives after acceptance is dropped, not applied
    env.deliver(
        InboundTopic::JobPostRejected,
        &job.id,
        json!({ "job_id": job.id, "reason": "late" }),
    )
    .await;
    // Malformed and unknown-entity messages are rejected per message
    env.deliver(InboundTopic::JobPostAccepted, &job.id, json!({ "id": 7 }))
        .await;
    env.deliver(
        InboundTopic::JobPostAccepted,
        "job-unknown",
        json!({ "job_id": "job-unknown" }),
    )
    .await;

    // Same key, same partition: once the final message is handled everything before it was too
    env.deliver(InboundTopic::JobPostAccepted, &job.id, json!({ "job_id": job.id }))
        .await;
    env.shutdown().await;

    let job = o.jobs.get_job(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Live);
    assert_eq!(job.failed_reason, None);
}

#[tokio::test]
async fn test_offer_ends_competing_interviews() {
    let env = TestEnv::start().await;
    let o = &env.orchestrator;

    let job = o.jobs.create_job(job_request("owner-1")).await.unwrap();
    o.jobs
        .mark_validation_outcome(
            &job.id,
            hireflow_core::domain::ValidationOutcome::Success,
            None,
        )
        .await
        .unwrap();

    let first = common::scheduled_interview(&env, &job.id, "user-1").await;
    let second = common::scheduled_interview(&env, &job.id, "user-2").await;

    let offered = o
        .applications
        .offer_job(&first.application_id, "offers/user-1.pdf")
        .await
        .unwrap();
    assert_eq!(offered.entity.status, ApplicationStatus::Offered);
    assert_eq!(offered.cascade.report().interviews_canceled, 2);

    for interview in [&first, &second] {
        assert_eq!(
            o.interviews.get_interview(&interview.id).await.unwrap().status,
            InterviewStatus::Canceled
        );
    }

    let hired = o.applications.accept_offer(&first.application_id).await.unwrap();
    assert_eq!(hired.status, ApplicationStatus::Hired);

    eventually!(
        "offer notifications",
        env.outbound.count(OutboundTopic::JobOffered) == 1
            && env.outbound.count(OutboundTopic::JobOfferAccepted) == 1
    );
    env.shutdown().await;
}

#[tokio::test]
async fn test_jobs_reference_the_catalog() {
    let env = TestEnv::start().await;
    let o = &env.orchestrator;

    let skill = o
        .catalog
        .create_entry(
            CatalogKind::Skill,
            CreateCatalogEntryRequest {
                name: "kubernetes".to_string(),
                is_active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(skill.name, "Kubernetes");
    assert!(matches!(
        o.catalog
            .create_entry(
                CatalogKind::Skill,
                CreateCatalogEntryRequest {
                    name: "KUBERNETES".to_string(),
                    is_active: true,
                },
            )
            .await,
        Err(AppError::DuplicateEntity(_))
    ));

    let mut request = job_request("owner-1");
    request.details.skills.push("cobol".to_string());
    assert!(matches!(
        o.jobs.create_job(request).await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(env.outbound.count(OutboundTopic::JobValidationRequest), 0);

    let mut request = job_request("owner-1");
    request.details.skills.push(skill.id.clone());
    let job = o.jobs.create_job(request).await.unwrap();
    assert!(job.details.skills.contains(&skill.id));
    env.shutdown().await;
}
