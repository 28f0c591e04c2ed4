// Shared fixtures for the store tests

use crate::{create_pool, run_migrations};
use hireflow_core::domain::{
    ApplicationSubmission, ContactDetails, Interview, InterviewSlot, InterviewType, Job,
    JobApplication, JobDetails,
};
use sqlx::SqlitePool;

pub(crate) async fn setup_test_db() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub(crate) fn sample_job(id: &str, owner: &str) -> Job {
    Job::new(
        id,
        1000,
        owner,
        "company-1",
        JobDetails {
            title: "Backend Engineer".into(),
            employment_types: ["full-time".to_string()].into_iter().collect(),
            salary_range: None,
            categories: vec!["engineering".into()],
            skills: vec!["rust".into(), "sql".into()],
            description: "Build the lifecycle engine".into(),
            responsibilities: Some("Own the stores".into()),
            who_you_are: None,
            nice_to_haves: None,
        },
    )
}

pub(crate) fn sample_application(id: &str, user: &str, job_id: &str) -> JobApplication {
    JobApplication::new(
        id,
        1000,
        user,
        job_id,
        "company-1",
        "Backend Engineer",
        ApplicationSubmission {
            contact: ContactDetails {
                full_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: None,
            },
            resume: "https://files.example.com/ada.pdf".into(),
            cover_letter: None,
        },
    )
    .unwrap()
}

pub(crate) fn sample_interview(id: &str, application: &JobApplication, scheduled_time: i64) -> Interview {
    Interview::new(
        id,
        1000,
        application.job_id.clone(),
        application.id.clone(),
        application.user_id.clone(),
        InterviewSlot {
            interviewer_id: "interviewer-1".into(),
            scheduled_time,
            interview_type: InterviewType::Online,
            description: None,
        },
    )
}
