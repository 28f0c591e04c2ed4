// SQLite JobStore Implementation

use crate::error::{corrupt_row, map_sqlx_error};
use crate::query::{push_eq, push_statuses};
use async_trait::async_trait;
use hireflow_core::domain::{Job, JobDetails, JobStatus, SalaryRange};
use hireflow_core::error::Result;
use hireflow_core::port::{JobFilter, JobStore, StatusUpdate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteJobStore {
    pool: SqlitePool,
}

impl SqliteJobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &JobFilter) {
    push_eq(qb, "user_id", &filter.user_id);
    push_eq(qb, "company_profile_id", &filter.company_profile_id);
    push_statuses(
        qb,
        filter
            .statuses
            .as_ref()
            .map(|s| s.iter().map(|status| status.as_str()).collect()),
    );
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn insert(&self, job: &Job) -> Result<()> {
        let d = &job.details;
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, user_id, company_profile_id,
                title, employment_types, salary_min, salary_max,
                categories, skills, description,
                responsibilities, who_you_are, nice_to_haves,
                status, failed_reason, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.user_id)
        .bind(&job.company_profile_id)
        .bind(&d.title)
        .bind(serde_json::to_string(&d.employment_types)?)
        .bind(d.salary_range.map(|r| r.min))
        .bind(d.salary_range.map(|r| r.max))
        .bind(serde_json::to_string(&d.categories)?)
        .bind(serde_json::to_string(&d.skills)?)
        .bind(&d.description)
        .bind(&d.responsibilities)
        .bind(&d.who_you_are)
        .bind(&d.nice_to_haves)
        .bind(job.status.as_str())
        .bind(&job.failed_reason)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn find_by_filter(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM jobs WHERE 1 = 1");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC, id ASC");

        let rows: Vec<JobRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn update_status_if(&self, job: &Job, expected: JobStatus) -> Result<bool> {
        // Conditional on the status that was read (lost races update nothing)
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = ?, failed_reason = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(job.status.as_str())
        .bind(&job.failed_reason)
        .bind(job.updated_at)
        .bind(&job.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_details_if(&self, job: &Job, expected: JobStatus) -> Result<bool> {
        let d = &job.details;
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = ?, employment_types = ?, salary_min = ?, salary_max = ?,
                categories = ?, skills = ?, description = ?,
                responsibilities = ?, who_you_are = ?, nice_to_haves = ?,
                updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(&d.title)
        .bind(serde_json::to_string(&d.employment_types)?)
        .bind(d.salary_range.map(|r| r.min))
        .bind(d.salary_range.map(|r| r.max))
        .bind(serde_json::to_string(&d.categories)?)
        .bind(serde_json::to_string(&d.skills)?)
        .bind(&d.description)
        .bind(&d.responsibilities)
        .bind(&d.who_you_are)
        .bind(&d.nice_to_haves)
        .bind(job.updated_at)
        .bind(&job.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_many(
        &self,
        filter: &JobFilter,
        update: &StatusUpdate<JobStatus>,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE jobs SET status = ");
        qb.push_bind(update.status.as_str());
        if update.status == JobStatus::Failed {
            qb.push(", failed_reason = ");
            qb.push_bind(update.reason.clone());
        }
        qb.push(", updated_at = ");
        qb.push_bind(update.updated_at);
        qb.push(" WHERE 1 = 1");
        push_filter(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    user_id: String,
    company_profile_id: String,
    title: String,
    employment_types: String, // JSON array
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    categories: String, // JSON array
    skills: String,     // JSON array
    description: String,
    responsibilities: Option<String>,
    who_you_are: Option<String>,
    nice_to_haves: Option<String>,
    status: String,
    failed_reason: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl JobRow {
    fn into_job(self) -> Result<Job> {
        let status: JobStatus = self
            .status
            .parse()
            .map_err(|e| corrupt_row("jobs", &self.id, e))?;
        let salary_range = match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(SalaryRange { min, max }),
            _ => None,
        };

        Ok(Job {
            details: JobDetails {
                title: self.title,
                employment_types: serde_json::from_str(&self.employment_types)?,
                salary_range,
                categories: serde_json::from_str(&self.categories)?,
                skills: serde_json::from_str(&self.skills)?,
                description: self.description,
                responsibilities: self.responsibilities,
                who_you_are: self.who_you_are,
                nice_to_haves: self.nice_to_haves,
            },
            id: self.id,
            user_id: self.user_id,
            company_profile_id: self.company_profile_id,
            status,
            failed_reason: self.failed_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
