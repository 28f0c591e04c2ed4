// SQLite ApplicationStore Implementation

use crate::error::{corrupt_row, map_sqlx_error};
use crate::query::{push_eq, push_statuses};
use async_trait::async_trait;
use hireflow_core::domain::{ApplicationStatus, ContactDetails, JobApplication, ReviewerComment};
use hireflow_core::error::Result;
use hireflow_core::port::{ApplicationFilter, ApplicationStore, StatusUpdate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

pub struct SqliteApplicationStore {
    pool: SqlitePool,
}

impl SqliteApplicationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ApplicationFilter) {
    push_eq(qb, "user_id", &filter.user_id);
    push_eq(qb, "job_id", &filter.job_id);
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
impl ApplicationStore for SqliteApplicationStore {
    async fn insert(&self, application: &JobApplication) -> Result<()> {
        // ux_applications_user_job turns a second live application into DuplicateEntity
        sqlx::query(
            r#"
            INSERT INTO job_applications (
                id, user_id, job_id, company_profile_id, job_role,
                full_name, email, phone, resume, cover_letter, offer_letter,
                status, failed_reason, declined_reason, comment_text, commented_at,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.user_id)
        .bind(&application.job_id)
        .bind(&application.company_profile_id)
        .bind(&application.job_role)
        .bind(&application.contact.full_name)
        .bind(&application.contact.email)
        .bind(&application.contact.phone)
        .bind(&application.resume)
        .bind(&application.cover_letter)
        .bind(&application.offer_letter)
        .bind(application.status.as_str())
        .bind(&application.failed_reason)
        .bind(&application.declined_reason)
        .bind(application.comment.as_ref().map(|c| c.text.clone()))
        .bind(application.comment.as_ref().map(|c| c.commented_at))
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(application_id = %application.id, job_id = %application.job_id, "Application stored");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JobApplication>> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM job_applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ApplicationRow::into_application).transpose()
    }

    async fn find_by_filter(&self, filter: &ApplicationFilter) -> Result<Vec<JobApplication>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM job_applications WHERE 1 = 1");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC, id ASC");

        let rows: Vec<ApplicationRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(ApplicationRow::into_application).collect()
    }

    async fn update_status_if(
        &self,
        application: &JobApplication,
        expected: ApplicationStatus,
    ) -> Result<bool> {
        // Status-owned columns only; comment and submission stay as stored
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET status = ?, failed_reason = ?, declined_reason = ?, offer_letter = ?,
                updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(application.status.as_str())
        .bind(&application.failed_reason)
        .bind(&application.declined_reason)
        .bind(&application.offer_letter)
        .bind(application.updated_at)
        .bind(&application.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_comment_if(
        &self,
        application: &JobApplication,
        expected: ApplicationStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET comment_text = ?, commented_at = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(application.comment.as_ref().map(|c| c.text.clone()))
        .bind(application.comment.as_ref().map(|c| c.commented_at))
        .bind(application.updated_at)
        .bind(&application.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_many(
        &self,
        filter: &ApplicationFilter,
        update: &StatusUpdate<ApplicationStatus>,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE job_applications SET status = ");
        qb.push_bind(update.status.as_str());
        match update.status {
            ApplicationStatus::Failed => {
                qb.push(", failed_reason = ");
                qb.push_bind(update.reason.clone());
            }
            ApplicationStatus::Declined => {
                qb.push(", declined_reason = ");
                qb.push_bind(update.reason.clone());
            }
            ApplicationStatus::Pending => {
                qb.push(", failed_reason = NULL");
            }
            _ => {}
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

        debug!(
            status = %update.status,
            rows = result.rows_affected(),
            "Bulk application status update"
        );
        Ok(result.rows_affected())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    user_id: String,
    job_id: String,
    company_profile_id: String,
    job_role: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    resume: String,
    cover_letter: Option<String>,
    offer_letter: Option<String>,
    status: String,
    failed_reason: Option<String>,
    declined_reason: Option<String>,
    comment_text: Option<String>,
    commented_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl ApplicationRow {
    fn into_application(self) -> Result<JobApplication> {
        let status: ApplicationStatus = self
            .status
            .parse()
            .map_err(|e| corrupt_row("job_applications", &self.id, e))?;
        let comment = match (self.comment_text, self.commented_at) {
            (Some(text), Some(commented_at)) => Some(ReviewerComment { text, commented_at }),
            _ => None,
        };

        Ok(JobApplication {
            id: self.id,
            user_id: self.user_id,
            job_id: self.job_id,
            company_profile_id: self.company_profile_id,
            job_role: self.job_role,
            contact: ContactDetails {
                full_name: self.full_name,
                email: self.email,
                phone: self.phone,
            },
            resume: self.resume,
            cover_letter: self.cover_letter,
            offer_letter: self.offer_letter,
            status,
            failed_reason: self.failed_reason,
            declined_reason: self.declined_reason,
            comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
