// SQLite InterviewStore Implementation

use crate::error::{corrupt_row, map_sqlx_error};
use crate::query::{push_eq, push_statuses};
use async_trait::async_trait;
use hireflow_core::domain::{Interview, InterviewStatus, InterviewType};
use hireflow_core::error::Result;
use hireflow_core::port::{InterviewFilter, InterviewStore, StatusUpdate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

pub struct SqliteInterviewStore {
    pool: SqlitePool,
}

impl SqliteInterviewStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &InterviewFilter) {
    push_eq(qb, "job_id", &filter.job_id);
    push_eq(qb, "application_id", &filter.application_id);
    push_eq(qb, "applicant_id", &filter.applicant_id);
    push_eq(qb, "interviewer_id", &filter.interviewer_id);
    push_statuses(
        qb,
        filter
            .statuses
            .as_ref()
            .map(|s| s.iter().map(|status| status.as_str()).collect()),
    );
    if let Some(threshold) = filter.scheduled_before {
        qb.push(" AND scheduled_time <= ");
        qb.push_bind(threshold);
    }
}

#[async_trait]
impl InterviewStore for SqliteInterviewStore {
    async fn insert(&self, interview: &Interview) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interviews (
                id, job_id, application_id, applicant_id, interviewer_id,
                scheduled_time, interview_type, status, description,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&interview.id)
        .bind(&interview.job_id)
        .bind(&interview.application_id)
        .bind(&interview.applicant_id)
        .bind(&interview.interviewer_id)
        .bind(interview.scheduled_time)
        .bind(interview.interview_type.as_str())
        .bind(interview.status.as_str())
        .bind(&interview.description)
        .bind(interview.created_at)
        .bind(interview.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(
            interview_id = %interview.id,
            scheduled_time = interview.scheduled_time,
            "Interview stored"
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(InterviewRow::into_interview).transpose()
    }

    async fn find_by_filter(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM interviews WHERE 1 = 1");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY scheduled_time ASC, id ASC");

        let rows: Vec<InterviewRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(InterviewRow::into_interview).collect()
    }

    async fn update_status_if(
        &self,
        interview: &Interview,
        expected: InterviewStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE interviews SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(interview.status.as_str())
        .bind(interview.updated_at)
        .bind(&interview.id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_many(
        &self,
        filter: &InterviewFilter,
        update: &StatusUpdate<InterviewStatus>,
    ) -> Result<u64> {
        // Interviews carry no reason column
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE interviews SET status = ");
        qb.push_bind(update.status.as_str());
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
            "Bulk interview status update"
        );
        Ok(result.rows_affected())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InterviewRow {
    id: String,
    job_id: String,
    application_id: String,
    applicant_id: String,
    interviewer_id: String,
    scheduled_time: i64,
    interview_type: String,
    status: String,
    description: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl InterviewRow {
    fn into_interview(self) -> Result<Interview> {
        let status: InterviewStatus = self
            .status
            .parse()
            .map_err(|e| corrupt_row("interviews", &self.id, e))?;
        let interview_type: InterviewType = self
            .interview_type
            .parse()
            .map_err(|e| corrupt_row("interviews", &self.id, e))?;

        Ok(Interview {
            id: self.id,
            job_id: self.job_id,
            application_id: self.application_id,
            applicant_id: self.applicant_id,
            interviewer_id: self.interviewer_id,
            scheduled_time: self.scheduled_time,
            interview_type,
            status,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_application, sample_interview, sample_job, setup_test_db};
    use crate::{SqliteApplicationStore, SqliteJobStore};
    use hireflow_core::domain::JobApplication;
    use hireflow_core::port::{ApplicationStore, JobStore};
    use hireflow_core::AppError;

    async fn setup() -> (SqliteInterviewStore, JobApplication) {
        let pool = setup_test_db().await;
        SqliteJobStore::new(pool.clone())
            .insert(&sample_job("job-1", "owner-1"))
            .await
            .unwrap();
        let app = sample_application("app-1", "user-1", "job-1");
        SqliteApplicationStore::new(pool.clone())
            .insert(&app)
            .await
            .unwrap();
        (SqliteInterviewStore::new(pool), app)
    }

    #[tokio::test]
    async fn test_insert_and_find_ordered_by_time() {
        let (store, app) = setup().await;
        store.insert(&sample_interview("int-late", &app, 9000)).await.unwrap();
        store.insert(&sample_interview("int-early", &app, 5000)).await.unwrap();

        let found = store.find_by_id("int-late").await.unwrap().unwrap();
        assert_eq!(found.interview_type, InterviewType::Online);
        assert_eq!(found.status, InterviewStatus::Scheduled);

        let all = store
            .find_by_filter(&InterviewFilter::for_job("job-1"))
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["int-early", "int-late"]);
    }

    #[tokio::test]
    async fn test_slot_guard_ignores_released_interviews() {
        let (store, app) = setup().await;
        let mut first = sample_interview("int-1", &app, 5000);
        store.insert(&first).await.unwrap();

        assert!(matches!(
            store.insert(&sample_interview("int-2", &app, 5000)).await,
            Err(AppError::DuplicateEntity(_))
        ));

        first.transition_to(InterviewStatus::Canceled, 2000).unwrap();
        assert!(store.update_status_if(&first, InterviewStatus::Scheduled).await.unwrap());
        store.insert(&sample_interview("int-2", &app, 5000)).await.unwrap();
    }

    #[tokio::test]
    async fn test_overdue_sweep_only_touches_scheduled() {
        let (store, app) = setup().await;
        store.insert(&sample_interview("int-due", &app, 5000)).await.unwrap();
        store.insert(&sample_interview("int-future", &app, 50_000)).await.unwrap();

        let mut accepted = sample_interview("int-accepted", &app, 4000);
        accepted.transition_to(InterviewStatus::Accepted, 1500).unwrap();
        store.insert(&accepted).await.unwrap();

        let update = StatusUpdate::new(InterviewStatus::Expired, 10_000);
        assert_eq!(
            store
                .update_many(&InterviewFilter::overdue(5000), &update)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .update_many(&InterviewFilter::overdue(5000), &update)
                .await
                .unwrap(),
            0
        );

        let expired = store.find_by_id("int-due").await.unwrap().unwrap();
        assert_eq!(expired.status, InterviewStatus::Expired);
        assert_eq!(expired.updated_at, 10_000);
        let future = store.find_by_id("int-future").await.unwrap().unwrap();
        assert_eq!(future.status, InterviewStatus::Scheduled);
        let kept = store.find_by_id("int-accepted").await.unwrap().unwrap();
        assert_eq!(kept.status, InterviewStatus::Accepted);
    }

    #[tokio::test]
    async fn test_overdue_threshold_is_inclusive() {
        let (store, app) = setup().await;
        store.insert(&sample_interview("int-at", &app, 7000)).await.unwrap();
        store.insert(&sample_interview("int-after", &app, 7001)).await.unwrap();

        let update = StatusUpdate::new(InterviewStatus::Expired, 9000);
        assert_eq!(
            store
                .update_many(&InterviewFilter::overdue(6999), &update)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .update_many(&InterviewFilter::overdue(7000), &update)
                .await
                .unwrap(),
            1
        );
        let at = store.find_by_id("int-at").await.unwrap().unwrap();
        assert_eq!(at.status, InterviewStatus::Expired);
        let after = store.find_by_id("int-after").await.unwrap().unwrap();
        assert_eq!(after.status, InterviewStatus::Scheduled);
    }
}
