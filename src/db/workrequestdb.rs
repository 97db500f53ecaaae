use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::workrequestmodel::*;

const DETAILS_SELECT: &str = r#"
    SELECT wr.*,
        st.name AS skill_name,
        u.first_name AS user_first_name,
        u.last_name AS user_last_name,
        w.first_name AS worker_first_name,
        w.last_name AS worker_last_name
    FROM work_requests wr
    JOIN skill_types st ON st.id = wr.skill_type_id
    LEFT JOIN accounts u ON u.id = wr.user_id
    LEFT JOIN accounts w ON w.id = wr.worker_id
"#;

#[async_trait]
pub trait WorkRequestExt {
    async fn create_work_request(&self, new_request: NewWorkRequest) -> Result<WorkRequest, Error>;

    async fn get_work_request(&self, request_id: i64) -> Result<Option<WorkRequest>, Error>;

    /// Persists a transitioned request if its stored version still equals
    /// `request.version`. Returns `None` when another writer got there first.
    async fn save_work_request(&self, request: &WorkRequest) -> Result<Option<WorkRequest>, Error>;

    async fn get_user_work_requests(&self, user_id: i64) -> Result<Vec<WorkRequestDetails>, Error>;

    async fn get_worker_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error>;

    /// Pending, unassigned requests whose skill the worker holds, newest first.
    async fn get_available_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error>;

    async fn get_all_work_requests(&self) -> Result<Vec<WorkRequestDetails>, Error>;

    /// Accepted requests the account takes part in, as owner or worker.
    async fn count_active_work_requests(&self, account_id: i64) -> Result<i64, Error>;
}

#[async_trait]
impl WorkRequestExt for DBClient {
    async fn create_work_request(&self, new_request: NewWorkRequest) -> Result<WorkRequest, Error> {
        sqlx::query_as::<_, WorkRequest>(
            r#"
            INSERT INTO work_requests
            (user_id, skill_type_id, description, request_date, location, city, pincode,
             door_no, street_name, area)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(new_request.user_id)
        .bind(new_request.skill_type_id)
        .bind(new_request.description)
        .bind(new_request.request_date)
        .bind(new_request.location)
        .bind(new_request.city)
        .bind(new_request.pincode)
        .bind(new_request.door_no)
        .bind(new_request.street_name)
        .bind(new_request.area)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_work_request(&self, request_id: i64) -> Result<Option<WorkRequest>, Error> {
        sqlx::query_as::<_, WorkRequest>(r#"SELECT * FROM work_requests WHERE request_id = $1"#)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_work_request(&self, request: &WorkRequest) -> Result<Option<WorkRequest>, Error> {
        sqlx::query_as::<_, WorkRequest>(
            r#"
            UPDATE work_requests
            SET worker_id = $3,
                status = $4,
                time_slot = $5,
                worker_arrival_time = $6,
                user_confirmation_status = $7,
                amount = $8,
                completed_date = $9,
                version = version + 1,
                updated_at = NOW()
            WHERE request_id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(request.request_id)
        .bind(request.version)
        .bind(request.worker_id)
        .bind(request.status)
        .bind(&request.time_slot)
        .bind(&request.worker_arrival_time)
        .bind(request.user_confirmation_status)
        .bind(&request.amount)
        .bind(request.completed_date)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_work_requests(&self, user_id: i64) -> Result<Vec<WorkRequestDetails>, Error> {
        let query = format!(
            "{} WHERE wr.user_id = $1 ORDER BY wr.request_date DESC, wr.request_id ASC",
            DETAILS_SELECT
        );

        sqlx::query_as::<_, WorkRequestDetails>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_worker_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error> {
        let query = format!(
            "{} WHERE wr.worker_id = $1 ORDER BY wr.request_date DESC, wr.request_id ASC",
            DETAILS_SELECT
        );

        sqlx::query_as::<_, WorkRequestDetails>(&query)
            .bind(worker_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_available_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error> {
        let query = format!(
            r#"{}
            WHERE wr.status = 'pending'
              AND wr.worker_id IS NULL
              AND wr.skill_type_id IN (
                  SELECT skill_type_id FROM worker_skills WHERE worker_id = $1
              )
            ORDER BY wr.request_date DESC, wr.request_id ASC"#,
            DETAILS_SELECT
        );

        sqlx::query_as::<_, WorkRequestDetails>(&query)
            .bind(worker_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_all_work_requests(&self) -> Result<Vec<WorkRequestDetails>, Error> {
        let query = format!(
            "{} ORDER BY wr.request_date DESC, wr.request_id ASC",
            DETAILS_SELECT
        );

        sqlx::query_as::<_, WorkRequestDetails>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_active_work_requests(&self, account_id: i64) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM work_requests
            WHERE status = 'accepted' AND (user_id = $1 OR worker_id = $1)
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
