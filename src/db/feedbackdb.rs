use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::feedbackmodel::*;

#[async_trait]
pub trait FeedbackExt {
    async fn save_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, Error>;

    async fn get_request_feedback(&self, request_id: i64) -> Result<Option<Feedback>, Error>;

    async fn get_worker_feedback(&self, worker_id: i64) -> Result<Vec<Feedback>, Error>;

    async fn get_all_feedback(&self) -> Result<Vec<Feedback>, Error>;
}

#[async_trait]
impl FeedbackExt for DBClient {
    async fn save_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (request_id, user_id, worker_id, rating, comments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_feedback.request_id)
        .bind(new_feedback.user_id)
        .bind(new_feedback.worker_id)
        .bind(new_feedback.rating)
        .bind(new_feedback.comments)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_request_feedback(&self, request_id: i64) -> Result<Option<Feedback>, Error> {
        sqlx::query_as::<_, Feedback>(r#"SELECT * FROM feedback WHERE request_id = $1"#)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_worker_feedback(&self, worker_id: i64) -> Result<Vec<Feedback>, Error> {
        sqlx::query_as::<_, Feedback>(
            r#"SELECT * FROM feedback WHERE worker_id = $1 ORDER BY created_at DESC, id DESC"#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_feedback(&self) -> Result<Vec<Feedback>, Error> {
        sqlx::query_as::<_, Feedback>(r#"SELECT * FROM feedback ORDER BY created_at DESC, id DESC"#)
            .fetch_all(&self.pool)
            .await
    }
}
