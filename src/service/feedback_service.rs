use std::sync::Arc;

use crate::{
    db::{feedbackdb::FeedbackExt, workrequestdb::WorkRequestExt, Store},
    models::{
        accountmodel::{Account, AccountRole},
        feedbackmodel::*,
        workrequestmodel::RequestStatus,
    },
    service::error::ServiceError,
};

#[derive(Debug)]
pub struct FeedbackService<D> {
    db_client: Arc<D>,
}

impl<D: Store> FeedbackService<D> {
    pub fn new(db_client: Arc<D>) -> Self {
        Self { db_client }
    }

    /// Records the owner's rating of a Completed request, at most once.
    pub async fn submit(
        &self,
        user_id: i64,
        request_id: i64,
        rating: i32,
        comments: Option<String>,
    ) -> Result<Feedback, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let request = self
            .db_client
            .get_work_request(request_id)
            .await?
            .ok_or(ServiceError::WorkRequestNotFound(request_id))?;

        if request.user_id != user_id {
            return Err(ServiceError::Forbidden(format!(
                "Account {} does not own work request {}",
                user_id, request_id
            )));
        }

        let worker_id = match (request.status, request.worker_id) {
            (RequestStatus::Completed, Some(worker_id)) => worker_id,
            (status, _) => {
                return Err(ServiceError::Conflict(format!(
                    "Work request {} is {} and cannot receive feedback",
                    request_id, status
                )))
            }
        };

        let already_rated = format!(
            "Feedback for work request {} was already submitted",
            request_id
        );

        if self
            .db_client
            .get_request_feedback(request_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(already_rated));
        }

        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let feedback = self
            .db_client
            .save_feedback(NewFeedback {
                request_id,
                user_id,
                worker_id,
                rating,
                comments,
            })
            .await
            .map_err(|e| ServiceError::from_constraint(e, already_rated))?;

        tracing::info!(
            "user {} rated worker {} {} for work request {}",
            user_id,
            worker_id,
            rating,
            request_id
        );

        Ok(feedback)
    }

    /// Visible to the request's participants and admins.
    pub async fn get_for_request(
        &self,
        viewer: &Account,
        request_id: i64,
    ) -> Result<Option<Feedback>, ServiceError> {
        let request = self
            .db_client
            .get_work_request(request_id)
            .await?
            .ok_or(ServiceError::WorkRequestNotFound(request_id))?;

        if viewer.role != AccountRole::Admin && !request.is_participant(viewer.id) {
            return Err(ServiceError::Forbidden(format!(
                "Account {} cannot view feedback for work request {}",
                viewer.id, request_id
            )));
        }

        Ok(self.db_client.get_request_feedback(request_id).await?)
    }

    pub async fn get_for_worker(&self, worker_id: i64) -> Result<Vec<Feedback>, ServiceError> {
        Ok(self.db_client.get_worker_feedback(worker_id).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Feedback>, ServiceError> {
        Ok(self.db_client.get_all_feedback().await?)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::service::testing::Harness;

    #[tokio::test]
    async fn feedback_only_after_completion_and_once() {
        let harness = Harness::new();
        let plumbing = harness.skill("Plumbing").await;
        let user = harness.user("asha").await;
        let worker = harness.worker("ravi", &[plumbing.id]).await;
        let request = harness.request(user.id, plumbing.id).await;
        let id = request.request_id;

        harness.work_requests.accept(worker.id, id, None).await.unwrap();

        let err = harness
            .feedback
            .submit(user.id, id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        harness
            .work_requests
            .complete(worker.id, id, BigDecimal::from(400))
            .await
            .unwrap();

        let feedback = harness
            .feedback
            .submit(user.id, id, 4, Some(" Tidy work ".to_string()))
            .await
            .unwrap();
        assert_eq!(feedback.worker_id, worker.id);
        assert_eq!(feedback.comments.as_deref(), Some("Tidy work"));

        let err = harness
            .feedback
            .submit(user.id, id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let for_worker = harness.feedback.get_for_worker(worker.id).await.unwrap();
        assert_eq!(for_worker.len(), 1);
    }

    #[tokio::test]
    async fn rating_range_and_ownership_are_checked() {
        let harness = Harness::new();
        let plumbing = harness.skill("Plumbing").await;
        let user = harness.user("asha").await;
        let stranger = harness.user("bala").await;
        let request = harness.request(user.id, plumbing.id).await;

        for rating in [0, 6] {
            let err = harness
                .feedback
                .submit(user.id, request.request_id, rating, None)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }

        let err = harness
            .feedback
            .submit(stranger.id, request.request_id, 3, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = harness
            .feedback
            .get_for_request(&stranger, request.request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        assert!(harness
            .feedback
            .get_for_request(&user, request.request_id)
            .await
            .unwrap()
            .is_none());
    }
}
