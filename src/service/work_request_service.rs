use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::{
    db::{accountdb::AccountExt, skilldb::SkillExt, workrequestdb::WorkRequestExt, Store},
    models::{
        accountmodel::AccountRole,
        notificationmodel::Notification,
        workrequestmodel::*,
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

#[derive(Debug)]
pub struct WorkRequestService<D> {
    db_client: Arc<D>,
    notification_service: Arc<NotificationService<D>>,
}

impl<D: Store> WorkRequestService<D> {
    pub fn new(db_client: Arc<D>, notification_service: Arc<NotificationService<D>>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn create(&self, new_request: NewWorkRequest) -> Result<WorkRequest, ServiceError> {
        let new_request = NewWorkRequest {
            description: required_field(new_request.description, "description", MAX_DESCRIPTION_LEN)?,
            location: required_field(new_request.location, "location", MAX_LOCATION_LEN)?,
            city: required_field(new_request.city, "city", MAX_CITY_LEN)?,
            pincode: required_field(new_request.pincode, "pincode", MAX_PINCODE_LEN)?,
            door_no: bounded_field(new_request.door_no, "door_no", MAX_DOOR_NO_LEN)?,
            street_name: bounded_field(new_request.street_name, "street_name", MAX_STREET_LEN)?,
            area: bounded_field(new_request.area, "area", MAX_STREET_LEN)?,
            ..new_request
        };

        let user = self
            .db_client
            .get_account(Some(new_request.user_id), None)
            .await?
            .ok_or(ServiceError::AccountNotFound(new_request.user_id))?;

        if user.role != AccountRole::User {
            return Err(ServiceError::Forbidden(
                "Only user accounts can create work requests".to_string(),
            ));
        }

        if self
            .db_client
            .get_skill_type(new_request.skill_type_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::Validation(format!(
                "Skill type {} does not exist",
                new_request.skill_type_id
            )));
        }

        let request = self.db_client.create_work_request(new_request).await?;

        tracing::info!(
            "user {} created work request {} for skill {}",
            request.user_id,
            request.request_id,
            request.skill_type_id
        );

        Ok(request)
    }

    pub async fn get(&self, request_id: i64) -> Result<WorkRequest, ServiceError> {
        self.db_client
            .get_work_request(request_id)
            .await?
            .ok_or(ServiceError::WorkRequestNotFound(request_id))
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<WorkRequestDetails>, ServiceError> {
        Ok(self.db_client.get_user_work_requests(user_id).await?)
    }

    pub async fn list_by_worker(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, ServiceError> {
        Ok(self.db_client.get_worker_work_requests(worker_id).await?)
    }

    pub async fn list_available(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, ServiceError> {
        Ok(self.db_client.get_available_work_requests(worker_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<WorkRequestDetails>, ServiceError> {
        Ok(self.db_client.get_all_work_requests().await?)
    }

    pub async fn accept(
        &self,
        worker_id: i64,
        request_id: i64,
        time_slot: Option<String>,
    ) -> Result<WorkRequest, ServiceError> {
        self.accept_with_arrival(worker_id, request_id, time_slot, None)
            .await
    }

    /// Accepts and, when an arrival time comes along, proposes it in the same save.
    pub async fn accept_with_arrival(
        &self,
        worker_id: i64,
        request_id: i64,
        time_slot: Option<String>,
        arrival_time: Option<String>,
    ) -> Result<WorkRequest, ServiceError> {
        let time_slot = bounded_field(trimmed(time_slot), "time_slot", MAX_TIME_SLOT_LEN)?;
        let arrival_time =
            bounded_field(trimmed(arrival_time), "arrival_time", MAX_ARRIVAL_TIME_LEN)?;

        let mut request = self.get(request_id).await?;

        let skills: Vec<i64> = self
            .db_client
            .get_worker_skills(worker_id)
            .await?
            .into_iter()
            .map(|skill| skill.id)
            .collect();

        request.accept(worker_id, &skills, time_slot)?;
        if let Some(arrival_time) = arrival_time {
            request.set_arrival_time(worker_id, arrival_time)?;
        }
        let request = self.persist(request).await?;

        tracing::info!(
            "worker {} accepted work request {} (arrival {:?})",
            worker_id,
            request_id,
            request.worker_arrival_time
        );

        if let Some(worker) = self.db_client.get_account(Some(worker_id), None).await? {
            log_failure(
                self.notification_service
                    .notify_request_accepted(&request, &worker)
                    .await,
                request_id,
            );
        }

        Ok(request)
    }

    pub async fn decline(
        &self,
        worker_id: i64,
        request_id: i64,
    ) -> Result<WorkRequest, ServiceError> {
        let mut request = self.get(request_id).await?;

        request.decline(worker_id)?;
        let request = self.persist(request).await?;

        tracing::info!("worker {} declined work request {}", worker_id, request_id);

        if let Some(worker) = self.db_client.get_account(Some(worker_id), None).await? {
            log_failure(
                self.notification_service
                    .notify_request_declined(&request, &worker)
                    .await,
                request_id,
            );
        }

        Ok(request)
    }

    pub async fn set_arrival_time(
        &self,
        worker_id: i64,
        request_id: i64,
        arrival_time: &str,
    ) -> Result<WorkRequest, ServiceError> {
        let arrival_time = arrival_time.trim();
        if arrival_time.is_empty() {
            return Err(ServiceError::Validation(
                "Arrival time is required".to_string(),
            ));
        }
        check_length(arrival_time, "arrival_time", MAX_ARRIVAL_TIME_LEN)?;

        let mut request = self.get(request_id).await?;

        request.set_arrival_time(worker_id, arrival_time.to_string())?;
        let request = self.persist(request).await?;

        tracing::info!(
            "worker {} proposed arrival {} for work request {}",
            worker_id,
            arrival_time,
            request_id
        );

        log_failure(
            self.notification_service
                .notify_arrival_time_set(&request, arrival_time)
                .await,
            request_id,
        );

        Ok(request)
    }

    /// Repeating the recorded answer returns the request untouched.
    pub async fn confirm_arrival(
        &self,
        user_id: i64,
        request_id: i64,
        decision: ArrivalDecision,
    ) -> Result<WorkRequest, ServiceError> {
        let mut request = self.get(request_id).await?;

        if !request.confirm_arrival(user_id, decision)? {
            tracing::debug!(
                "work request {} already {}, nothing to do",
                request_id,
                decision.to_str()
            );
            return Ok(request);
        }

        let request = self.persist(request).await?;

        tracing::info!(
            "user {} {} arrival for work request {}",
            user_id,
            decision.to_str(),
            request_id
        );

        let user = self.db_client.get_account(Some(user_id), None).await?;
        if let (Some(user), Some(worker_id)) = (user, request.worker_id) {
            log_failure(
                self.notification_service
                    .notify_arrival_answered(&request, worker_id, &user, decision)
                    .await,
                request_id,
            );
        }

        Ok(request)
    }

    pub async fn complete(
        &self,
        worker_id: i64,
        request_id: i64,
        amount: BigDecimal,
    ) -> Result<WorkRequest, ServiceError> {
        let amount = amount.round(2);
        if amount <= BigDecimal::from(0) {
            return Err(ServiceError::Validation(
                "Amount must be a positive number".to_string(),
            ));
        }
        if amount >= BigDecimal::from(MAX_AMOUNT_EXCLUSIVE) {
            return Err(ServiceError::Validation(
                "Amount must be less than 10000000000".to_string(),
            ));
        }

        let mut request = self.get(request_id).await?;

        request.complete(worker_id, amount.clone(), Utc::now().date_naive())?;
        let request = self.persist(request).await?;

        tracing::info!(
            "worker {} completed work request {} for {}",
            worker_id,
            request_id,
            amount
        );

        log_failure(
            self.notification_service
                .notify_request_completed(&request, &amount)
                .await,
            request_id,
        );

        Ok(request)
    }

    pub async fn cancel(&self, actor_id: i64, request_id: i64) -> Result<WorkRequest, ServiceError> {
        let actor = self
            .db_client
            .get_account(Some(actor_id), None)
            .await?
            .ok_or(ServiceError::AccountNotFound(actor_id))?;

        let mut request = self.get(request_id).await?;

        let counterpart = request.cancel(actor_id, actor.role)?;
        let request = self.persist(request).await?;

        tracing::info!(
            "{} {} cancelled work request {}",
            actor.role,
            actor_id,
            request_id
        );

        if let Some(counterpart) = counterpart {
            log_failure(
                self.notification_service
                    .notify_request_cancelled(&request, counterpart, &actor)
                    .await,
                request_id,
            );
        }

        Ok(request)
    }

    /// Writes a transitioned request, failing when another transition won.
    async fn persist(&self, request: WorkRequest) -> Result<WorkRequest, ServiceError> {
        debug_assert!(request.is_consistent(), "inconsistent work request {:?}", request);

        let request_id = request.request_id;
        match self.db_client.save_work_request(&request).await? {
            Some(saved) => Ok(saved),
            None => {
                tracing::warn!(
                    "work request {} changed concurrently at version {}",
                    request_id,
                    request.version
                );
                Err(ServiceError::StaleWorkRequest(request_id))
            }
        }
    }
}

const MAX_DESCRIPTION_LEN: usize = 2000;

// amount is NUMERIC(12,2)
const MAX_AMOUNT_EXCLUSIVE: i64 = 10_000_000_000;

fn required_field(value: String, field: &str, max: usize) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    check_length(trimmed, field, max)?;
    Ok(trimmed.to_string())
}

fn bounded_field(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, ServiceError> {
    if let Some(value) = &value {
        check_length(value, field, max)?;
    }
    Ok(value)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn check_length(value: &str, field: &str, max: usize) -> Result<(), ServiceError> {
    if value.chars().count() > max {
        return Err(ServiceError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

// Transitions are already committed when notifications go out.
fn log_failure(result: Result<Notification, ServiceError>, request_id: i64) {
    if let Err(e) = result {
        tracing::error!(
            "failed to record notification for work request {}: {}",
            request_id,
            e
        );
    }
}
