use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::{
    db::{notificationdb::NotificationExt, skilldb::SkillExt, Store},
    models::{
        accountmodel::{Account, AccountRole},
        notificationmodel::*,
        workrequestmodel::{ArrivalDecision, Counterpart, WorkRequest},
    },
    service::error::ServiceError,
};

const DESCRIPTION_PREVIEW: usize = 50;

#[derive(Debug)]
pub struct NotificationService<D> {
    db_client: Arc<D>,
}

impl<D: Store> NotificationService<D> {
    pub fn new(db_client: Arc<D>) -> Self {
        Self { db_client }
    }

    pub async fn notify_request_accepted(
        &self,
        request: &WorkRequest,
        worker: &Account,
    ) -> Result<Notification, ServiceError> {
        let time_slot = request.time_slot.as_deref().unwrap_or("Not specified");
        let arrival_time = request
            .worker_arrival_time
            .as_deref()
            .unwrap_or("To be confirmed");
        let message = format!(
            "Your work request for '{}...' has been accepted by {}. Time Slot: {}. Arrival Time: {}. Please confirm arrival time.",
            preview(&request.description),
            worker.full_name(),
            time_slot,
            arrival_time
        );

        self.store(request.user_id, AccountRole::User, request, message)
            .await
    }

    pub async fn notify_request_declined(
        &self,
        request: &WorkRequest,
        worker: &Account,
    ) -> Result<Notification, ServiceError> {
        let message = format!(
            "Your work request for '{}...' has been declined by {}. The request is now available for other workers.",
            preview(&request.description),
            worker.full_name()
        );

        self.store(request.user_id, AccountRole::User, request, message)
            .await
    }

    pub async fn notify_arrival_time_set(
        &self,
        request: &WorkRequest,
        arrival_time: &str,
    ) -> Result<Notification, ServiceError> {
        let message = format!(
            "Worker has set arrival time to {} for your work request. Please confirm.",
            arrival_time
        );

        self.store(request.user_id, AccountRole::User, request, message)
            .await
    }

    pub async fn notify_arrival_answered(
        &self,
        request: &WorkRequest,
        worker_id: i64,
        user: &Account,
        decision: ArrivalDecision,
    ) -> Result<Notification, ServiceError> {
        let message = format!(
            "{} has {} your arrival time for work request #{}.",
            user.full_name(),
            decision.to_str(),
            request.request_id
        );

        self.store(worker_id, AccountRole::Worker, request, message)
            .await
    }

    pub async fn notify_request_completed(
        &self,
        request: &WorkRequest,
        amount: &BigDecimal,
    ) -> Result<Notification, ServiceError> {
        let message = format!(
            "Your work request for '{}...' has been completed. Amount: {}.",
            preview(&request.description),
            amount
        );

        self.store(request.user_id, AccountRole::User, request, message)
            .await
    }

    pub async fn notify_request_cancelled(
        &self,
        request: &WorkRequest,
        counterpart: Counterpart,
        cancelled_by: &Account,
    ) -> Result<Notification, ServiceError> {
        let message = format!(
            "Work request #{} has been cancelled by {}.",
            request.request_id,
            cancelled_by.full_name()
        );

        self.store(counterpart.account_id, counterpart.role, request, message)
            .await
    }

    async fn store(
        &self,
        recipient_id: i64,
        recipient_role: AccountRole,
        request: &WorkRequest,
        message: String,
    ) -> Result<Notification, ServiceError> {
        let skill_name = self
            .db_client
            .get_skill_type(request.skill_type_id)
            .await?
            .map(|skill| skill.name);

        let notification = self
            .db_client
            .save_notification(NewNotification {
                recipient_id,
                recipient_role,
                message,
                related_request_id: Some(request.request_id),
                skill_name,
            })
            .await?;

        tracing::debug!(
            "notification {} queued for {} {} (request {})",
            notification.id,
            recipient_role,
            recipient_id,
            request.request_id
        );

        Ok(notification)
    }

    pub async fn get_account_notifications(
        &self,
        account_id: i64,
    ) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.db_client.get_account_notifications(account_id).await?)
    }

    pub async fn get_all_notifications(&self) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.db_client.get_all_notifications().await?)
    }

    /// Only the recipient may mark a notification as read.
    pub async fn mark_as_read(
        &self,
        notification_id: i64,
        account_id: i64,
    ) -> Result<Notification, ServiceError> {
        let notification = self
            .db_client
            .get_notification(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))?;

        if notification.recipient_id != account_id {
            return Err(ServiceError::Forbidden(format!(
                "Notification {} does not belong to account {}",
                notification_id, account_id
            )));
        }

        if notification.status == NotificationStatus::Read {
            return Ok(notification);
        }

        self.db_client
            .mark_notification_read(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))
    }
}

fn preview(description: &str) -> String {
    description.chars().take(DESCRIPTION_PREVIEW).collect()
}
