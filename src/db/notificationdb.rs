use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::notificationmodel::*;

#[async_trait]
pub trait NotificationExt {
    async fn save_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, Error>;

    async fn get_notification(&self, notification_id: i64) -> Result<Option<Notification>, Error>;

    async fn get_account_notifications(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn get_all_notifications(&self) -> Result<Vec<Notification>, Error>;

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn save_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
            (recipient_id, recipient_role, message, related_request_id, skill_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_notification.recipient_id)
        .bind(new_notification.recipient_role)
        .bind(new_notification.message)
        .bind(new_notification.related_request_id)
        .bind(new_notification.skill_name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notification(&self, notification_id: i64) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(r#"SELECT * FROM notifications WHERE id = $1"#)
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_account_notifications(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_notifications(&self) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"SELECT * FROM notifications ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications SET status = 'read' WHERE id = $1 RETURNING *"#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
    }
}
