use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use super::accountmodel::AccountRole;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_status", rename_all = "snake_case")]
pub enum NotificationStatus {
    Unread,
    Read,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub recipient_role: AccountRole,
    pub message: String,
    pub related_request_id: Option<i64>,
    pub skill_name: Option<String>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub recipient_role: AccountRole,
    pub message: String,
    pub related_request_id: Option<i64>,
    pub skill_name: Option<String>,
}
