use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Feedback {
    pub id: i64,
    pub request_id: i64,
    pub user_id: i64,
    pub worker_id: i64,
    pub rating: i32,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub request_id: i64,
    pub user_id: i64,
    pub worker_id: i64,
    pub rating: i32,
    pub comments: Option<String>,
}

impl Feedback {
    pub fn involves(&self, account_id: i64) -> bool {
        self.user_id == account_id || self.worker_id == account_id
    }
}
