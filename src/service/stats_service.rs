use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use serde::Serialize;

use crate::{
    db::{
        accountdb::AccountExt, feedbackdb::FeedbackExt, notificationdb::NotificationExt,
        skilldb::SkillExt, workrequestdb::WorkRequestExt, Store,
    },
    models::{accountmodel::AccountRole, workrequestmodel::RequestStatus},
    service::error::ServiceError,
};

#[derive(Debug, Serialize, Default, Clone, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn from_statuses(statuses: impl IntoIterator<Item = RequestStatus>) -> Self {
        let mut counts = StatusCounts::default();
        for status in statuses {
            match status {
                RequestStatus::Pending => counts.pending += 1,
                RequestStatus::Accepted => counts.accepted += 1,
                RequestStatus::Completed => counts.completed += 1,
                RequestStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RatingBucket {
    pub rating: i32,
    pub count: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_workers: usize,
    pub total_skill_types: usize,
    pub total_work_requests: usize,
    pub total_feedback: usize,
    pub total_notifications: usize,
    pub requests_by_status: StatusCounts,
    pub rating_distribution: Vec<RatingBucket>,
    pub average_rating: Option<f64>,
    pub completed_earnings: BigDecimal,
}

/// One bucket per star from 1 to 5; ratings outside that range are ignored.
pub fn rating_distribution(ratings: &[i32]) -> Vec<RatingBucket> {
    (1..=5)
        .map(|rating| RatingBucket {
            rating,
            count: ratings.iter().filter(|r| **r == rating).count(),
        })
        .collect()
}

pub fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let average = total.to_f64()? / ratings.len().to_f64()?;
    Some((average * 100.0).round() / 100.0)
}

#[derive(Debug)]
pub struct StatsService<D> {
    db_client: Arc<D>,
}

impl<D: Store> StatsService<D> {
    pub fn new(db_client: Arc<D>) -> Self {
        Self { db_client }
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats, ServiceError> {
        let users = self.db_client.get_accounts_by_role(AccountRole::User).await?;
        let workers = self.db_client.get_accounts_by_role(AccountRole::Worker).await?;
        let skills = self.db_client.get_skill_types().await?;
        let requests = self.db_client.get_all_work_requests().await?;
        let feedback = self.db_client.get_all_feedback().await?;
        let notifications = self.db_client.get_all_notifications().await?;

        let requests_by_status =
            StatusCounts::from_statuses(requests.iter().map(|d| d.request.status));

        let completed_earnings = requests
            .iter()
            .filter(|d| d.request.status == RequestStatus::Completed)
            .filter_map(|d| d.request.amount.clone())
            .fold(BigDecimal::from(0), |total, amount| total + amount);

        let ratings: Vec<i32> = feedback.iter().map(|f| f.rating).collect();

        Ok(PlatformStats {
            total_users: users.len(),
            total_workers: workers.len(),
            total_skill_types: skills.len(),
            total_work_requests: requests.len(),
            total_feedback: feedback.len(),
            total_notifications: notifications.len(),
            requests_by_status,
            rating_distribution: rating_distribution(&ratings),
            average_rating: average_rating(&ratings),
            completed_earnings,
        })
    }
}
