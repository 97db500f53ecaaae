//! In-memory store backing the service tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Error;
use tokio::sync::Mutex;

use super::{
    accountdb::AccountExt, feedbackdb::FeedbackExt, notificationdb::NotificationExt,
    skilldb::SkillExt, workrequestdb::WorkRequestExt,
};
use crate::models::{
    accountmodel::*, feedbackmodel::*, notificationmodel::*, skillmodel::SkillType,
    workrequestmodel::*,
};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    accounts: Vec<Account>,
    profiles: Vec<WorkerProfile>,
    skills: Vec<SkillType>,
    worker_skills: Vec<(i64, i64)>,
    availability: Vec<WorkerAvailability>,
    requests: Vec<WorkRequest>,
    notifications: Vec<Notification>,
    feedback: Vec<Feedback>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_account(&mut self, new_account: NewAccount) -> Account {
        let now = Utc::now();
        let account = Account {
            id: self.next_id(),
            username: new_account.username,
            password: new_account.password,
            role: new_account.role,
            first_name: new_account.first_name,
            last_name: new_account.last_name,
            email: new_account.email,
            phone_number1: new_account.phone_number1,
            phone_number2: new_account.phone_number2,
            created_at: now,
            updated_at: now,
        };
        self.accounts.push(account.clone());
        account
    }

    fn details(&self, request: &WorkRequest) -> WorkRequestDetails {
        let skill_name = self
            .skills
            .iter()
            .find(|skill| skill.id == request.skill_type_id)
            .map(|skill| skill.name.clone())
            .unwrap_or_default();
        let user = self.accounts.iter().find(|a| a.id == request.user_id);
        let worker = request
            .worker_id
            .and_then(|id| self.accounts.iter().find(|a| a.id == id));

        WorkRequestDetails {
            request: request.clone(),
            skill_name,
            user_first_name: user.map(|a| a.first_name.clone()),
            user_last_name: user.map(|a| a.last_name.clone()),
            worker_first_name: worker.map(|a| a.first_name.clone()),
            worker_last_name: worker.map(|a| a.last_name.clone()),
        }
    }

    fn details_where(&self, keep: impl Fn(&WorkRequest) -> bool) -> Vec<WorkRequestDetails> {
        let mut requests: Vec<&WorkRequest> = self.requests.iter().filter(|r| keep(r)).collect();
        requests.sort_by(|a, b| {
            b.request_date
                .cmp(&a.request_date)
                .then(a.request_id.cmp(&b.request_id))
        });
        requests.into_iter().map(|r| self.details(r)).collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountExt for MemoryStore {
    async fn get_account(
        &self,
        account_id: Option<i64>,
        username: Option<&str>,
    ) -> Result<Option<Account>, Error> {
        let state = self.state.lock().await;
        let account = if let Some(account_id) = account_id {
            state.accounts.iter().find(|a| a.id == account_id)
        } else if let Some(username) = username {
            state.accounts.iter().find(|a| a.username == username)
        } else {
            None
        };
        Ok(account.cloned())
    }

    async fn get_accounts_by_role(&self, role: AccountRole) -> Result<Vec<Account>, Error> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .iter()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(accounts)
    }

    async fn save_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        let mut state = self.state.lock().await;
        Ok(state.insert_account(new_account))
    }

    async fn save_worker(
        &self,
        new_account: NewAccount,
        profile: NewWorkerProfile,
        skill_ids: &[i64],
    ) -> Result<(Account, WorkerProfile), Error> {
        let mut state = self.state.lock().await;
        let account = state.insert_account(NewAccount {
            role: AccountRole::Worker,
            ..new_account
        });

        let worker_profile = WorkerProfile {
            worker_id: account.id,
            address: profile.address,
            city: profile.city,
            pincode: profile.pincode,
            door_no: profile.door_no,
            street_name: profile.street_name,
            area: profile.area,
            experience_years: profile.experience_years,
            available_status: AvailableStatus::Available,
            updated_at: Utc::now(),
        };
        state.profiles.push(worker_profile.clone());
        for skill_id in skill_ids {
            state.worker_skills.push((account.id, *skill_id));
        }

        Ok((account, worker_profile))
    }

    async fn update_account(
        &self,
        account_id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, Error> {
        let mut state = self.state.lock().await;
        let Some(account) = state.accounts.iter_mut().find(|a| a.id == account_id) else {
            return Ok(None);
        };

        if let Some(first_name) = update.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            account.last_name = last_name;
        }
        if update.email.is_some() {
            account.email = update.email;
        }
        if update.phone_number1.is_some() {
            account.phone_number1 = update.phone_number1;
        }
        if update.phone_number2.is_some() {
            account.phone_number2 = update.phone_number2;
        }
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }

    async fn get_worker_profile(&self, worker_id: i64) -> Result<Option<WorkerProfile>, Error> {
        let state = self.state.lock().await;
        Ok(state.profiles.iter().find(|p| p.worker_id == worker_id).cloned())
    }

    async fn update_worker_profile(
        &self,
        worker_id: i64,
        update: WorkerProfileUpdate,
        skill_ids: Option<&[i64]>,
    ) -> Result<Option<WorkerProfile>, Error> {
        let mut state = self.state.lock().await;
        let Some(profile) = state.profiles.iter_mut().find(|p| p.worker_id == worker_id) else {
            return Ok(None);
        };

        if update.address.is_some() {
            profile.address = update.address;
        }
        if update.city.is_some() {
            profile.city = update.city;
        }
        if update.pincode.is_some() {
            profile.pincode = update.pincode;
        }
        if update.door_no.is_some() {
            profile.door_no = update.door_no;
        }
        if update.street_name.is_some() {
            profile.street_name = update.street_name;
        }
        if update.area.is_some() {
            profile.area = update.area;
        }
        if let Some(experience_years) = update.experience_years {
            profile.experience_years = experience_years;
        }
        profile.updated_at = Utc::now();
        let profile = profile.clone();

        if let Some(skill_ids) = skill_ids {
            state.worker_skills.retain(|(worker, _)| *worker != worker_id);
            for skill_id in skill_ids {
                state.worker_skills.push((worker_id, *skill_id));
            }
        }

        Ok(Some(profile))
    }

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: AvailableStatus,
    ) -> Result<Option<WorkerProfile>, Error> {
        let mut state = self.state.lock().await;
        let profile = state.profiles.iter_mut().find(|p| p.worker_id == worker_id);
        Ok(profile.map(|profile| {
            profile.available_status = status;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn get_worker_skills(&self, worker_id: i64) -> Result<Vec<SkillType>, Error> {
        let state = self.state.lock().await;
        let mut skills: Vec<SkillType> = state
            .worker_skills
            .iter()
            .filter(|(worker, _)| *worker == worker_id)
            .filter_map(|(_, skill_id)| state.skills.iter().find(|s| s.id == *skill_id))
            .cloned()
            .collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn save_worker_availability(
        &self,
        worker_id: i64,
        slots: AvailabilitySlots,
    ) -> Result<WorkerAvailability, Error> {
        let mut state = self.state.lock().await;
        let availability = WorkerAvailability {
            id: state.next_id(),
            worker_id,
            morning_start: slots.morning_start,
            morning_end: slots.morning_end,
            afternoon_start: slots.afternoon_start,
            afternoon_end: slots.afternoon_end,
            created_at: Utc::now(),
        };
        state.availability.push(availability.clone());
        Ok(availability)
    }

    async fn get_worker_availability(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerAvailability>, Error> {
        let state = self.state.lock().await;
        let mut rows: Vec<WorkerAvailability> = state
            .availability
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn delete_account(&self, account_id: i64) -> Result<bool, Error> {
        let mut state = self.state.lock().await;
        if !state.accounts.iter().any(|a| a.id == account_id) {
            return Ok(false);
        }

        let removed: Vec<i64> = state
            .requests
            .iter()
            .filter(|r| r.is_participant(account_id))
            .map(|r| r.request_id)
            .collect();

        state.requests.retain(|r| !removed.contains(&r.request_id));
        state
            .feedback
            .retain(|f| !removed.contains(&f.request_id) && !f.involves(account_id));
        state.notifications.retain(|n| n.recipient_id != account_id);
        for notification in state.notifications.iter_mut() {
            if notification
                .related_request_id
                .map_or(false, |id| removed.contains(&id))
            {
                notification.related_request_id = None;
            }
        }
        state.worker_skills.retain(|(worker, _)| *worker != account_id);
        state.availability.retain(|a| a.worker_id != account_id);
        state.profiles.retain(|p| p.worker_id != account_id);
        state.accounts.retain(|a| a.id != account_id);

        Ok(true)
    }
}

#[async_trait]
impl SkillExt for MemoryStore {
    async fn get_skill_types(&self) -> Result<Vec<SkillType>, Error> {
        let state = self.state.lock().await;
        let mut skills = state.skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn get_skill_type(&self, skill_type_id: i64) -> Result<Option<SkillType>, Error> {
        let state = self.state.lock().await;
        Ok(state.skills.iter().find(|s| s.id == skill_type_id).cloned())
    }

    async fn get_skill_type_by_name(&self, name: &str) -> Result<Option<SkillType>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn save_skill_type(&self, name: &str) -> Result<SkillType, Error> {
        let mut state = self.state.lock().await;
        let skill = SkillType {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn rename_skill_type(
        &self,
        skill_type_id: i64,
        name: &str,
    ) -> Result<Option<SkillType>, Error> {
        let mut state = self.state.lock().await;
        let skill = state.skills.iter_mut().find(|s| s.id == skill_type_id);
        Ok(skill.map(|skill| {
            skill.name = name.to_string();
            skill.clone()
        }))
    }

    async fn delete_skill_type(&self, skill_type_id: i64) -> Result<bool, Error> {
        let mut state = self.state.lock().await;
        let before = state.skills.len();
        state.skills.retain(|s| s.id != skill_type_id);
        Ok(state.skills.len() < before)
    }

    async fn count_skill_references(&self, skill_type_id: i64) -> Result<i64, Error> {
        let state = self.state.lock().await;
        let links = state
            .worker_skills
            .iter()
            .filter(|(_, skill)| *skill == skill_type_id)
            .count();
        let requests = state
            .requests
            .iter()
            .filter(|r| r.skill_type_id == skill_type_id)
            .count();
        Ok((links + requests) as i64)
    }
}

#[async_trait]
impl WorkRequestExt for MemoryStore {
    async fn create_work_request(&self, new_request: NewWorkRequest) -> Result<WorkRequest, Error> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let request = WorkRequest {
            request_id: state.next_id(),
            user_id: new_request.user_id,
            worker_id: None,
            skill_type_id: new_request.skill_type_id,
            description: new_request.description,
            request_date: new_request.request_date,
            location: new_request.location,
            city: new_request.city,
            pincode: new_request.pincode,
            door_no: new_request.door_no,
            street_name: new_request.street_name,
            area: new_request.area,
            status: RequestStatus::Pending,
            time_slot: None,
            worker_arrival_time: None,
            user_confirmation_status: None,
            amount: None,
            completed_date: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn get_work_request(&self, request_id: i64) -> Result<Option<WorkRequest>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .requests
            .iter()
            .find(|r| r.request_id == request_id)
            .cloned())
    }

    async fn save_work_request(&self, request: &WorkRequest) -> Result<Option<WorkRequest>, Error> {
        let mut state = self.state.lock().await;
        let Some(stored) = state
            .requests
            .iter_mut()
            .find(|r| r.request_id == request.request_id && r.version == request.version)
        else {
            return Ok(None);
        };

        *stored = WorkRequest {
            version: request.version + 1,
            updated_at: Utc::now(),
            ..request.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn get_user_work_requests(&self, user_id: i64) -> Result<Vec<WorkRequestDetails>, Error> {
        let state = self.state.lock().await;
        Ok(state.details_where(|r| r.user_id == user_id))
    }

    async fn get_worker_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error> {
        let state = self.state.lock().await;
        Ok(state.details_where(|r| r.worker_id == Some(worker_id)))
    }

    async fn get_available_work_requests(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkRequestDetails>, Error> {
        let state = self.state.lock().await;
        let skills: Vec<i64> = state
            .worker_skills
            .iter()
            .filter(|(worker, _)| *worker == worker_id)
            .map(|(_, skill)| *skill)
            .collect();

        Ok(state.details_where(|r| {
            r.status == RequestStatus::Pending
                && r.worker_id.is_none()
                && skills.contains(&r.skill_type_id)
        }))
    }

    async fn get_all_work_requests(&self) -> Result<Vec<WorkRequestDetails>, Error> {
        let state = self.state.lock().await;
        Ok(state.details_where(|_| true))
    }

    async fn count_active_work_requests(&self, account_id: i64) -> Result<i64, Error> {
        let state = self.state.lock().await;
        Ok(state
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Accepted && r.is_participant(account_id))
            .count() as i64)
    }
}

#[async_trait]
impl NotificationExt for MemoryStore {
    async fn save_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, Error> {
        let mut state = self.state.lock().await;
        let notification = Notification {
            id: state.next_id(),
            recipient_id: new_notification.recipient_id,
            recipient_role: new_notification.recipient_role,
            message: new_notification.message,
            related_request_id: new_notification.related_request_id,
            skill_name: new_notification.skill_name,
            status: NotificationStatus::Unread,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn get_notification(&self, notification_id: i64) -> Result<Option<Notification>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn get_account_notifications(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<Notification>, Error> {
        let state = self.state.lock().await;
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(notifications)
    }

    async fn get_all_notifications(&self) -> Result<Vec<Notification>, Error> {
        let state = self.state.lock().await;
        let mut notifications = state.notifications.clone();
        notifications.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(notifications)
    }

    async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, Error> {
        let mut state = self.state.lock().await;
        let notification = state.notifications.iter_mut().find(|n| n.id == notification_id);
        Ok(notification.map(|notification| {
            notification.status = NotificationStatus::Read;
            notification.clone()
        }))
    }
}

#[async_trait]
impl FeedbackExt for MemoryStore {
    async fn save_feedback(&self, new_feedback: NewFeedback) -> Result<Feedback, Error> {
        let mut state = self.state.lock().await;
        let feedback = Feedback {
            id: state.next_id(),
            request_id: new_feedback.request_id,
            user_id: new_feedback.user_id,
            worker_id: new_feedback.worker_id,
            rating: new_feedback.rating,
            comments: new_feedback.comments,
            created_at: Utc::now(),
        };
        state.feedback.push(feedback.clone());
        Ok(feedback)
    }

    async fn get_request_feedback(&self, request_id: i64) -> Result<Option<Feedback>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .feedback
            .iter()
            .find(|f| f.request_id == request_id)
            .cloned())
    }

    async fn get_worker_feedback(&self, worker_id: i64) -> Result<Vec<Feedback>, Error> {
        let state = self.state.lock().await;
        let mut feedback: Vec<Feedback> = state
            .feedback
            .iter()
            .filter(|f| f.worker_id == worker_id)
            .cloned()
            .collect();
        feedback.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(feedback)
    }

    async fn get_all_feedback(&self) -> Result<Vec<Feedback>, Error> {
        let state = self.state.lock().await;
        let mut feedback = state.feedback.clone();
        feedback.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;

    fn new_request(user_id: i64, skill_type_id: i64) -> NewWorkRequest {
        NewWorkRequest {
            user_id,
            skill_type_id,
            description: "Paint the hallway".to_string(),
            request_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            location: "Opposite the bakery".to_string(),
            city: "Madurai".to_string(),
            pincode: "625001".to_string(),
            door_no: None,
            street_name: None,
            area: None,
        }
    }

    #[tokio::test]
    async fn stale_version_is_not_saved() {
        let store = MemoryStore::new();
        let created = store.create_work_request(new_request(1, 2)).await.unwrap();

        let mut first = created.clone();
        first.accept(5, &[2], None).unwrap();
        let saved = store.save_work_request(&first).await.unwrap().unwrap();
        assert_eq!(saved.version, 1);

        // A second writer still holding version 0
        let mut stale = created;
        stale.accept(6, &[2], None).unwrap();
        assert!(store.save_work_request(&stale).await.unwrap().is_none());

        let stored = store.get_work_request(saved.request_id).await.unwrap().unwrap();
        assert_eq!(stored.worker_id, Some(5));
    }

    #[tokio::test]
    async fn completed_amount_survives_round_trip() {
        let store = MemoryStore::new();
        let mut request = store.create_work_request(new_request(1, 2)).await.unwrap();
        request.accept(5, &[2], None).unwrap();
        let mut request = store.save_work_request(&request).await.unwrap().unwrap();
        request
            .complete(5, BigDecimal::from(250), NaiveDate::from_ymd_opt(2026, 10, 21).unwrap())
            .unwrap();
        let stored = store.save_work_request(&request).await.unwrap().unwrap();
        assert_eq!(stored.amount, Some(BigDecimal::from(250)));
        assert_eq!(stored.version, 2);
    }
}
