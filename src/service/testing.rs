//! Service wiring over the in-memory store for unit tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    db::{accountdb::AccountExt, memory::MemoryStore, skilldb::SkillExt, workrequestdb::WorkRequestExt},
    models::{
        accountmodel::{Account, AccountRole, NewAccount, NewWorkerProfile},
        skillmodel::SkillType,
        workrequestmodel::{NewWorkRequest, WorkRequest},
    },
    service::{
        account_service::AccountService, feedback_service::FeedbackService,
        notification_service::NotificationService, skill_service::SkillService,
        stats_service::StatsService, work_request_service::WorkRequestService,
    },
};

pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub accounts: AccountService<MemoryStore>,
    pub skills: SkillService<MemoryStore>,
    pub work_requests: WorkRequestService<MemoryStore>,
    pub feedback: FeedbackService<MemoryStore>,
    pub stats: StatsService<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_skill_limit(5)
    }

    pub fn with_skill_limit(max_worker_skills: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifications = Arc::new(NotificationService::new(store.clone()));

        Harness {
            accounts: AccountService::new(store.clone(), max_worker_skills),
            skills: SkillService::new(store.clone()),
            work_requests: WorkRequestService::new(store.clone(), notifications),
            feedback: FeedbackService::new(store.clone()),
            stats: StatsService::new(store.clone()),
            store,
        }
    }

    pub async fn skill(&self, name: &str) -> SkillType {
        self.store.save_skill_type(name).await.unwrap()
    }

    /// Stores a user directly, skipping password hashing.
    pub async fn user(&self, username: &str) -> Account {
        self.store
            .save_account(NewAccount {
                password: "unhashed".to_string(),
                ..new_account(username, AccountRole::User)
            })
            .await
            .unwrap()
    }

    pub async fn worker(&self, username: &str, skill_ids: &[i64]) -> Account {
        let (account, _) = self
            .store
            .save_worker(
                NewAccount {
                    password: "unhashed".to_string(),
                    ..new_account(username, AccountRole::Worker)
                },
                NewWorkerProfile {
                    city: Some("Chennai".to_string()),
                    experience_years: 3,
                    ..NewWorkerProfile::default()
                },
                skill_ids,
            )
            .await
            .unwrap();
        account
    }

    pub async fn request(&self, user_id: i64, skill_type_id: i64) -> WorkRequest {
        self.store
            .create_work_request(new_request(user_id, skill_type_id))
            .await
            .unwrap()
    }
}

pub(crate) fn new_account(username: &str, role: AccountRole) -> NewAccount {
    let mut first_name: Vec<char> = username.chars().collect();
    if let Some(first) = first_name.first_mut() {
        *first = first.to_ascii_uppercase();
    }

    NewAccount {
        username: username.to_string(),
        password: "secret-pass".to_string(),
        role,
        first_name: first_name.into_iter().collect(),
        last_name: "Kumar".to_string(),
        email: Some(format!("{}@example.com", username)),
        phone_number1: Some("9000000000".to_string()),
        phone_number2: None,
    }
}

pub(crate) fn new_request(user_id: i64, skill_type_id: i64) -> NewWorkRequest {
    NewWorkRequest {
        user_id,
        skill_type_id,
        description: "Kitchen sink is leaking under the cabinet".to_string(),
        request_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
        location: "Behind the temple".to_string(),
        city: "Chennai".to_string(),
        pincode: "600001".to_string(),
        door_no: Some("4B".to_string()),
        street_name: Some("Gandhi Street".to_string()),
        area: Some("Mylapore".to_string()),
    }
}
