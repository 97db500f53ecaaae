use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use super::skillmodel::SkillType;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
pub enum AccountRole {
    User,
    Worker,
    Admin,
}

impl AccountRole {
    pub fn to_str(&self) -> &str {
        match self {
            AccountRole::User => "User",
            AccountRole::Worker => "Worker",
            AccountRole::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "available_status", rename_all = "snake_case")]
pub enum AvailableStatus {
    #[default]
    Available,
    #[serde(rename = "At Work")]
    AtWork,
    Leave,
}

impl AvailableStatus {
    pub fn to_str(&self) -> &str {
        match self {
            AvailableStatus::Available => "Available",
            AvailableStatus::AtWork => "At Work",
            AvailableStatus::Leave => "Leave",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct WorkerProfile {
    pub worker_id: i64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
    pub experience_years: i32,
    pub available_status: AvailableStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WorkerAvailability {
    pub id: i64,
    pub worker_id: i64,
    pub morning_start: NaiveTime,
    pub morning_end: NaiveTime,
    pub afternoon_start: NaiveTime,
    pub afternoon_end: NaiveTime,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create any account. The account service hashes
/// `password` before it reaches the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
}

/// A worker account with its profile and skills.
#[derive(Debug, Clone)]
pub struct WorkerDetails {
    pub account: Account,
    pub profile: WorkerProfile,
    pub skills: Vec<SkillType>,
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkerProfile {
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
    pub experience_years: i32,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkerProfileUpdate {
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
    pub experience_years: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySlots {
    pub morning_start: NaiveTime,
    pub morning_end: NaiveTime,
    pub afternoon_start: NaiveTime,
    pub afternoon_end: NaiveTime,
}

impl Default for AvailabilitySlots {
    fn default() -> Self {
        // 09:30-12:00 and 13:00-18:00
        AvailabilitySlots {
            morning_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            morning_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
            afternoon_start: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default(),
            afternoon_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        }
    }
}

impl AvailabilitySlots {
    pub fn is_ordered(&self) -> bool {
        self.morning_start < self.morning_end
            && self.morning_end <= self.afternoon_start
            && self.afternoon_start < self.afternoon_end
    }
}
