use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    accountmodel::{
        Account, AccountRole, AccountUpdate, AvailabilitySlots, AvailableStatus, NewAccount,
        NewWorkerProfile, WorkerDetails, WorkerProfileUpdate,
    },
    skillmodel::SkillType,
};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: AccountRole,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "Email is invalid"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number1: Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number2: Option<String>,
}

impl RegisterUserDto {
    pub fn into_new_account(self, role: AccountRole) -> NewAccount {
        NewAccount {
            username: self.username.trim().to_string(),
            password: self.password,
            role,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email,
            phone_number1: self.phone_number1,
            phone_number2: self.phone_number2,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerDto {
    #[serde(flatten)]
    #[validate]
    pub account: RegisterUserDto,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 10, message = "Pincode must be at most 10 characters"))]
    pub pincode: Option<String>,
    #[validate(length(max = 20, message = "Door number must be at most 20 characters"))]
    pub door_no: Option<String>,
    #[validate(length(max = 100, message = "Street name must be at most 100 characters"))]
    pub street_name: Option<String>,
    #[validate(length(max = 100, message = "Area must be at most 100 characters"))]
    pub area: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: i32,
    #[serde(default)]
    pub skill_ids: Vec<i64>,
}

impl RegisterWorkerDto {
    pub fn into_parts(self) -> (NewAccount, NewWorkerProfile, Vec<i64>) {
        let profile = NewWorkerProfile {
            address: self.address,
            city: self.city,
            pincode: self.pincode,
            door_no: self.door_no,
            street_name: self.street_name,
            area: self.area,
            experience_years: self.experience_years,
        };

        (
            self.account.into_new_account(AccountRole::Worker),
            profile,
            self.skill_ids,
        )
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateAccountDto {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: Option<String>,
    #[validate(
        email(message = "Email is invalid"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number1: Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number2: Option<String>,
}

impl From<UpdateAccountDto> for AccountUpdate {
    fn from(dto: UpdateAccountDto) -> Self {
        AccountUpdate {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone_number1: dto.phone_number1,
            phone_number2: dto.phone_number2,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateWorkerDto {
    #[serde(flatten)]
    #[validate]
    pub account: UpdateAccountDto,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 10, message = "Pincode must be at most 10 characters"))]
    pub pincode: Option<String>,
    #[validate(length(max = 20, message = "Door number must be at most 20 characters"))]
    pub door_no: Option<String>,
    #[validate(length(max = 100, message = "Street name must be at most 100 characters"))]
    pub street_name: Option<String>,
    #[validate(length(max = 100, message = "Area must be at most 100 characters"))]
    pub area: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: Option<i32>,
    pub skill_ids: Option<Vec<i64>>,
}

impl UpdateWorkerDto {
    pub fn into_parts(self) -> (AccountUpdate, WorkerProfileUpdate, Option<Vec<i64>>) {
        let profile = WorkerProfileUpdate {
            address: self.address,
            city: self.city,
            pincode: self.pincode,
            door_no: self.door_no,
            street_name: self.street_name,
            area: self.area,
            experience_years: self.experience_years,
        };

        (self.account.into(), profile, self.skill_ids)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStatusDto {
    pub status: AvailableStatus,
}

/// Times are "HH:MM" (or "HH:MM:SS"); omitted slots fall back to the
/// default working day.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AvailabilityDto {
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
}

impl AvailabilityDto {
    pub fn into_slots(self) -> Result<AvailabilitySlots, String> {
        let defaults = AvailabilitySlots::default();

        Ok(AvailabilitySlots {
            morning_start: parse_time("morning_start", self.morning_start, defaults.morning_start)?,
            morning_end: parse_time("morning_end", self.morning_end, defaults.morning_end)?,
            afternoon_start: parse_time(
                "afternoon_start",
                self.afternoon_start,
                defaults.afternoon_start,
            )?,
            afternoon_end: parse_time("afternoon_end", self.afternoon_end, defaults.afternoon_end)?,
        })
    }
}

fn parse_time(field: &str, value: Option<String>, default: NaiveTime) -> Result<NaiveTime, String> {
    let Some(value) = value else {
        return Ok(default);
    };
    let value = value.trim();

    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("{} must be a time like 09:30, got '{}'", field, value))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterAccountDto {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterAccountDto {
    pub fn filter_account(account: &Account) -> Self {
        FilterAccountDto {
            id: account.id,
            username: account.username.to_owned(),
            role: account.role.to_str().to_string(),
            first_name: account.first_name.to_owned(),
            last_name: account.last_name.to_owned(),
            email: account.email.clone(),
            phone_number1: account.phone_number1.clone(),
            phone_number2: account.phone_number2.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }

    pub fn filter_accounts(accounts: &[Account]) -> Vec<FilterAccountDto> {
        accounts.iter().map(FilterAccountDto::filter_account).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct FilterWorkerDto {
    #[serde(flatten)]
    pub account: FilterAccountDto,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
    pub experience_years: i32,
    pub available_status: AvailableStatus,
    pub skills: Vec<SkillType>,
}

impl FilterWorkerDto {
    pub fn filter_worker(worker: &WorkerDetails) -> Self {
        let profile = &worker.profile;

        FilterWorkerDto {
            account: FilterAccountDto::filter_account(&worker.account),
            address: profile.address.clone(),
            city: profile.city.clone(),
            pincode: profile.pincode.clone(),
            door_no: profile.door_no.clone(),
            street_name: profile.street_name.clone(),
            area: profile.area.clone(),
            experience_years: profile.experience_years,
            available_status: profile.available_status,
            skills: worker.skills.clone(),
        }
    }

    pub fn filter_workers(workers: &[WorkerDetails]) -> Vec<FilterWorkerDto> {
        workers.iter().map(FilterWorkerDto::filter_worker).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponseDto {
    pub status: &'static str,
    pub token: String,
    pub account: FilterAccountDto,
}
