use bigdecimal::BigDecimal;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::accountmodel::AccountRole;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn to_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Completed => "Completed",
            RequestStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "confirmation_status", rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// The user's answer to a proposed arrival time.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalDecision {
    Confirmed,
    Rejected,
}

impl ArrivalDecision {
    pub fn to_str(&self) -> &str {
        match self {
            ArrivalDecision::Confirmed => "confirmed",
            ArrivalDecision::Rejected => "rejected",
        }
    }
}

impl From<ArrivalDecision> for ConfirmationStatus {
    fn from(decision: ArrivalDecision) -> Self {
        match decision {
            ArrivalDecision::Confirmed => ConfirmationStatus::Confirmed,
            ArrivalDecision::Rejected => ConfirmationStatus::Rejected,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct WorkRequest {
    pub request_id: i64,
    pub user_id: i64,
    pub worker_id: Option<i64>,
    pub skill_type_id: i64,
    pub description: String,
    pub request_date: NaiveDate,
    pub location: String,
    pub city: String,
    pub pincode: String,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
    pub status: RequestStatus,
    pub time_slot: Option<String>,
    pub worker_arrival_time: Option<String>,
    pub user_confirmation_status: Option<ConfirmationStatus>,
    pub amount: Option<BigDecimal>,
    pub completed_date: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A work request joined with the names a dashboard needs.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WorkRequestDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: WorkRequest,
    pub skill_name: String,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub worker_first_name: Option<String>,
    pub worker_last_name: Option<String>,
}

// Column widths of the work_requests table.
pub const MAX_LOCATION_LEN: usize = 255;
pub const MAX_CITY_LEN: usize = 50;
pub const MAX_PINCODE_LEN: usize = 10;
pub const MAX_DOOR_NO_LEN: usize = 20;
pub const MAX_STREET_LEN: usize = 100;
pub const MAX_TIME_SLOT_LEN: usize = 50;
pub const MAX_ARRIVAL_TIME_LEN: usize = 20;

#[derive(Debug, Clone)]
pub struct NewWorkRequest {
    pub user_id: i64,
    pub skill_type_id: i64,
    pub description: String,
    pub request_date: NaiveDate,
    pub location: String,
    pub city: String,
    pub pincode: String,
    pub door_no: Option<String>,
    pub street_name: Option<String>,
    pub area: Option<String>,
}

/// The other party of a cancelled request, if one must be told about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counterpart {
    pub account_id: i64,
    pub role: AccountRole,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Work request {request_id} is {status} and cannot be {action}")]
    InvalidStatus {
        request_id: i64,
        status: RequestStatus,
        action: &'static str,
    },

    #[error("Worker {worker_id} is not assigned to work request {request_id}")]
    NotAssignedWorker { request_id: i64, worker_id: i64 },

    #[error("Account {account_id} does not own work request {request_id}")]
    NotOwner { request_id: i64, account_id: i64 },

    #[error("Worker {worker_id} does not have the skill required by work request {request_id}")]
    MissingSkill { request_id: i64, worker_id: i64 },

    #[error("Work request {request_id} has no proposed arrival time to answer")]
    NoArrivalTime { request_id: i64 },

    #[error("{role} accounts cannot cancel work request {request_id}")]
    RoleCannotCancel { request_id: i64, role: AccountRole },
}

// Every transition checks status before the actor so a stale request reports
// the conflict rather than an authorization failure.
impl WorkRequest {
    fn ensure_status(
        &self,
        allowed: &[RequestStatus],
        action: &'static str,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TransitionError::InvalidStatus {
                request_id: self.request_id,
                status: self.status,
                action,
            })
        }
    }

    fn ensure_assigned(&self, worker_id: i64) -> Result<(), TransitionError> {
        if self.worker_id == Some(worker_id) {
            Ok(())
        } else {
            Err(TransitionError::NotAssignedWorker {
                request_id: self.request_id,
                worker_id,
            })
        }
    }

    fn ensure_owner(&self, user_id: i64) -> Result<(), TransitionError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(TransitionError::NotOwner {
                request_id: self.request_id,
                account_id: user_id,
            })
        }
    }

    pub fn is_participant(&self, account_id: i64) -> bool {
        self.user_id == account_id || self.worker_id == Some(account_id)
    }

    /// Assigns an unclaimed Pending request to a worker holding its skill.
    pub fn accept(
        &mut self,
        worker_id: i64,
        worker_skills: &[i64],
        time_slot: Option<String>,
    ) -> Result<(), TransitionError> {
        self.ensure_status(&[RequestStatus::Pending], "accepted")?;
        debug_assert!(self.worker_id.is_none(), "pending request {} has a worker", self.request_id);

        if !worker_skills.contains(&self.skill_type_id) {
            return Err(TransitionError::MissingSkill {
                request_id: self.request_id,
                worker_id,
            });
        }

        self.worker_id = Some(worker_id);
        self.status = RequestStatus::Accepted;
        self.time_slot = time_slot;
        self.worker_arrival_time = None;
        self.user_confirmation_status = None;
        Ok(())
    }

    /// Releases an accepted request back to the Pending pool.
    pub fn decline(&mut self, worker_id: i64) -> Result<(), TransitionError> {
        self.ensure_status(&[RequestStatus::Accepted], "declined")?;
        self.ensure_assigned(worker_id)?;

        self.worker_id = None;
        self.status = RequestStatus::Pending;
        self.time_slot = None;
        self.worker_arrival_time = None;
        self.user_confirmation_status = None;
        Ok(())
    }

    /// Proposes (or re-proposes) an arrival time; any prior answer is reset.
    pub fn set_arrival_time(
        &mut self,
        worker_id: i64,
        arrival_time: String,
    ) -> Result<(), TransitionError> {
        self.ensure_status(&[RequestStatus::Accepted], "given an arrival time")?;
        self.ensure_assigned(worker_id)?;

        self.worker_arrival_time = Some(arrival_time);
        self.user_confirmation_status = Some(ConfirmationStatus::Pending);
        Ok(())
    }

    /// Records the owner's answer. Returns false when the same answer was
    /// already recorded, in which case nothing changes.
    pub fn confirm_arrival(
        &mut self,
        user_id: i64,
        decision: ArrivalDecision,
    ) -> Result<bool, TransitionError> {
        self.ensure_status(&[RequestStatus::Accepted], "confirmed")?;
        self.ensure_owner(user_id)?;

        if self.worker_arrival_time.is_none() {
            return Err(TransitionError::NoArrivalTime {
                request_id: self.request_id,
            });
        }

        let answer = ConfirmationStatus::from(decision);
        if self.user_confirmation_status == Some(answer) {
            return Ok(false);
        }

        self.user_confirmation_status = Some(answer);
        Ok(true)
    }

    /// Closes an accepted request. `amount` must already be validated positive.
    pub fn complete(
        &mut self,
        worker_id: i64,
        amount: BigDecimal,
        completed_on: NaiveDate,
    ) -> Result<(), TransitionError> {
        self.ensure_status(&[RequestStatus::Accepted], "completed")?;
        self.ensure_assigned(worker_id)?;

        self.status = RequestStatus::Completed;
        self.amount = Some(amount);
        self.completed_date = Some(completed_on);
        Ok(())
    }

    /// Owners cancel Pending or Accepted requests, the assigned worker cancels
    /// Accepted ones. Returns the party that should be notified.
    pub fn cancel(
        &mut self,
        actor_id: i64,
        actor_role: AccountRole,
    ) -> Result<Option<Counterpart>, TransitionError> {
        self.ensure_status(
            &[RequestStatus::Pending, RequestStatus::Accepted],
            "cancelled",
        )?;

        let counterpart = match actor_role {
            AccountRole::User => {
                self.ensure_owner(actor_id)?;
                self.worker_id.map(|worker_id| Counterpart {
                    account_id: worker_id,
                    role: AccountRole::Worker,
                })
            }
            AccountRole::Worker => {
                self.ensure_assigned(actor_id)?;
                Some(Counterpart {
                    account_id: self.user_id,
                    role: AccountRole::User,
                })
            }
            AccountRole::Admin => {
                return Err(TransitionError::RoleCannotCancel {
                    request_id: self.request_id,
                    role: actor_role,
                })
            }
        };

        // Cancelled requests keep no assignment
        self.worker_id = None;
        self.status = RequestStatus::Cancelled;
        self.time_slot = None;
        self.worker_arrival_time = None;
        self.user_confirmation_status = None;
        Ok(counterpart)
    }

    /// Checks the assignment, completion and confirmation invariants.
    pub fn is_consistent(&self) -> bool {
        let assigned = matches!(
            self.status,
            RequestStatus::Accepted | RequestStatus::Completed
        );
        let completed = self.status == RequestStatus::Completed;
        let positive_amount = self
            .amount
            .as_ref()
            .map_or(true, |amount| *amount > BigDecimal::from(0));

        self.worker_id.is_some() == assigned
            && self.amount.is_some() == completed
            && self.completed_date.is_some() == completed
            && positive_amount
            && (self.user_confirmation_status.is_none() || self.worker_arrival_time.is_some())
    }
}
