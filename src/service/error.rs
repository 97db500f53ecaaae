use axum::http::StatusCode;
use thiserror::Error;

use crate::{
    error::{ErrorMessage, HttpError},
    models::workrequestmodel::TransitionError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Account {0} not found")]
    AccountNotFound(i64),

    #[error("Worker {0} not found")]
    WorkerNotFound(i64),

    #[error("Work request {0} not found")]
    WorkRequestNotFound(i64),

    #[error("Skill type {0} not found")]
    SkillTypeNotFound(i64),

    #[error("Notification {0} not found")]
    NotificationNotFound(i64),

    #[error("{0}")]
    Transition(#[from] TransitionError),

    #[error("Work request {0} was modified concurrently, reload and try again")]
    StaleWorkRequest(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ErrorMessage> for ServiceError {
    fn from(message: ErrorMessage) -> Self {
        match message {
            ErrorMessage::EmptyPassword | ErrorMessage::ExceededMaxPasswordLength(_) => {
                ServiceError::Validation(message.to_string())
            }
            _ => ServiceError::Other(message.to_string()),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::AccountNotFound(_)
            | ServiceError::WorkerNotFound(_)
            | ServiceError::WorkRequestNotFound(_)
            | ServiceError::SkillTypeNotFound(_)
            | ServiceError::NotificationNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::Transition(err) => match err {
                TransitionError::InvalidStatus { .. } | TransitionError::NoArrivalTime { .. } => {
                    StatusCode::CONFLICT
                }
                TransitionError::NotAssignedWorker { .. }
                | TransitionError::NotOwner { .. }
                | TransitionError::MissingSkill { .. }
                | TransitionError::RoleCannotCancel { .. } => StatusCode::FORBIDDEN,
            },

            ServiceError::StaleWorkRequest(_) | ServiceError::Conflict(_) => StatusCode::CONFLICT,

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,

            ServiceError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,

            ServiceError::Database(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Maps a unique or foreign-key violation onto `Conflict`, anything else
    /// stays a database error.
    pub fn from_constraint(err: sqlx::Error, conflict_message: impl Into<String>) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return ServiceError::Conflict(conflict_message.into());
            }
        }
        ServiceError::Database(err)
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();

        match error {
            // Keep driver details out of responses
            ServiceError::Database(err) => {
                tracing::error!("database error: {}", err);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            other => HttpError::new(other.to_string(), status),
        }
    }
}
