use std::sync::Arc;

use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse, Extension};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::accountdb::AccountExt,
    error::{ErrorMessage, HttpError},
    models::accountmodel::{Account, AccountRole},
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddeware {
    pub account: Account,
}

impl JWTAuthMiddeware {
    /// Ids sent in request bodies are optional, but when present they must
    /// name the caller.
    pub fn ensure_same_account(&self, claimed_id: Option<i64>) -> Result<(), HttpError> {
        match claimed_id {
            Some(id) if id != self.account.id => Err(HttpError::forbidden(format!(
                "Account {} cannot act on behalf of account {}",
                self.account.id, id
            ))),
            _ => Ok(()),
        }
    }

    /// Path-scoped resources are readable by their owner and by admins.
    pub fn ensure_self_or_admin(&self, account_id: i64) -> Result<(), HttpError> {
        if self.account.id == account_id || self.account.role == AccountRole::Admin {
            return Ok(());
        }
        Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()))
    }
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(str::to_owned)
        });

    let token =
        token.ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let subject = token::decode_token(token, app_state.env.jwt_secret.as_bytes())
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let account_id = subject
        .parse::<i64>()
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let account = app_state
        .db_client
        .get_account(Some(account_id), None)
        .await
        .map_err(|e| {
            tracing::error!("failed to load account {} for session: {}", account_id, e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    req.extensions_mut().insert(JWTAuthMiddeware { account });

    Ok(next.run(req).await)
}

pub async fn role_check(
    Extension(_app_state): Extension<Arc<AppState>>,
    req: Request,
    next: Next,
    required_roles: Vec<AccountRole>,
) -> Result<impl IntoResponse, HttpError> {
    let session = req
        .extensions()
        .get::<JWTAuthMiddeware>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    if !required_roles.contains(&session.account.role) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    Ok(next.run(req).await)
}
