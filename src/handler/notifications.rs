use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};

use crate::{
    dtos::{ApiResponse, ListResponse},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::accountmodel::AccountRole,
    AppState,
};

pub fn notification_handler() -> Router {
    Router::new()
        .route("/user/:account_id", get(get_account_notifications))
        .route("/worker/:account_id", get(get_account_notifications))
        .route(
            "/admin",
            get(get_all_notifications).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![AccountRole::Admin])
            })),
        )
        .route("/:notification_id/read", put(mark_notification_read))
}

/// Newest first.
pub async fn get_account_notifications(
    Path(account_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(account_id)?;

    let notifications = app_state
        .notification_service
        .get_account_notifications(account_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(notifications)))
}

pub async fn get_all_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .notification_service
        .get_all_notifications()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(notifications)))
}

pub async fn mark_notification_read(
    Path(notification_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .notification_service
        .mark_as_read(notification_id, session.account.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(notification)))
}
