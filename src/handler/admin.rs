use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::{
    dtos::{ApiResponse, FilterAccountDto, FilterWorkerDto, ListResponse, Response},
    error::HttpError,
    models::accountmodel::AccountRole,
    AppState,
};

/// Mounted behind the admin role check.
pub fn admin_handler() -> Router {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/:user_id", delete(delete_user))
        .route("/workers", get(get_workers))
        .route("/workers/:worker_id", delete(delete_worker))
        .route("/work-requests", get(get_work_requests))
        .route("/stats", get(get_stats))
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .account_service
        .list_accounts(AccountRole::User)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(FilterAccountDto::filter_accounts(&users))))
}

pub async fn delete_user(
    Path(user_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .account_service
        .delete_account(user_id, AccountRole::User)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: format!("User {} deleted", user_id),
    }))
}

pub async fn get_workers(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let workers = app_state
        .account_service
        .list_workers()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(FilterWorkerDto::filter_workers(&workers))))
}

pub async fn delete_worker(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .account_service
        .delete_account(worker_id, AccountRole::Worker)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: format!("Worker {} deleted", worker_id),
    }))
}

pub async fn get_work_requests(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let requests = app_state
        .work_request_service
        .list_all()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(requests)))
}

pub async fn get_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .stats_service
        .platform_stats()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(stats)))
}
