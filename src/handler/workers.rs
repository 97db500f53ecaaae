use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dtos::{ApiResponse, AvailabilityDto, FilterWorkerDto, ListResponse, UpdateWorkerDto, WorkerStatusDto},
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn workers_handler() -> Router {
    Router::new()
        .route("/:worker_id", get(get_worker).put(update_worker))
        .route("/:worker_id/skills", get(get_worker_skills))
        .route("/:worker_id/status", put(update_worker_status))
        .route(
            "/:worker_id/availability",
            get(get_availability).post(add_availability),
        )
}

pub async fn get_worker(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let worker = app_state
        .account_service
        .get_worker(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(FilterWorkerDto::filter_worker(&worker))))
}

pub async fn update_worker(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateWorkerDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(worker_id)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (account_update, profile_update, skill_ids) = body.into_parts();

    let worker = app_state
        .account_service
        .update_worker(worker_id, account_update, profile_update, skill_ids)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(FilterWorkerDto::filter_worker(&worker))))
}

pub async fn get_worker_skills(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let worker = app_state
        .account_service
        .get_worker(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(worker.skills)))
}

pub async fn update_worker_status(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<WorkerStatusDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    // Only the worker sets their own availability status
    if session.account.id != worker_id {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let profile = app_state
        .account_service
        .update_worker_status(worker_id, body.status)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(profile)))
}

pub async fn add_availability(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<AvailabilityDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(worker_id)?;

    let slots = body.into_slots().map_err(HttpError::bad_request)?;

    let availability = app_state
        .account_service
        .add_availability(worker_id, slots)
        .await
        .map_err(HttpError::from)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(availability))))
}

pub async fn get_availability(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let availability = app_state
        .account_service
        .get_availability(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(availability)))
}
